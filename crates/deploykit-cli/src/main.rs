use clap::{Parser, Subcommand};
use deploykit_utils::{LogFormat, LogLevel};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "deploykit")]
#[command(about = "Network resolution and source preprocessing for Solidity deployments")]
struct Cli {
    /// Project root holding deploykit.toml, .env and the remappings file
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Project configuration file, relative to the root
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Log output format (text, compact, json)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered chains and their network profiles
    Networks,
    /// Resolve a network into its connection profile (secrets redacted).
    ///
    /// Fails up front when MNEMONIC, INFURA_API_KEY or MAINNET_URL is unset.
    Resolve {
        /// Symbolic name or deployment key
        #[arg(required_unless_present = "all")]
        name: Option<String>,
        /// Resolve every configured network
        #[arg(long, conflicts_with = "name")]
        all: bool,
    },
    /// Rewrite import paths in source files through the remapping table
    Remap {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Write rewritten files here, at their paths relative to the root, instead of printing them
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// List the sources handed to the compiler after filtering
    Sources {
        /// Source directory, defaults to the configured one
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Exclusion pattern, defaults to the configured one
        #[arg(long)]
        exclude: Option<String>,
    },
    /// Export contract ABIs from compiled artifacts
    Abi {
        /// Strip version suffixes from exported file names
        #[arg(long)]
        clean: bool,
    },
    /// Run the full configuration pipeline and report the result
    Check,
    /// Write a default project configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let ctx = commands::Context::new(cli.root, cli.config);

    if let Commands::Init { force } = cli.command {
        return commands::init(&ctx, force).await;
    }

    let mut project = ctx.load_project().await?;
    if let Some(level) = cli.log_level {
        project.logging.level = level;
    }
    if let Some(format) = cli.log_format {
        project.logging.format = format;
    }
    project.logging.init()?;

    match cli.command {
        Commands::Networks => commands::networks(&project),
        Commands::Resolve { name, all } => commands::resolve(&ctx, &project, name, all),
        Commands::Remap { files, out_dir } => {
            commands::remap(&ctx, &project, files, out_dir).await
        }
        Commands::Sources { dir, exclude } => commands::sources(&ctx, &project, dir, exclude),
        Commands::Abi { clean } => commands::abi(&ctx, &project, clean),
        Commands::Check => commands::check(&ctx).await,
        Commands::Init { .. } => Ok(()),
    }
}
