use deploykit_utils::DeployKitError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing secret: environment variable {0} is not set")]
    MissingSecret(String),

    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Environment error: {0}")]
    EnvironmentError(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Invalid URL for {network}: {reason}")]
    InvalidUrl { network: String, reason: String },

    #[error("Artifact error: {0}")]
    Artifact(String),

    #[error("deploykit error: {0}")]
    Core(#[from] DeployKitError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for DeployKitError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingSecret(var) => DeployKitError::MissingSecret(var),
            ConfigError::UnknownNetwork(name) => DeployKitError::UnknownNetwork(name),
            ConfigError::Json(e) => DeployKitError::Serialization(e.to_string()),
            ConfigError::Toml(e) => DeployKitError::Serialization(e.to_string()),
            ConfigError::Artifact(msg) => DeployKitError::Artifact(msg),
            ConfigError::Core(e) => e,
            other => DeployKitError::Config(other.to_string()),
        }
    }
}
