use thiserror::Error;

/// Core error type shared by the deploykit crates
#[derive(Error, Debug, Clone)]
pub enum DeployKitError {
    /// Configuration could not be resolved
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required secret was not provided
    #[error("Missing secret: {0}")]
    MissingSecret(String),

    /// A network name is not part of the chain registry
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    /// Artifact handling failed
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// Serialization/Deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input or state
    #[error("Invalid: {0}")]
    Invalid(String),

    /// Logging could not be initialized
    #[error("Logging error: {0}")]
    Logging(String),
}

/// Standard Result type used across deploykit
pub type DeployKitResult<T> = Result<T, DeployKitError>;

/// Convenience macro for building invalid-input errors
#[macro_export]
macro_rules! invalid_error {
    ($msg:expr) => {
        $crate::error::DeployKitError::Invalid($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::DeployKitError::Invalid(format!($fmt, $($arg)*))
    };
}
