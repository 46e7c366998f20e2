//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Command execution errors.
///
/// Every variant carries the text shown to the sender; the dispatcher turns
/// any of them into a single quoted reply.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Sender lacks the required role (owner, admin, group-only).
    #[error("{0}")]
    PolicyDenied(String),

    /// Malformed or missing arguments. Nothing was mutated.
    #[error("{0}")]
    ValidationFailed(String),

    #[error("{0}")]
    NotFound(String),

    /// Balance too low.
    #[error("{0}")]
    InsufficientResource(String),

    #[error("Gateway failure: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Store failure: {0}")]
    Store(#[from] StoreError),
}

impl CommandError {
    pub fn kind(&self) -> &'static str {
        match self {
            CommandError::PolicyDenied(_) => "policy_denied",
            CommandError::ValidationFailed(_) => "validation_failed",
            CommandError::NotFound(_) => "not_found",
            CommandError::InsufficientResource(_) => "insufficient_resource",
            CommandError::Gateway(_) => "gateway_failure",
            CommandError::Store(_) => "store_failure",
        }
    }
}

/// Messaging gateway failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Rejected: {0}")]
    Rejected(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Domain store rule violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("All product codes are in use")]
    ProductCodesExhausted,

    #[error("Invalid price: {0}")]
    InvalidPrice(u64),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
