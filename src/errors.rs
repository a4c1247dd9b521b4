use thiserror::Error;

/// Reasons a ledger mutation was rejected before touching any state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Description is required")]
    MissingDescription,
    #[error("Amount must be greater than zero (got {0})")]
    NonPositiveAmount(f64),
    #[error("Amount must be a finite number")]
    NonFiniteAmount,
    #[error("Amount `{0}` is not a number")]
    UnparsableAmount(String),
    #[error("Unknown entry type `{0}` (expected `income` or `expense`)")]
    UnknownKind(String),
}

/// Failures raised while reading or writing the persistence slot.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialize(serde_json::Error),
    #[error("Stored ledger under `{key}` is unreadable: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Storage backend error: {0}")]
    Backend(String),
    #[error("Stored ledger under `{key}` could not be preserved; refusing to overwrite it")]
    SlotProtected { key: String },
}

/// Umbrella error for callers that mix ledger, storage and configuration work.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Persistence(PersistenceError::Io(err))
    }
}
