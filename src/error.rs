use thiserror::Error;

/// Error taxonomy for the revision engine. Errors propagate to the caller
/// immediately; nothing here is retried.
#[derive(Debug, Error)]
pub enum RecapError {
    /// The revision does not exist or belongs to another user.
    #[error("revision not found")]
    NotFound,

    /// A submitted value is outside its allowed range or missing.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The underlying key-value store failed to read or write.
    #[error("storage error: {0}")]
    Storage(String),
}
