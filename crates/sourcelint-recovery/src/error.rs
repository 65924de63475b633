//! Recovery error types

/// Errors from the recovery boundary
#[derive(Debug, thiserror::Error)]
pub enum RecoveryError {
    #[error("Could not find hash by name {0}")]
    UnknownHashAlgo(String),

    #[error("Unknown site id: {0}")]
    UnknownSite(String),

    #[error("Snapshot {site}/{id} has no files")]
    NoFiles { site: String, id: String },

    #[error("Index error: {0}")]
    Index(#[from] IndexError),
}

/// Errors a hash index can return
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("Post not found in index: {0}")]
    PostNotFound(String),

    #[error("Query failed: {0}")]
    QueryError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
