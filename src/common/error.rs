//! Error types for cumulus

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Write Path Errors ===
    /// The per-shard write deadline elapsed before enough replicas acknowledged.
    #[error("timeout")]
    Timeout,

    /// Some replicas acknowledged, but fewer than the consistency level requires.
    #[error("partial write")]
    PartialWrite,

    /// No replica acknowledged, or the coordinator shut down mid-write.
    #[error("write failed: {0}")]
    WriteFailed(String),

    #[error("invalid consistency level: {0}")]
    InvalidConsistencyLevel(String),

    // === Meta Errors ===
    #[error("database not found: {0}")]
    DatabaseNotFound(String),

    #[error("retention policy not found: {0}")]
    RetentionPolicyNotFound(String),

    /// Sentinel returned by the local engine when a shard has never been
    /// created on this node.
    #[error("shard not found: {0}")]
    ShardNotFound(u64),

    #[error("meta store error: {0}")]
    MetaStore(String),

    // === Network Errors ===
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("node unavailable: {0}")]
    NodeUnavailable(u64),

    #[error("request timed out: {0}")]
    RequestTimeout(String),

    // === Config Errors ===
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // === Generic ===
    #[error("internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Is this a retryable error?
    ///
    /// Retryable errors are transport-level or availability conditions: the
    /// write may still land on the same peer later, so it is safe to divert
    /// it to the hinted-handoff queue instead of failing it outright.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::ConnectionFailed(_) | Error::NodeUnavailable(_) | Error::RequestTimeout(_)
        )
    }
}

// Implement From for common error types
impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}
