use thiserror::Error;

/// Errors surfaced by the thread synchronization core.
///
/// Everything here is local and non-fatal: a fetch failure leaves the thread
/// retryable via another `load`, a write failure is pinned to the specific
/// placeholder entry it belongs to. Nothing requires a full reload.
#[derive(Debug, Error)]
pub enum ThreadError {
    /// A history page or single-item fetch failed.
    #[error("fetch failed: {0}")]
    Fetch(String),
    /// A create-comment request failed.
    #[error("write failed: {0}")]
    Write(String),
}

/// Convenience alias for fallible thread operations.
pub type ThreadResult<T> = Result<T, ThreadError>;
