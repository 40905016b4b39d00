// Collector failure surface. Degraded sub-metrics never show up here; they are
// sentinels inside the snapshot.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectorError {
    /// The synchronous first assembly failed outright; retrying later may succeed.
    #[error("snapshot unavailable: {0}")]
    Transient(#[source] anyhow::Error),

    /// The blocking assembly task panicked or was cancelled.
    #[error("snapshot task join: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type CollectorResult<T> = Result<T, CollectorError>;
