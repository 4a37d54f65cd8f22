//! Storage adapter errors

use thiserror::Error;

/// Errors raised while loading or persisting snapshots
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the snapshot file failed
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot is not valid JSON for the record schema
    #[error("Snapshot decode error: {0}")]
    Json(#[from] serde_json::Error),
}
