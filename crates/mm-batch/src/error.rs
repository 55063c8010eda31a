//! Batch-subsystem error type.

use thiserror::Error;

/// Structural failures of batch runs.  Per-trace match failures are never
/// errors — they surface through `MatchOutcome::success`.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Config(#[from] mm_core::MmError),

    #[error(transparent)]
    Trace(#[from] mm_trace::TraceError),

    #[error(transparent)]
    Spatial(#[from] mm_spatial::SpatialError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type BatchResult<T> = Result<T, BatchError>;
