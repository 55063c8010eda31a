//! Trace-subsystem error type.
//!
//! Only structural problems live here.  Per-trace data-quality findings
//! ("too few pings", "jittery data", …) are accumulated as strings on the
//! [`Trace`](crate::Trace) instead — they must never abort a batch.

use thiserror::Error;

use mm_core::TraceId;

/// Errors produced by `mm-trace`.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("trace has no pings")]
    Empty,

    #[error("trace_id is not unique: {0} and {1} in one trace")]
    MixedTraceIds(TraceId, TraceId),

    #[error("mandatory field {0:?} is missing from the data")]
    MissingField(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TraceResult<T> = Result<T, TraceError>;
