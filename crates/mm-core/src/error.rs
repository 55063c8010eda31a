//! Workspace error type.
//!
//! Sub-crates define their own error enums and either convert into `MmError`
//! via `From` impls or wrap it as one variant.  Per-trace data-quality
//! findings are NOT errors in this sense — they accumulate as strings on the
//! trace and never abort a batch.

use thiserror::Error;

/// Structural failures: unrecoverable, surfaced to the caller immediately.
#[derive(Debug, Error)]
pub enum MmError {
    #[error("unknown configuration key {0:?}")]
    UnknownConfigKey(String),

    #[error("unsupported projected CRS {0}; only 3857 (Web-Mercator) is implemented")]
    UnsupportedCrs(u32),

    #[error("mandatory field {0:?} is missing from the data")]
    MissingField(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `mm-*` crates.
pub type MmResult<T> = Result<T, MmError>;
