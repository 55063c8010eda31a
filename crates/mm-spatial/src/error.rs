//! Spatial-subsystem error type.

use thiserror::Error;

use mm_core::LinkId;

/// Errors produced by `mm-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("speed field {0:?} not in the links table")]
    UnknownSpeedField(String),

    #[error("duplicate link id {0}")]
    DuplicateLink(LinkId),

    #[error("link {0} has a degenerate geometry ({1} vertices)")]
    DegenerateGeometry(LinkId, usize),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
