//! Error types for resono

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed mesh data: bad indices, degenerate triangles, invalid materials.
    #[error("Geometry error: {0}")]
    Geometry(String),

    /// Bad source/capture index, malformed order range, unrecognized pattern or
    /// out-of-range configuration value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Working buffers or worker threads could not be allocated.
    #[error("Resource error: {0}")]
    Resource(String),

    /// The engine was asked to do something before it was configured for it.
    #[error("Not ready: {0}")]
    NotReady(String),
}

impl From<strum::ParseError> for Error {
    fn from(why: strum::ParseError) -> Self {
        Error::InvalidArgument(format!("Unrecognized pattern: {}", why))
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(why: std::collections::TryReserveError) -> Self {
        Error::Resource(format!("Allocation failed: {}", why))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
