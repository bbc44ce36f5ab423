//! Error types for snapshot persistence and source-grid resampling.

use nc_store::StoreError;
use thiserror::Error;

/// Errors that can occur while reading sources or writing snapshots.
#[derive(Error, Debug)]
pub enum TsunamiIoError {
    /// A file could not be opened or created, a required variable or
    /// dimension is missing, or a write hit a closed/undefined handle.
    #[error("resource error: {0}")]
    Resource(#[from] StoreError),

    /// A source raster or requested grid cannot define a positive cell size.
    #[error("degenerate grid: {0}")]
    GridDegeneracy(String),

    /// A lookup fell outside the raster it addresses.
    #[error("lookup ({index_x}, {index_y}) outside {raster} of size {len_x}x{len_y}")]
    OutOfRangeLookup {
        raster: String,
        index_x: i64,
        index_y: i64,
        len_x: usize,
        len_y: usize,
    },

    /// A solver buffer does not cover the grid with the given stride.
    #[error("invalid buffer: {0}")]
    InvalidBuffer(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl TsunamiIoError {
    /// Create a GridDegeneracy error.
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::GridDegeneracy(msg.into())
    }

    /// Create an OutOfRangeLookup error.
    pub fn out_of_range(
        raster: impl Into<String>,
        index: (i64, i64),
        len: (usize, usize),
    ) -> Self {
        Self::OutOfRangeLookup {
            raster: raster.into(),
            index_x: index.0,
            index_y: index.1,
            len_x: len.0,
            len_y: len.1,
        }
    }

    /// Create an InvalidBuffer error.
    pub fn invalid_buffer(msg: impl Into<String>) -> Self {
        Self::InvalidBuffer(msg.into())
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<std::io::Error> for TsunamiIoError {
    fn from(err: std::io::Error) -> Self {
        Self::Resource(StoreError::IoError(err))
    }
}

impl From<serde_yaml::Error> for TsunamiIoError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for tsunami I/O operations.
pub type Result<T> = std::result::Result<T, TsunamiIoError>;
