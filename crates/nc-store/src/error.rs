//! Error types for NetCDF store operations.

use thiserror::Error;

use crate::Phase;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Error types for NetCDF store access.
#[derive(Error, Debug)]
pub enum StoreError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error reported by the NetCDF/HDF5 library
    #[error("NetCDF error ({context}): {source}")]
    Library {
        context: String,
        #[source]
        source: netcdf::Error,
    },

    /// Missing required variable, dimension or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Operation not permitted in the current define/data phase
    #[error("operation `{operation}` requires the {expected} phase, store is in the {actual} phase")]
    WrongPhase {
        operation: &'static str,
        expected: Phase,
        actual: Phase,
    },
}

impl StoreError {
    /// Wrap a library error with a short description of what was attempted.
    pub fn library(context: impl Into<String>, source: netcdf::Error) -> Self {
        Self::Library {
            context: context.into(),
            source,
        }
    }

    /// Create a MissingData error.
    pub fn missing(what: impl Into<String>) -> Self {
        Self::MissingData(what.into())
    }
}
