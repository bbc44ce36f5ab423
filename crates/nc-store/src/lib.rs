//! Named-operation handles over NetCDF files.
//!
//! The raw NetCDF API threads integer dimension and variable ids through
//! every call. This crate hides them behind two capability objects, one per
//! open file:
//!
//! - [`StoreWriter`]: create or append, define dimensions and variables,
//!   then write whole variables, leading-axis slices or single elements.
//! - [`StoreReader`]: open read-only, inspect dimensions, read single
//!   elements, slices or whole variables.
//!
//! Both handles own their file exclusively and release it on drop or on
//! an explicit `close`.
//!
//! # Example
//!
//! ```ignore
//! use nc_store::{StoreWriter, ValueKind, VariableSpec};
//!
//! let mut store = StoreWriter::create("out.nc")?;
//! store.define_unlimited_dimension("time")?;
//! store.define_variable(&VariableSpec::new("time", &["time"], ValueKind::F64).units("s"))?;
//! store.end_definitions();
//! store.write_scalar("time", 0, 0.0)?;
//! ```

pub mod error;
pub mod native;
pub mod reader;
pub mod writer;

pub use error::{StoreError, StoreResult};
pub use native::silence_hdf5_errors;
pub use reader::StoreReader;
pub use writer::{Phase, StoreWriter, ValueKind, VariableSpec};
