//! Snapshot file output.

pub mod schema;
mod snapshot_writer;

pub use schema::{ATTR_CELL_SIZE, ATTR_SCHEMA_VERSION, ATTR_WRITE_FREQUENCY, SCHEMA_VERSION};
pub use snapshot_writer::{SnapshotWriter, SnapshotWriterBuilder};
