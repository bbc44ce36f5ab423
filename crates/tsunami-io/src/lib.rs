//! Snapshot persistence and source-grid resampling for a tsunami solver.
//!
//! This crate sits between a 2D shallow-water solver and NetCDF files:
//!
//! - **Resampling**: nearest-neighbour mapping of a simulation grid onto a
//!   bathymetry raster and a sea-floor displacement raster
//! - **Setup**: initial water height, momenta and displaced bathymetry per cell
//! - **Snapshots**: time-series output of height and momenta, plus read-back
//!   for inspection and restart
//!
//! # Architecture
//!
//! ```text
//! bathymetry.nc   displacement.nc
//!      │                │
//!      ▼                ▼
//!  SourceRaster     SourceRaster
//!      └──────┬─────────┘
//!             ▼
//!      TsunamiSources ──► GridResampler (TargetGrid, ScalingFactors)
//!             │
//!             ▼
//!      TsunamiEvent: Setup ──► sample_initial_state
//!             │
//!             ▼
//!      SnapshotWriter::write_time_slice ──► solver.nc ──► SnapshotReader
//! ```
//!
//! # Example
//!
//! ```ignore
//! use tsunami_io::{sample_initial_state, SnapshotWriter, TsunamiEvent};
//!
//! let mut writer = SnapshotWriter::builder("solver.nc")
//!     .sources("bathymetry_data.nc", "displacement_data.nc", 200)
//!     .build()?;
//!
//! let grid = *writer.grid();
//! let sources = writer.sources().expect("built in source mode");
//! let state = sample_initial_state(&TsunamiEvent::new(sources), &grid)?;
//!
//! writer.write_bathymetry(&state.bathymetry, state.stride())?;
//! writer.write_time_slice(
//!     &state.height,
//!     &state.momentum_x,
//!     &state.momentum_y,
//!     state.stride(),
//!     0,
//!     0.0,
//! )?;
//! writer.close();
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod raster;
pub mod reader;
pub mod resample;
pub mod setup;
pub mod sources;
pub mod types;
pub mod writer;

// Re-export commonly used types at crate root
pub use config::TsunamiIoConfig;
pub use error::{Result, TsunamiIoError};
pub use layout::{cell_centers, destride};
pub use raster::SourceRaster;
pub use reader::{SnapshotReader, TimeSlice};
pub use resample::{nearest_source_index, GridResampler};
pub use setup::{sample_initial_state, InitialState, Setup, TsunamiEvent};
pub use sources::TsunamiSources;
pub use types::{EdgePolicy, Field, RasterMetadata, ScalingFactors, TargetGrid};
pub use writer::{SnapshotWriter, SnapshotWriterBuilder};
