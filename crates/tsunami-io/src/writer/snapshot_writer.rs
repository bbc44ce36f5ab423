//! Time-series snapshot writer.

use std::path::{Path, PathBuf};

use nc_store::StoreWriter;
use tracing::{debug, info, warn};

use crate::config::TsunamiIoConfig;
use crate::error::{Result, TsunamiIoError};
use crate::layout::{cell_centers, destride};
use crate::reader::SnapshotReader;
use crate::sources::TsunamiSources;
use crate::types::{EdgePolicy, Field, TargetGrid};

use super::schema::{define_schema, DIM_TIME, VAR_BATHYMETRY, VAR_TIME, VAR_X, VAR_Y};

/// Where the writer's grid comes from.
#[derive(Debug, Clone)]
enum GridSource {
    Unset,
    Explicit {
        nx: usize,
        ny: usize,
        cell_size: f64,
    },
    Rasters {
        bathymetry: PathBuf,
        displacement: PathBuf,
        nx: usize,
    },
}

/// Builder selecting one of the two construction modes of [`SnapshotWriter`]:
/// an explicit grid, or a grid derived from source rasters that the writer
/// then keeps open.
#[derive(Debug, Clone)]
pub struct SnapshotWriterBuilder {
    path: PathBuf,
    source: GridSource,
    edge_policy: EdgePolicy,
    with_bathymetry: bool,
    write_frequency: usize,
    title: Option<String>,
}

impl SnapshotWriterBuilder {
    /// Start building a writer for the file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            source: GridSource::Unset,
            edge_policy: EdgePolicy::default(),
            with_bathymetry: true,
            write_frequency: 1,
            title: None,
        }
    }

    /// Builder preconfigured from a [`TsunamiIoConfig`] in source mode.
    pub fn from_config(config: &TsunamiIoConfig) -> Self {
        let mut builder = Self::new(&config.output_path)
            .sources(&config.bathymetry_path, &config.displacement_path, config.nx)
            .edge_policy(config.edge_policy)
            .bathymetry(config.store_bathymetry)
            .write_frequency(config.write_frequency);
        if !config.title.is_empty() {
            builder = builder.title(config.title.clone());
        }
        builder
    }

    /// Write-only mode on an explicit grid.
    pub fn grid(mut self, nx: usize, ny: usize, cell_size: f64) -> Self {
        self.source = GridSource::Explicit { nx, ny, cell_size };
        self
    }

    /// Source mode: derive the grid for `nx` cells from the bathymetry raster
    /// and keep both rasters open for setup queries.
    pub fn sources(
        mut self,
        bathymetry: impl AsRef<Path>,
        displacement: impl AsRef<Path>,
        nx: usize,
    ) -> Self {
        self.source = GridSource::Rasters {
            bathymetry: bathymetry.as_ref().to_path_buf(),
            displacement: displacement.as_ref().to_path_buf(),
            nx,
        };
        self
    }

    /// Edge policy for bathymetry lookups in source mode.
    pub fn edge_policy(mut self, policy: EdgePolicy) -> Self {
        self.edge_policy = policy;
        self
    }

    /// Whether to define the static bathymetry field.
    pub fn bathymetry(mut self, enabled: bool) -> Self {
        self.with_bathymetry = enabled;
        self
    }

    /// Solver steps between stored slices, used by [`SnapshotWriter::write_step`].
    pub fn write_frequency(mut self, steps: usize) -> Self {
        self.write_frequency = steps;
        self
    }

    /// Set the `title` global attribute.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Open the sources (if any), then create the output file and write the
    /// coordinate variables.
    pub fn build(self) -> Result<SnapshotWriter> {
        if self.write_frequency == 0 {
            return Err(TsunamiIoError::config("write_frequency must be > 0"));
        }

        let (grid, sources) = match self.source {
            GridSource::Unset => {
                return Err(TsunamiIoError::config(
                    "snapshot writer needs either an explicit grid or source rasters",
                ))
            }
            GridSource::Explicit { nx, ny, cell_size } => {
                (TargetGrid::new(nx, ny, cell_size)?, None)
            }
            GridSource::Rasters {
                bathymetry,
                displacement,
                nx,
            } => {
                let sources =
                    TsunamiSources::open(&bathymetry, &displacement, nx, self.edge_policy)?;
                (*sources.grid(), Some(sources))
            }
        };

        let mut store = StoreWriter::create(&self.path)?;
        define_schema(
            &mut store,
            &grid,
            self.with_bathymetry,
            self.write_frequency,
            self.title.as_deref(),
        )?;
        store.end_definitions();

        store.write_all_f64(VAR_X, &cell_centers(grid.nx, grid.cell_size))?;
        store.write_all_f64(VAR_Y, &cell_centers(grid.ny, grid.cell_size))?;

        info!(
            path = %self.path.display(),
            nx = grid.nx,
            ny = grid.ny,
            cell_size = grid.cell_size,
            source_mode = sources.is_some(),
            "Created snapshot file"
        );

        Ok(SnapshotWriter {
            store,
            grid,
            sources,
            with_bathymetry: self.with_bathymetry,
            write_frequency: self.write_frequency,
            highest_step: None,
        })
    }
}

/// Appends time-slices of height and momenta to a snapshot file.
///
/// Owns the output file and, in source mode, both source rasters. Every
/// handle is released exactly once, by [`SnapshotWriter::close`] or on drop.
pub struct SnapshotWriter {
    store: StoreWriter,
    grid: TargetGrid,
    sources: Option<TsunamiSources>,
    with_bathymetry: bool,
    write_frequency: usize,
    highest_step: Option<usize>,
}

impl SnapshotWriter {
    /// Start a builder for the file at `path`.
    pub fn builder(path: impl AsRef<Path>) -> SnapshotWriterBuilder {
        SnapshotWriterBuilder::new(path)
    }

    /// Create a write-only snapshot on an explicit grid.
    pub fn create(path: impl AsRef<Path>, nx: usize, ny: usize, cell_size: f64) -> Result<Self> {
        Self::builder(path).grid(nx, ny, cell_size).build()
    }

    /// Reopen an existing snapshot to append further time-slices.
    ///
    /// The file must pass [`SnapshotReader::open`]. Grid, bathymetry and
    /// write frequency come from the file; new slices continue after the
    /// last stored one.
    pub fn resume(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let reader = SnapshotReader::open(path)?;
        let grid = *reader.grid();
        let steps = reader.time_steps()?;
        let with_bathymetry = reader.has_bathymetry();
        let write_frequency = reader.write_frequency();
        reader.close();

        let store = StoreWriter::append(path)?;

        info!(
            path = %path.display(),
            nx = grid.nx,
            ny = grid.ny,
            time_steps = steps,
            "Resumed snapshot file"
        );

        Ok(Self {
            store,
            grid,
            sources: None,
            with_bathymetry,
            write_frequency,
            highest_step: steps.checked_sub(1),
        })
    }

    pub fn grid(&self) -> &TargetGrid {
        &self.grid
    }

    pub fn write_frequency(&self) -> usize {
        self.write_frequency
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Source rasters, when built in source mode.
    pub fn sources(&self) -> Option<&TsunamiSources> {
        self.sources.as_ref()
    }

    /// Step the next appended slice lands on.
    pub fn next_step(&self) -> usize {
        self.highest_step.map_or(0, |h| h + 1)
    }

    /// Number of time-slices the file currently holds.
    pub fn time_steps(&self) -> usize {
        self.store.dimension_len(DIM_TIME).unwrap_or(0)
    }

    /// Write the static bathymetry field. A second call overwrites the first.
    pub fn write_bathymetry(&mut self, bathymetry: &[f64], stride: usize) -> Result<()> {
        if !self.with_bathymetry {
            return Err(nc_store::StoreError::missing(format!(
                "variable {} (writer built without bathymetry)",
                VAR_BATHYMETRY
            ))
            .into());
        }

        let packed = destride(bathymetry, stride, self.grid.nx, self.grid.ny)?;
        self.store.write_all_f32(VAR_BATHYMETRY, &packed)?;

        debug!(path = %self.path().display(), "Wrote bathymetry");
        Ok(())
    }

    /// Write one time-slice of all three fields at `step` along the time axis.
    ///
    /// All buffers are validated and de-strided before anything is written.
    /// The fields go out before `time[step]`, so a recorded time marks a
    /// complete slice. Steps are expected to be non-decreasing; writing an
    /// earlier step overwrites that slot.
    pub fn write_time_slice(
        &mut self,
        height: &[f64],
        momentum_x: &[f64],
        momentum_y: &[f64],
        stride: usize,
        step: usize,
        time: f64,
    ) -> Result<()> {
        let (nx, ny) = (self.grid.nx, self.grid.ny);
        let packed = [
            (Field::Height, destride(height, stride, nx, ny)?),
            (Field::MomentumX, destride(momentum_x, stride, nx, ny)?),
            (Field::MomentumY, destride(momentum_y, stride, nx, ny)?),
        ];

        if let Some(highest) = self.highest_step {
            if step < highest {
                warn!(step, highest, "Overwriting earlier time slice");
            }
        }

        for (field, values) in &packed {
            self.store.write_slice(field.name(), step, values)?;
        }
        self.store.write_scalar(VAR_TIME, step, time)?;

        self.highest_step = Some(self.highest_step.map_or(step, |h| h.max(step)));
        debug!(step, time, "Wrote time slice");
        Ok(())
    }

    /// Write a time-slice for solver step `solver_step` if it falls on the
    /// write schedule, at slice `solver_step / write_frequency`.
    ///
    /// Returns whether a slice was written.
    pub fn write_step(
        &mut self,
        height: &[f64],
        momentum_x: &[f64],
        momentum_y: &[f64],
        stride: usize,
        solver_step: usize,
        time: f64,
    ) -> Result<bool> {
        if solver_step % self.write_frequency != 0 {
            return Ok(false);
        }
        let slice = solver_step / self.write_frequency;
        self.write_time_slice(height, momentum_x, momentum_y, stride, slice, time)?;
        Ok(true)
    }

    /// Release the output file and any source rasters.
    pub fn close(self) {
        let path = self.path().display().to_string();
        let steps = self.time_steps();

        self.store.close();
        if let Some(sources) = self.sources {
            sources.close();
        }

        info!(path = %path, time_steps = steps, "Closed snapshot file");
    }
}

impl std::fmt::Debug for SnapshotWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotWriter")
            .field("path", &self.path())
            .field("grid", &self.grid)
            .field("source_mode", &self.sources.is_some())
            .field("write_frequency", &self.write_frequency)
            .field("highest_step", &self.highest_step)
            .finish()
    }
}
