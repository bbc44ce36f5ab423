//! Read-back of snapshot files, for inspection and checkpoint restore.

use std::path::Path;

use nc_store::{StoreError, StoreReader};
use tracing::{debug, info};

use crate::error::{Result, TsunamiIoError};
use crate::types::{Field, TargetGrid};
use crate::writer::schema::{
    ATTR_CELL_SIZE, ATTR_SCHEMA_VERSION, ATTR_WRITE_FREQUENCY, DIM_TIME, DIM_X, DIM_Y,
    SCHEMA_VERSION, VAR_BATHYMETRY, VAR_TIME, VAR_X,
};

/// All three fields of one time-slice, packed row-major with stride `nx`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSlice {
    pub step: usize,
    pub time: f64,
    pub height: Vec<f32>,
    pub momentum_x: Vec<f32>,
    pub momentum_y: Vec<f32>,
}

impl TimeSlice {
    pub fn field(&self, field: Field) -> &[f32] {
        match field {
            Field::Height => &self.height,
            Field::MomentumX => &self.momentum_x,
            Field::MomentumY => &self.momentum_y,
        }
    }

    /// A field widened back to solver precision.
    pub fn to_f64(&self, field: Field) -> Vec<f64> {
        self.field(field).iter().map(|&v| v as f64).collect()
    }

    /// Smallest and largest finite value of a field.
    pub fn min_max(&self, field: Field) -> Option<(f32, f32)> {
        self.field(field)
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Opens a snapshot file written by [`crate::SnapshotWriter`].
#[derive(Debug)]
pub struct SnapshotReader {
    store: StoreReader,
    grid: TargetGrid,
}

impl SnapshotReader {
    /// Open a snapshot and check its layout.
    ///
    /// Files stamped with a different layout version are rejected; files
    /// without the version attribute are accepted.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let store = StoreReader::open(path)?;

        if let Some(version) = store.global_string(ATTR_SCHEMA_VERSION) {
            if version != SCHEMA_VERSION {
                return Err(StoreError::InvalidFormat(format!(
                    "{}: layout version {} (expected {})",
                    store.path().display(),
                    version,
                    SCHEMA_VERSION
                ))
                .into());
            }
        }

        let required = [
            VAR_TIME,
            Field::Height.name(),
            Field::MomentumX.name(),
            Field::MomentumY.name(),
        ];
        for name in required {
            if !store.has_variable(name) {
                return Err(StoreError::missing(format!("variable {}", name)).into());
            }
        }

        let nx = store.dimension_len(DIM_X)?;
        let ny = store.dimension_len(DIM_Y)?;

        // Files without the attribute still carry cell centres.
        let cell_size = match store.global_f64(ATTR_CELL_SIZE) {
            Some(cell_size) => cell_size,
            None => 2.0 * store.read_scalar(VAR_X, [0])?,
        };
        let grid = TargetGrid::new(nx, ny, cell_size)?;

        info!(
            path = %store.path().display(),
            nx,
            ny,
            cell_size,
            "Opened snapshot file"
        );

        Ok(Self { store, grid })
    }

    pub fn grid(&self) -> &TargetGrid {
        &self.grid
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Number of time-slices in the file.
    pub fn time_steps(&self) -> Result<usize> {
        Ok(self.store.dimension_len(DIM_TIME)?)
    }

    /// Simulation time of every slice.
    pub fn times(&self) -> Result<Vec<f64>> {
        if self.time_steps()? == 0 {
            return Ok(Vec::new());
        }
        Ok(self.store.read_all_f64(VAR_TIME)?)
    }

    /// Solver steps between stored slices, 1 when the file does not say.
    pub fn write_frequency(&self) -> usize {
        match self.store.global_f64(ATTR_WRITE_FREQUENCY) {
            Some(freq) if freq >= 1.0 => freq as usize,
            _ => 1,
        }
    }

    pub fn has_bathymetry(&self) -> bool {
        self.store.has_variable(VAR_BATHYMETRY)
    }

    /// The static bathymetry field, if the file defines one.
    pub fn read_bathymetry(&self) -> Result<Option<Vec<f32>>> {
        if !self.has_bathymetry() {
            return Ok(None);
        }
        Ok(Some(self.store.read_all_f32(VAR_BATHYMETRY)?))
    }

    /// Read all three fields at `step`.
    pub fn read_time_slice(&self, step: usize) -> Result<TimeSlice> {
        self.check_step(step)?;

        let slice = TimeSlice {
            step,
            time: self.store.read_scalar(VAR_TIME, [step])?,
            height: self.store.read_slice_f32(Field::Height.name(), step)?,
            momentum_x: self.store.read_slice_f32(Field::MomentumX.name(), step)?,
            momentum_y: self.store.read_slice_f32(Field::MomentumY.name(), step)?,
        };

        debug!(step, time = slice.time, "Read time slice");
        Ok(slice)
    }

    /// The last written time-slice, for restarting a run.
    pub fn latest_time_slice(&self) -> Result<Option<TimeSlice>> {
        match self.time_steps()? {
            0 => Ok(None),
            n => self.read_time_slice(n - 1).map(Some),
        }
    }

    /// One value of `field` at `step` and cell `(ix, iy)`.
    pub fn read_cell(&self, field: Field, step: usize, ix: usize, iy: usize) -> Result<f32> {
        self.check_step(step)?;
        if ix >= self.grid.nx || iy >= self.grid.ny {
            return Err(TsunamiIoError::out_of_range(
                field.name(),
                (ix as i64, iy as i64),
                (self.grid.nx, self.grid.ny),
            ));
        }
        Ok(self.store.read_scalar_f32(field.name(), [step, iy, ix])?)
    }

    pub fn close(self) {
        self.store.close();
    }

    fn check_step(&self, step: usize) -> Result<()> {
        let steps = self.time_steps()?;
        if step >= steps {
            return Err(TsunamiIoError::out_of_range(
                DIM_TIME,
                (step as i64, 0),
                (steps, 1),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice() -> TimeSlice {
        TimeSlice {
            step: 0,
            time: 0.0,
            height: vec![1.0, f32::NAN, -3.0, 2.5],
            momentum_x: vec![0.0; 4],
            momentum_y: vec![],
        }
    }

    #[test]
    fn test_min_max_skips_non_finite() {
        assert_eq!(slice().min_max(Field::Height), Some((-3.0, 2.5)));
        assert_eq!(slice().min_max(Field::MomentumX), Some((0.0, 0.0)));
        assert_eq!(slice().min_max(Field::MomentumY), None);
    }

    #[test]
    fn test_to_f64_widens() {
        let widened = slice().to_f64(Field::Height);
        assert_eq!(widened[0], 1.0);
        assert_eq!(widened[3], 2.5);
    }
}
