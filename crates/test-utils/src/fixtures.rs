//! Synthetic source rasters written to real NetCDF files.
//!
//! A fixture mirrors the files the resampler consumes: `x` and `y`
//! coordinate variables over same-named dimensions and a 2D `z`.

use std::path::{Path, PathBuf};

use nc_store::{StoreResult, StoreWriter, ValueKind, VariableSpec};

/// Dimension order of the `z` variable in the written file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZOrder {
    /// `z(y, x)`
    YX,
    /// `z(x, y)`
    XY,
}

/// In-memory raster that can be written as a NetCDF source file.
#[derive(Debug, Clone)]
pub struct RasterFixture {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Row-major values, `z[iy * x.len() + ix]`.
    pub z: Vec<f64>,
    pub order: ZOrder,
}

impl RasterFixture {
    /// Evaluate `f(x, y)` at every sample.
    pub fn from_fn(x: Vec<f64>, y: Vec<f64>, f: impl Fn(f64, f64) -> f64) -> Self {
        let z = y
            .iter()
            .flat_map(|&yv| x.iter().map(move |&xv| (xv, yv)))
            .map(|(xv, yv)| f(xv, yv))
            .collect();
        Self {
            x,
            y,
            z,
            order: ZOrder::YX,
        }
    }

    /// Every sample set to `value`.
    pub fn constant(x: Vec<f64>, y: Vec<f64>, value: f64) -> Self {
        Self::from_fn(x, y, |_, _| value)
    }

    /// Sample value `col * 1000 + row`, so lookups can be traced back to
    /// their indices.
    pub fn indexed(x: Vec<f64>, y: Vec<f64>) -> Self {
        let nx = x.len();
        let mut fixture = Self::constant(x, y, 0.0);
        for (i, v) in fixture.z.iter_mut().enumerate() {
            *v = ((i % nx) * 1000 + i / nx) as f64;
        }
        fixture
    }

    /// Write `z` as `(x, y)` instead of `(y, x)`.
    pub fn transposed(mut self) -> Self {
        self.order = ZOrder::XY;
        self
    }

    /// Value at sample `(ix, iy)`.
    pub fn value(&self, ix: usize, iy: usize) -> f64 {
        self.z[iy * self.x.len() + ix]
    }

    /// Write the raster to `path`.
    pub fn write(&self, path: impl AsRef<Path>) -> StoreResult<PathBuf> {
        let path = path.as_ref();
        let mut store = StoreWriter::create(path)?;

        store.define_dimension("x", self.x.len())?;
        store.define_dimension("y", self.y.len())?;
        store.define_variable(&VariableSpec::new("x", &["x"], ValueKind::F64).units("m"))?;
        store.define_variable(&VariableSpec::new("y", &["y"], ValueKind::F64).units("m"))?;

        let z_dims: &[&str] = match self.order {
            ZOrder::YX => &["y", "x"],
            ZOrder::XY => &["x", "y"],
        };
        store.define_variable(&VariableSpec::new("z", z_dims, ValueKind::F64).units("m"))?;
        store.end_definitions();

        store.write_all_f64("x", &self.x)?;
        store.write_all_f64("y", &self.y)?;
        match self.order {
            ZOrder::YX => store.write_all_f64("z", &self.z)?,
            ZOrder::XY => {
                let nx = self.x.len();
                let ny = self.y.len();
                let mut columns = Vec::with_capacity(self.z.len());
                for ix in 0..nx {
                    for iy in 0..ny {
                        columns.push(self.z[iy * nx + ix]);
                    }
                }
                store.write_all_f64("z", &columns)?;
            }
        }

        store.close();
        Ok(path.to_path_buf())
    }

    /// Write the raster into `dir` under `name`.
    pub fn write_in(&self, dir: &tempfile::TempDir, name: &str) -> StoreResult<PathBuf> {
        self.write(dir.path().join(name))
    }
}

/// `n` evenly spaced coordinates starting at `start`.
pub fn axis(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + i as f64 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis() {
        assert_eq!(axis(-50.0, 25.0, 5), vec![-50.0, -25.0, 0.0, 25.0, 50.0]);
    }

    #[test]
    fn test_indexed_values() {
        let raster = RasterFixture::indexed(axis(0.0, 1.0, 3), axis(0.0, 1.0, 2));
        assert_eq!(raster.value(0, 0), 0.0);
        assert_eq!(raster.value(2, 0), 2000.0);
        assert_eq!(raster.value(1, 1), 1001.0);
    }

    #[test]
    fn test_from_fn_row_major() {
        let raster = RasterFixture::from_fn(axis(0.0, 10.0, 2), axis(0.0, 1.0, 2), |x, y| x + y);
        assert_eq!(raster.z, vec![0.0, 10.0, 1.0, 11.0]);
    }

    #[test]
    fn test_write_creates_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let raster = RasterFixture::constant(axis(0.0, 1.0, 2), axis(0.0, 1.0, 2), -5.0);
        let path = raster.transposed().write_in(&dir, "flat.nc").unwrap();
        assert!(path.exists());
    }
}
