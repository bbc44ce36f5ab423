//! Read-only store handle.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::native::{get_global_f64_attr, get_global_string_attr, get_string_attr};

/// Exclusive read-only handle on one NetCDF file.
pub struct StoreReader {
    file: netcdf::File,
    path: PathBuf,
}

impl StoreReader {
    /// Open an existing file for reading.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let file = netcdf::open(path)
            .map_err(|e| StoreError::library(format!("open {}", path.display()), e))?;

        debug!(path = %path.display(), "Opened NetCDF store for reading");

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn variable(&self, name: &str) -> StoreResult<netcdf::Variable<'_>> {
        self.file
            .variable(name)
            .ok_or_else(|| StoreError::missing(format!("variable {}", name)))
    }

    /// Length of a dimension.
    pub fn dimension_len(&self, name: &str) -> StoreResult<usize> {
        self.file
            .dimension(name)
            .map(|dim| dim.len())
            .ok_or_else(|| StoreError::missing(format!("dimension {}", name)))
    }

    /// Whether a variable with this name exists.
    pub fn has_variable(&self, name: &str) -> bool {
        self.file.variable(name).is_some()
    }

    /// Dimension names of a variable, outermost first.
    pub fn variable_dimensions(&self, name: &str) -> StoreResult<Vec<String>> {
        let var = self.variable(name)?;
        Ok(var.dimensions().iter().map(|dim| dim.name()).collect())
    }

    /// `units` attribute of a variable, if present.
    pub fn units(&self, name: &str) -> StoreResult<Option<String>> {
        let var = self.variable(name)?;
        Ok(get_string_attr(&var, "units"))
    }

    /// Numeric global attribute, if present.
    pub fn global_f64(&self, name: &str) -> Option<f64> {
        get_global_f64_attr(&self.file, name)
    }

    /// Text global attribute, if present.
    pub fn global_string(&self, name: &str) -> Option<String> {
        get_global_string_attr(&self.file, name)
    }

    /// Read exactly one element as `f64`.
    pub fn read_scalar<const N: usize>(&self, name: &str, index: [usize; N]) -> StoreResult<f64> {
        let var = self.variable(name)?;
        var.get_value::<f64, _>(index)
            .map_err(|e| StoreError::library(format!("read {}{:?}", name, index), e))
    }

    /// Read exactly one element as `f32`.
    pub fn read_scalar_f32<const N: usize>(
        &self,
        name: &str,
        index: [usize; N],
    ) -> StoreResult<f32> {
        let var = self.variable(name)?;
        var.get_value::<f32, _>(index)
            .map_err(|e| StoreError::library(format!("read {}{:?}", name, index), e))
    }

    /// Read every element of a variable as `f64`.
    pub fn read_all_f64(&self, name: &str) -> StoreResult<Vec<f64>> {
        let var = self.variable(name)?;
        var.get_values::<f64, _>(..)
            .map_err(|e| StoreError::library(format!("read {}", name), e))
    }

    /// Read every element of a variable as `f32`.
    pub fn read_all_f32(&self, name: &str) -> StoreResult<Vec<f32>> {
        let var = self.variable(name)?;
        var.get_values::<f32, _>(..)
            .map_err(|e| StoreError::library(format!("read {}", name), e))
    }

    /// Read the slice at `index` along the leading axis of a rank-3 variable.
    pub fn read_slice_f32(&self, name: &str, index: usize) -> StoreResult<Vec<f32>> {
        let var = self.variable(name)?;
        let rank = var.dimensions().len();
        if rank != 3 {
            return Err(StoreError::InvalidFormat(format!(
                "read_slice needs a rank-3 variable, {} has rank {}",
                name, rank
            )));
        }
        var.get_values::<f32, _>((index, .., ..))
            .map_err(|e| StoreError::library(format!("read {}[{}]", name, index), e))
    }

    /// First and last element of a 1D variable.
    pub fn read_endpoints(&self, name: &str) -> StoreResult<(f64, f64)> {
        let len = {
            let var = self.variable(name)?;
            let dims = var.dimensions();
            if dims.len() != 1 {
                return Err(StoreError::InvalidFormat(format!(
                    "{} must be one-dimensional, found {} dimensions",
                    name,
                    dims.len()
                )));
            }
            dims[0].len()
        };
        if len == 0 {
            return Err(StoreError::missing(format!("values of {}", name)));
        }

        let first = self.read_scalar(name, [0])?;
        let last = self.read_scalar(name, [len - 1])?;
        Ok((first, last))
    }

    /// Release the file handle.
    pub fn close(self) {
        debug!(path = %self.path.display(), "Closing NetCDF store");
        drop(self.file);
    }
}
