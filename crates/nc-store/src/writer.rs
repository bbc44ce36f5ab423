//! Writable store handle with an explicit define/data phase split.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Lifecycle phase of a writable store.
///
/// Dimensions, variables and global attributes may only be added while the
/// store is in [`Phase::Define`]; values may only be written in [`Phase::Data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Define,
    Data,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Define => write!(f, "define"),
            Self::Data => write!(f, "data"),
        }
    }
}

/// On-disk element type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    F32,
    F64,
}

/// Description of a variable to add during the define phase.
#[derive(Debug, Clone)]
pub struct VariableSpec<'a> {
    pub name: &'a str,
    pub dimensions: Vec<&'a str>,
    pub kind: ValueKind,
    pub attributes: Vec<(&'a str, String)>,
}

impl<'a> VariableSpec<'a> {
    /// Create a variable description over the named dimensions.
    pub fn new(name: &'a str, dimensions: &[&'a str], kind: ValueKind) -> Self {
        Self {
            name,
            dimensions: dimensions.to_vec(),
            kind,
            attributes: Vec::new(),
        }
    }

    /// Attach a text attribute.
    pub fn attribute(mut self, key: &'a str, value: impl Into<String>) -> Self {
        self.attributes.push((key, value.into()));
        self
    }

    /// Attach a `units` attribute.
    pub fn units(self, units: impl Into<String>) -> Self {
        self.attribute("units", units)
    }
}

/// Exclusive write handle on one NetCDF file.
///
/// Raw NetCDF ids never leave this type; every operation addresses
/// dimensions and variables by name.
pub struct StoreWriter {
    file: netcdf::FileMut,
    path: PathBuf,
    phase: Phase,
}

impl StoreWriter {
    /// Create a new file, replacing any existing file at `path`.
    pub fn create(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let file = netcdf::create(path)
            .map_err(|e| StoreError::library(format!("create {}", path.display()), e))?;

        debug!(path = %path.display(), "Created NetCDF store");

        Ok(Self {
            file,
            path: path.to_path_buf(),
            phase: Phase::Define,
        })
    }

    /// Open an existing file for appending. The store starts in the data phase.
    pub fn append(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let file = netcdf::append(path)
            .map_err(|e| StoreError::library(format!("append {}", path.display()), e))?;

        debug!(path = %path.display(), "Opened NetCDF store for appending");

        Ok(Self {
            file,
            path: path.to_path_buf(),
            phase: Phase::Data,
        })
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn require(&self, operation: &'static str, expected: Phase) -> StoreResult<()> {
        if self.phase != expected {
            return Err(StoreError::WrongPhase {
                operation,
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    /// Add a fixed-length dimension.
    pub fn define_dimension(&mut self, name: &str, len: usize) -> StoreResult<()> {
        self.require("define_dimension", Phase::Define)?;
        self.file
            .add_dimension(name, len)
            .map_err(|e| StoreError::library(format!("define dimension {}", name), e))?;
        Ok(())
    }

    /// Add an unlimited dimension that grows as slices are written past its end.
    pub fn define_unlimited_dimension(&mut self, name: &str) -> StoreResult<()> {
        self.require("define_unlimited_dimension", Phase::Define)?;
        self.file
            .add_unlimited_dimension(name)
            .map_err(|e| StoreError::library(format!("define dimension {}", name), e))?;
        Ok(())
    }

    /// Add a variable together with its text attributes.
    pub fn define_variable(&mut self, spec: &VariableSpec<'_>) -> StoreResult<()> {
        self.require("define_variable", Phase::Define)?;

        let name = spec.name;
        let mut var = match spec.kind {
            ValueKind::F32 => self.file.add_variable::<f32>(name, &spec.dimensions),
            ValueKind::F64 => self.file.add_variable::<f64>(name, &spec.dimensions),
        }
        .map_err(|e| StoreError::library(format!("define variable {}", name), e))?;

        for (key, value) in &spec.attributes {
            var.put_attribute(key, value.as_str())
                .map_err(|e| StoreError::library(format!("attribute {}:{}", name, key), e))?;
        }

        Ok(())
    }

    /// Add a global (file-level) attribute.
    pub fn put_global_attribute<T>(&mut self, name: &str, value: T) -> StoreResult<()>
    where
        T: Into<netcdf::AttributeValue>,
    {
        self.require("put_global_attribute", Phase::Define)?;
        self.file
            .add_attribute(name, value)
            .map_err(|e| StoreError::library(format!("global attribute {}", name), e))?;
        Ok(())
    }

    /// Leave the define phase. Calling this more than once is a no-op.
    pub fn end_definitions(&mut self) {
        if self.phase == Phase::Define {
            self.phase = Phase::Data;
            debug!(path = %self.path.display(), "Store entered data phase");
        }
    }

    fn variable_mut(&mut self, name: &str) -> StoreResult<netcdf::VariableMut<'_>> {
        self.file
            .variable_mut(name)
            .ok_or_else(|| StoreError::missing(format!("variable {}", name)))
    }

    /// Write every element of a single-precision variable.
    pub fn write_all_f32(&mut self, name: &str, values: &[f32]) -> StoreResult<()> {
        self.require("write_all", Phase::Data)?;
        let mut var = self.variable_mut(name)?;
        var.put_values(values, ..)
            .map_err(|e| StoreError::library(format!("write {}", name), e))
    }

    /// Write every element of a double-precision variable.
    pub fn write_all_f64(&mut self, name: &str, values: &[f64]) -> StoreResult<()> {
        self.require("write_all", Phase::Data)?;
        let mut var = self.variable_mut(name)?;
        var.put_values(values, ..)
            .map_err(|e| StoreError::library(format!("write {}", name), e))
    }

    /// Write one slice of a rank-3 variable at `index` along its leading axis.
    ///
    /// `values` must hold exactly one full slice in row-major order of the
    /// two trailing dimensions.
    pub fn write_slice(&mut self, name: &str, index: usize, values: &[f32]) -> StoreResult<()> {
        self.require("write_slice", Phase::Data)?;
        let mut var = self.variable_mut(name)?;

        let rank = var.dimensions().len();
        if rank != 3 {
            return Err(StoreError::InvalidFormat(format!(
                "write_slice needs a rank-3 variable, {} has rank {}",
                name, rank
            )));
        }

        var.put_values(values, (index, .., ..))
            .map_err(|e| StoreError::library(format!("write {}[{}]", name, index), e))
    }

    /// Write a single element of a rank-1 variable.
    pub fn write_scalar(&mut self, name: &str, index: usize, value: f64) -> StoreResult<()> {
        self.require("write_scalar", Phase::Data)?;
        let mut var = self.variable_mut(name)?;
        var.put_value(value, [index])
            .map_err(|e| StoreError::library(format!("write {}[{}]", name, index), e))
    }

    /// Current length of a dimension, if it exists.
    pub fn dimension_len(&self, name: &str) -> Option<usize> {
        self.file.dimension(name).map(|dim| dim.len())
    }

    /// Release the file handle.
    pub fn close(self) {
        debug!(path = %self.path.display(), "Closing NetCDF store");
        drop(self.file);
    }
}
