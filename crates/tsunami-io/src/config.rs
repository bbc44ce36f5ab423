//! Configuration for a tsunami run's inputs and snapshot output.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::EdgePolicy;

/// Configuration for opening source rasters and writing snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TsunamiIoConfig {
    /// Bathymetry raster (`x`, `y`, `z`).
    pub bathymetry_path: PathBuf,

    /// Sea-floor displacement raster (`x`, `y`, `z`).
    pub displacement_path: PathBuf,

    /// Snapshot file to create.
    pub output_path: PathBuf,

    /// Number of simulation cells in x.
    pub nx: usize,

    /// Solver steps between written time-slices.
    pub write_frequency: usize,

    /// Behaviour for bathymetry lookups outside the raster.
    pub edge_policy: EdgePolicy,

    /// Whether the snapshot stores the static bathymetry field.
    pub store_bathymetry: bool,

    /// `title` global attribute; empty to omit.
    pub title: String,
}

impl Default for TsunamiIoConfig {
    fn default() -> Self {
        Self {
            bathymetry_path: PathBuf::from("bathymetry_data.nc"),
            displacement_path: PathBuf::from("displacement_data.nc"),
            output_path: PathBuf::from("solver.nc"),
            nx: 100,
            write_frequency: 25,
            edge_policy: EdgePolicy::Strict,
            store_bathymetry: true,
            title: String::new(),
        }
    }
}

impl TsunamiIoConfig {
    /// Defaults overridden by `TSUNAMI_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Load configuration from a YAML file. Missing keys keep their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Override fields from `TSUNAMI_*` environment variables.
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("TSUNAMI_BATHYMETRY") {
            self.bathymetry_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("TSUNAMI_DISPLACEMENT") {
            self.displacement_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("TSUNAMI_OUTPUT") {
            self.output_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("TSUNAMI_NX") {
            if let Ok(nx) = val.parse() {
                self.nx = nx;
            }
        }

        if let Ok(val) = std::env::var("TSUNAMI_WRITE_FREQUENCY") {
            if let Ok(freq) = val.parse() {
                self.write_frequency = freq;
            }
        }

        if let Ok(val) = std::env::var("TSUNAMI_EDGE_POLICY") {
            self.edge_policy = EdgePolicy::from_str(&val);
        }

        if let Ok(val) = std::env::var("TSUNAMI_STORE_BATHYMETRY") {
            self.store_bathymetry = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("TSUNAMI_TITLE") {
            self.title = val;
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.nx == 0 {
            return Err("nx must be > 0".to_string());
        }

        if self.write_frequency == 0 {
            return Err("write_frequency must be > 0".to_string());
        }

        if self.output_path.as_os_str().is_empty() {
            return Err("output_path must not be empty".to_string());
        }

        if self.output_path == self.bathymetry_path || self.output_path == self.displacement_path
        {
            return Err("output_path must differ from the source rasters".to_string());
        }

        Ok(())
    }
}
