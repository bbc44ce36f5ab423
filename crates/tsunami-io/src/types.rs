//! Core types for source rasters and the simulation grid.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TsunamiIoError};

/// Extents and spacing of a source raster, read once when it is opened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterMetadata {
    /// Number of samples along x.
    pub x_length: usize,
    /// Number of samples along y.
    pub y_length: usize,
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    /// Sample spacing, derived from the x axis.
    pub cell_size: f64,
}

impl RasterMetadata {
    /// Build metadata from sample counts and the first/last coordinate values.
    ///
    /// The cell size is `(max_x - min_x) / (x_length - 1)`; it must be finite
    /// and positive.
    pub fn from_extents(
        x_length: usize,
        y_length: usize,
        (min_x, max_x): (f64, f64),
        (min_y, max_y): (f64, f64),
    ) -> Result<Self> {
        if x_length < 2 || y_length < 2 {
            return Err(TsunamiIoError::degenerate(format!(
                "raster needs at least 2 samples per axis, found {}x{}",
                x_length, y_length
            )));
        }

        let cell_size = (max_x - min_x) / (x_length - 1) as f64;
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(TsunamiIoError::degenerate(format!(
                "x extent [{}, {}] over {} samples gives cell size {}",
                min_x, max_x, x_length, cell_size
            )));
        }
        if !(max_y - min_y).is_finite() || max_y <= min_y {
            return Err(TsunamiIoError::degenerate(format!(
                "y extent [{}, {}] collapses",
                min_y, max_y
            )));
        }

        Ok(Self {
            x_length,
            y_length,
            min_x,
            max_x,
            min_y,
            max_y,
            cell_size,
        })
    }

    /// Physical width covered by the samples, one cell wider than the span.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x + self.cell_size
    }

    /// Physical height covered by the samples, one cell taller than the span.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y + self.cell_size
    }

    /// Whether a world position lies in the closed window that extends half a
    /// cell beyond the outermost samples on every side.
    pub fn contains_with_margin(&self, x: f64, y: f64) -> bool {
        let margin = 0.5 * self.cell_size;
        x >= self.min_x - margin
            && x <= self.max_x + margin
            && y >= self.min_y - margin
            && y <= self.max_y + margin
    }
}

/// The simulation grid that source rasters are resampled onto.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetGrid {
    /// Number of cells in x.
    pub nx: usize,
    /// Number of cells in y.
    pub ny: usize,
    /// Edge length of one square cell in metres.
    pub cell_size: f64,
}

impl TargetGrid {
    /// Create a grid from explicit dimensions.
    pub fn new(nx: usize, ny: usize, cell_size: f64) -> Result<Self> {
        if nx == 0 || ny == 0 {
            return Err(TsunamiIoError::degenerate(format!(
                "grid must have at least one cell per axis, got {}x{}",
                nx, ny
            )));
        }
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(TsunamiIoError::degenerate(format!(
                "cell size must be positive, got {}",
                cell_size
            )));
        }
        Ok(Self { nx, ny, cell_size })
    }

    /// Derive the grid for `nx` cells across the bathymetry raster.
    ///
    /// The cell size spreads the bathymetry's physical width over `nx` cells;
    /// `ny` keeps the aspect ratio at that cell size, rounded to the nearest
    /// integer and never below one.
    pub fn derive(bathymetry: &RasterMetadata, nx: usize) -> Result<Self> {
        if nx == 0 {
            return Err(TsunamiIoError::degenerate("nx must be positive"));
        }

        let cell_size = bathymetry.width() / nx as f64;
        let ny = (bathymetry.height() / cell_size).round().max(1.0) as usize;

        Self::new(nx, ny, cell_size)
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.nx * self.ny
    }

    /// Physical width of the domain.
    pub fn width(&self) -> f64 {
        self.nx as f64 * self.cell_size
    }

    /// Physical height of the domain.
    pub fn height(&self) -> f64 {
        self.ny as f64 * self.cell_size
    }
}

/// Ratio of raster samples to target cells along each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingFactors {
    pub x: f64,
    pub y: f64,
}

impl ScalingFactors {
    /// Scaling of `raster` onto `grid`.
    pub fn between(raster: &RasterMetadata, grid: &TargetGrid) -> Self {
        Self {
            x: raster.x_length as f64 / grid.nx as f64,
            y: raster.y_length as f64 / grid.ny as f64,
        }
    }
}

/// What to do when a bathymetry lookup maps outside the raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolicy {
    /// Fail with `OutOfRangeLookup`.
    #[default]
    Strict,
    /// Clamp to the nearest edge sample.
    Clamp,
}

impl EdgePolicy {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "clamp" => Self::Clamp,
            _ => Self::Strict,
        }
    }

    /// Get the policy name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Clamp => "clamp",
        }
    }
}

impl std::fmt::Display for EdgePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The three time-varying fields of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Height,
    MomentumX,
    MomentumY,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Height, Field::MomentumX, Field::MomentumY];

    /// Variable name in the snapshot file.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Height => "height",
            Self::MomentumX => "momentum_x",
            Self::MomentumY => "momentum_y",
        }
    }

    /// Units attribute in the snapshot file.
    pub fn units(&self) -> &'static str {
        match self {
            Self::Height => "m",
            Self::MomentumX | Self::MomentumY => "m/s",
        }
    }
}
