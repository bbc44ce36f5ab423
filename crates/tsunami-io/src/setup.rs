//! Initial conditions queried per grid cell by the solver's setup stage.

use tracing::debug;

use crate::error::Result;
use crate::sources::TsunamiSources;
use crate::types::TargetGrid;

/// Initial-condition queries keyed by domain coordinates in metres.
pub trait Setup {
    /// Initial water height.
    fn height(&self, x: f64, y: f64) -> Result<f64>;

    /// Initial momentum in x.
    fn momentum_x(&self, x: f64, y: f64) -> Result<f64>;

    /// Initial momentum in y.
    fn momentum_y(&self, x: f64, y: f64) -> Result<f64>;

    /// Bathymetry the solver runs on.
    fn bathymetry(&self, x: f64, y: f64) -> Result<f64>;
}

/// Still water over measured bathymetry, with a seismic sea-floor
/// displacement added to the bathymetry.
///
/// Below-sea-level bathymetry is negative, so the undisplaced, negated
/// bathymetry is the initial water depth.
pub struct TsunamiEvent<'a> {
    sources: &'a TsunamiSources,
}

impl<'a> TsunamiEvent<'a> {
    pub fn new(sources: &'a TsunamiSources) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &TsunamiSources {
        self.sources
    }
}

impl Setup for TsunamiEvent<'_> {
    fn height(&self, x: f64, y: f64) -> Result<f64> {
        Ok(-self.sources.raw_bathymetry(x, y)?)
    }

    fn momentum_x(&self, _x: f64, _y: f64) -> Result<f64> {
        Ok(0.0)
    }

    fn momentum_y(&self, _x: f64, _y: f64) -> Result<f64> {
        Ok(0.0)
    }

    fn bathymetry(&self, x: f64, y: f64) -> Result<f64> {
        let raw = self.sources.raw_bathymetry(x, y)?;
        let displacement = self.sources.displacement_at(x, y)?.unwrap_or(0.0);
        Ok(raw + displacement)
    }
}

/// Packed initial fields for a whole grid, row stride `nx`.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialState {
    pub grid: TargetGrid,
    pub height: Vec<f64>,
    pub momentum_x: Vec<f64>,
    pub momentum_y: Vec<f64>,
    pub bathymetry: Vec<f64>,
}

impl InitialState {
    /// Row stride of the packed buffers.
    pub fn stride(&self) -> usize {
        self.grid.nx
    }
}

/// Evaluate `setup` at the lower-left corner `(ix * dxy, iy * dxy)` of every
/// cell of `grid`.
pub fn sample_initial_state(setup: &dyn Setup, grid: &TargetGrid) -> Result<InitialState> {
    let cells = grid.cell_count();
    let mut height = Vec::with_capacity(cells);
    let mut momentum_x = Vec::with_capacity(cells);
    let mut momentum_y = Vec::with_capacity(cells);
    let mut bathymetry = Vec::with_capacity(cells);

    for iy in 0..grid.ny {
        let y = iy as f64 * grid.cell_size;
        for ix in 0..grid.nx {
            let x = ix as f64 * grid.cell_size;
            height.push(setup.height(x, y)?);
            momentum_x.push(setup.momentum_x(x, y)?);
            momentum_y.push(setup.momentum_y(x, y)?);
            bathymetry.push(setup.bathymetry(x, y)?);
        }
    }

    debug!(nx = grid.nx, ny = grid.ny, "Sampled initial state");

    Ok(InitialState {
        grid: *grid,
        height,
        momentum_x,
        momentum_y,
        bathymetry,
    })
}
