//! The bathymetry/displacement raster pair of a tsunami event.

use std::path::Path;

use tracing::{debug, info};

use crate::error::Result;
use crate::raster::SourceRaster;
use crate::resample::GridResampler;
use crate::types::{EdgePolicy, TargetGrid};

/// Both source rasters of an event plus the resampler that maps simulation
/// cells onto them.
#[derive(Debug)]
pub struct TsunamiSources {
    bathymetry: SourceRaster,
    displacement: SourceRaster,
    resampler: GridResampler,
}

impl TsunamiSources {
    /// Open both rasters and derive a grid of `nx` cells from the bathymetry.
    pub fn open(
        bathymetry_path: impl AsRef<Path>,
        displacement_path: impl AsRef<Path>,
        nx: usize,
        edge_policy: EdgePolicy,
    ) -> Result<Self> {
        let bathymetry = SourceRaster::open(bathymetry_path)?;
        let displacement = SourceRaster::open(displacement_path)?;

        let resampler = GridResampler::new(
            *bathymetry.extent(),
            *displacement.extent(),
            nx,
            edge_policy,
        )?;

        let grid = resampler.grid();
        info!(
            nx = grid.nx,
            ny = grid.ny,
            cell_size = grid.cell_size,
            %edge_policy,
            "Derived target grid from bathymetry"
        );

        Ok(Self {
            bathymetry,
            displacement,
            resampler,
        })
    }

    pub fn grid(&self) -> &TargetGrid {
        self.resampler.grid()
    }

    pub fn resampler(&self) -> &GridResampler {
        &self.resampler
    }

    pub fn bathymetry(&self) -> &SourceRaster {
        &self.bathymetry
    }

    pub fn displacement(&self) -> &SourceRaster {
        &self.displacement
    }

    /// Bathymetry without displacement at the domain coordinate `(x, y)`.
    pub fn raw_bathymetry(&self, x: f64, y: f64) -> Result<f64> {
        let (ix, iy) = self.resampler.bathymetry_index_for(x, y)?;
        self.bathymetry.sample_nearest(ix, iy)
    }

    /// Displacement at the domain coordinate `(x, y)`; `None` outside the
    /// displacement window.
    pub fn displacement_at(&self, x: f64, y: f64) -> Result<Option<f64>> {
        match self.resampler.displacement_index_for(x, y) {
            Some((ix, iy)) => self.displacement.sample_nearest(ix, iy).map(Some),
            None => Ok(None),
        }
    }

    /// Release both raster handles.
    pub fn close(self) {
        debug!("Closing tsunami sources");
        self.bathymetry.close();
        self.displacement.close();
    }
}
