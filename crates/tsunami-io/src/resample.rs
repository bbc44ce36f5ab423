//! Nearest-neighbour mapping from simulation cells to source samples.
//!
//! Bathymetry is looked up by scaling the target cell index into raster
//! units. Displacement is looked up by world position, anchored at the
//! bathymetry raster's minimum, and is allowed to miss: outside its window
//! there is simply no displacement.

use crate::error::{Result, TsunamiIoError};
use crate::types::{EdgePolicy, RasterMetadata, ScalingFactors, TargetGrid};

/// Fractional source index for a domain coordinate along one axis.
///
/// `floor(scale * coord / cell_size + scale * 0.5)`: the coordinate is
/// converted to a target cell index, scaled into source samples and shifted
/// by half a target cell so it lands on the nearest sample.
pub fn nearest_source_index(coord: f64, scale: f64, cell_size: f64) -> f64 {
    (scale * coord / cell_size + scale * 0.5).floor()
}

/// Maps target-grid coordinates onto the bathymetry and displacement rasters.
#[derive(Debug, Clone)]
pub struct GridResampler {
    bathymetry: RasterMetadata,
    displacement: RasterMetadata,
    grid: TargetGrid,
    scaling: ScalingFactors,
    edge_policy: EdgePolicy,
}

impl GridResampler {
    /// Derive the target grid for `nx` cells from the bathymetry extent.
    pub fn new(
        bathymetry: RasterMetadata,
        displacement: RasterMetadata,
        nx: usize,
        edge_policy: EdgePolicy,
    ) -> Result<Self> {
        let grid = TargetGrid::derive(&bathymetry, nx)?;
        let scaling = ScalingFactors::between(&bathymetry, &grid);

        Ok(Self {
            bathymetry,
            displacement,
            grid,
            scaling,
            edge_policy,
        })
    }

    /// Rebuild the target grid for a new cell count; scaling follows.
    pub fn retarget(&mut self, nx: usize) -> Result<()> {
        self.grid = TargetGrid::derive(&self.bathymetry, nx)?;
        self.scaling = ScalingFactors::between(&self.bathymetry, &self.grid);
        Ok(())
    }

    pub fn grid(&self) -> &TargetGrid {
        &self.grid
    }

    pub fn scaling(&self) -> ScalingFactors {
        self.scaling
    }

    pub fn bathymetry_extent(&self) -> &RasterMetadata {
        &self.bathymetry
    }

    pub fn displacement_extent(&self) -> &RasterMetadata {
        &self.displacement
    }

    pub fn edge_policy(&self) -> EdgePolicy {
        self.edge_policy
    }

    /// Bathymetry sample indices for the domain coordinate `(x, y)`.
    ///
    /// Under [`EdgePolicy::Strict`] an index outside the raster is an
    /// `OutOfRangeLookup` error; under [`EdgePolicy::Clamp`] it is pulled
    /// onto the nearest edge sample. Non-finite coordinates always fail.
    pub fn bathymetry_index_for(&self, x: f64, y: f64) -> Result<(usize, usize)> {
        let cell = self.grid.cell_size;
        let raw_x = nearest_source_index(x, self.scaling.x, cell);
        let raw_y = nearest_source_index(y, self.scaling.y, cell);

        let max_x = (self.bathymetry.x_length - 1) as f64;
        let max_y = (self.bathymetry.y_length - 1) as f64;
        let inside = (0.0..=max_x).contains(&raw_x) && (0.0..=max_y).contains(&raw_y);

        if inside {
            return Ok((raw_x as usize, raw_y as usize));
        }

        if self.edge_policy == EdgePolicy::Clamp && raw_x.is_finite() && raw_y.is_finite() {
            return Ok((raw_x.clamp(0.0, max_x) as usize, raw_y.clamp(0.0, max_y) as usize));
        }

        Err(TsunamiIoError::out_of_range(
            "bathymetry",
            (saturating_index(raw_x), saturating_index(raw_y)),
            (self.bathymetry.x_length, self.bathymetry.y_length),
        ))
    }

    /// Displacement sample indices for the domain coordinate `(x, y)`, or
    /// `None` when the position lies outside the displacement window.
    ///
    /// The window is closed and reaches half a displacement cell past the
    /// outermost samples. Positions in the lower half-cell map to sample 0.
    pub fn displacement_index_for(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let pos_x = x + self.bathymetry.min_x;
        let pos_y = y + self.bathymetry.min_y;

        let displ = &self.displacement;
        if !displ.contains_with_margin(pos_x, pos_y) {
            return None;
        }

        let ix = ((pos_x - displ.min_x) / displ.cell_size).floor();
        let iy = ((pos_y - displ.min_y) / displ.cell_size).floor();

        Some((
            ix.clamp(0.0, (displ.x_length - 1) as f64) as usize,
            iy.clamp(0.0, (displ.y_length - 1) as f64) as usize,
        ))
    }
}

fn saturating_index(raw: f64) -> i64 {
    if raw.is_nan() {
        i64::MIN
    } else {
        raw as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster(x_length: usize, x: (f64, f64), y_length: usize, y: (f64, f64)) -> RasterMetadata {
        RasterMetadata::from_extents(x_length, y_length, x, y).unwrap()
    }

    /// 3x4 bathymetry over [0, 100] x [0, 150] resampled onto 2 cells in x.
    fn scenario(policy: EdgePolicy) -> GridResampler {
        let bathymetry = raster(3, (0.0, 100.0), 4, (0.0, 150.0));
        let displacement = raster(3, (20.0, 60.0), 3, (20.0, 60.0));
        GridResampler::new(bathymetry, displacement, 2, policy).unwrap()
    }

    #[test]
    fn test_nearest_source_index() {
        // scale 1.5, cell 75: cell 0 -> sample 0, cell 1 -> sample 2
        assert_eq!(nearest_source_index(0.0, 1.5, 75.0), 0.0);
        assert_eq!(nearest_source_index(75.0, 1.5, 75.0), 2.0);
    }

    #[test]
    fn test_bathymetry_index_for_cell_corners() {
        let resampler = scenario(EdgePolicy::Strict);
        let grid = *resampler.grid();
        assert_eq!(grid.ny, 3);

        assert_eq!(resampler.bathymetry_index_for(0.0, 0.0).unwrap(), (0, 0));
        assert_eq!(resampler.bathymetry_index_for(75.0, 75.0).unwrap(), (2, 2));
        assert_eq!(resampler.bathymetry_index_for(75.0, 150.0).unwrap(), (2, 3));
    }

    #[test]
    fn test_every_corner_maps_inside_raster() {
        let bathymetry = raster(37, (-500.0, 1300.0), 23, (100.0, 1200.0));
        let displacement = raster(2, (0.0, 1.0), 2, (0.0, 1.0));

        for nx in [1, 5, 36, 37, 80] {
            let resampler =
                GridResampler::new(bathymetry, displacement, nx, EdgePolicy::Strict).unwrap();
            let grid = *resampler.grid();
            for iy in 0..grid.ny {
                for ix in 0..grid.nx {
                    let x = ix as f64 * grid.cell_size;
                    let y = iy as f64 * grid.cell_size;
                    assert!(
                        resampler.bathymetry_index_for(x, y).is_ok(),
                        "cell ({}, {}) of {}x{} missed the raster",
                        ix,
                        iy,
                        grid.nx,
                        grid.ny
                    );
                }
            }
        }
    }

    #[test]
    fn test_bathymetry_miss_is_error_when_strict() {
        let resampler = scenario(EdgePolicy::Strict);
        let err = resampler.bathymetry_index_for(150.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            TsunamiIoError::OutOfRangeLookup { index_x: 3, .. }
        ));

        assert!(resampler.bathymetry_index_for(-80.0, 0.0).is_err());
        assert!(resampler.bathymetry_index_for(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_bathymetry_miss_clamps_when_configured() {
        let resampler = scenario(EdgePolicy::Clamp);
        assert_eq!(resampler.bathymetry_index_for(150.0, 0.0).unwrap(), (2, 0));
        assert_eq!(resampler.bathymetry_index_for(-80.0, 400.0).unwrap(), (0, 3));
        assert!(resampler.bathymetry_index_for(f64::INFINITY, 0.0).is_err());
    }

    #[test]
    fn test_displacement_window_bounds() {
        // displacement samples at 20, 40, 60 on both axes, cell 20
        let resampler = scenario(EdgePolicy::Strict);

        // closed lower bound: exactly min - 0.5 * cell
        assert_eq!(resampler.displacement_index_for(10.0, 10.0), Some((0, 0)));
        // closed upper bound: exactly max + 0.5 * cell
        assert_eq!(resampler.displacement_index_for(70.0, 70.0), Some((2, 2)));

        assert_eq!(resampler.displacement_index_for(9.999, 40.0), None);
        assert_eq!(resampler.displacement_index_for(40.0, 70.001), None);
        assert_eq!(resampler.displacement_index_for(70.001, 40.0), None);
        assert_eq!(resampler.displacement_index_for(40.0, 9.999), None);
    }

    #[test]
    fn test_displacement_samples_on_grid_points() {
        let resampler = scenario(EdgePolicy::Strict);
        assert_eq!(resampler.displacement_index_for(20.0, 20.0), Some((0, 0)));
        assert_eq!(resampler.displacement_index_for(40.0, 60.0), Some((1, 2)));
        assert_eq!(resampler.displacement_index_for(60.0, 40.0), Some((2, 1)));
    }

    #[test]
    fn test_displacement_anchored_at_bathymetry_minimum() {
        let bathymetry = raster(3, (1000.0, 1100.0), 3, (-50.0, 50.0));
        let displacement = raster(3, (1000.0, 1040.0), 3, (-50.0, -10.0));
        let resampler =
            GridResampler::new(bathymetry, displacement, 3, EdgePolicy::Strict).unwrap();

        // domain (20, 20) is world (1020, -30)
        assert_eq!(resampler.displacement_index_for(20.0, 20.0), Some((1, 1)));
        // world y = 10 lies past the displacement y window even though x is inside
        assert_eq!(resampler.displacement_index_for(20.0, 60.0), None);
    }

    #[test]
    fn test_displacement_y_bound_uses_y_extent() {
        // x extent much wider than y extent: a y position inside the x range
        // but beyond the y range must still miss
        let bathymetry = raster(3, (0.0, 1000.0), 3, (0.0, 1000.0));
        let displacement = raster(11, (0.0, 1000.0), 2, (0.0, 100.0));
        let resampler =
            GridResampler::new(bathymetry, displacement, 10, EdgePolicy::Strict).unwrap();

        assert!(resampler.displacement_index_for(500.0, 100.0).is_some());
        assert_eq!(resampler.displacement_index_for(500.0, 500.0), None);
    }

    #[test]
    fn test_retarget_recomputes_scaling() {
        let mut resampler = scenario(EdgePolicy::Strict);
        let before = resampler.scaling();
        resampler.retarget(4).unwrap();

        assert_eq!(resampler.grid().nx, 4);
        assert_eq!(resampler.scaling().x, before.x / 2.0);
        assert!(resampler.retarget(0).is_err());
    }
}
