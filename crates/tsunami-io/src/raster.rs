//! Read-only access to bathymetry and displacement source rasters.
//!
//! A source raster is a NetCDF file with `x` and `y` coordinate variables
//! over same-named dimensions and a 2D `z` data variable. Both the GMT
//! layout `z(y, x)` and the transposed `z(x, y)` are accepted.

use std::path::Path;

use nc_store::{StoreError, StoreReader};
use tracing::{debug, info};

use crate::error::{Result, TsunamiIoError};
use crate::types::RasterMetadata;

const DIM_X: &str = "x";
const DIM_Y: &str = "y";
const VAR_Z: &str = "z";

/// Order of the `z` variable's dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ZLayout {
    /// `z(y, x)`, x varies fastest.
    RowsY,
    /// `z(x, y)`, y varies fastest.
    RowsX,
}

/// An open source raster.
pub struct SourceRaster {
    store: StoreReader,
    metadata: RasterMetadata,
    layout: ZLayout,
}

impl SourceRaster {
    /// Open a raster and read its extents.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let store = StoreReader::open(path)?;

        let x_length = store.dimension_len(DIM_X)?;
        let y_length = store.dimension_len(DIM_Y)?;
        if x_length < 2 || y_length < 2 {
            return Err(TsunamiIoError::degenerate(format!(
                "{} has {}x{} samples, need at least 2 per axis",
                path.display(),
                x_length,
                y_length
            )));
        }

        let layout = match store.variable_dimensions(VAR_Z)?.as_slice() {
            [outer, inner] if outer == DIM_Y && inner == DIM_X => ZLayout::RowsY,
            [outer, inner] if outer == DIM_X && inner == DIM_Y => ZLayout::RowsX,
            other => {
                return Err(StoreError::InvalidFormat(format!(
                    "{}: z must span (y, x) or (x, y), found {:?}",
                    path.display(),
                    other
                ))
                .into())
            }
        };

        let metadata = RasterMetadata::from_extents(
            x_length,
            y_length,
            store.read_endpoints(DIM_X)?,
            store.read_endpoints(DIM_Y)?,
        )?;

        info!(
            path = %path.display(),
            x_length,
            y_length,
            cell_size = metadata.cell_size,
            ?layout,
            "Opened source raster"
        );

        Ok(Self {
            store,
            metadata,
            layout,
        })
    }

    /// Extents and spacing of the raster.
    pub fn extent(&self) -> &RasterMetadata {
        &self.metadata
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Read the sample at raster-native indices.
    pub fn sample_nearest(&self, ix: usize, iy: usize) -> Result<f64> {
        let meta = &self.metadata;
        if ix >= meta.x_length || iy >= meta.y_length {
            return Err(TsunamiIoError::out_of_range(
                self.path().display().to_string(),
                (ix as i64, iy as i64),
                (meta.x_length, meta.y_length),
            ));
        }

        let index = match self.layout {
            ZLayout::RowsY => [iy, ix],
            ZLayout::RowsX => [ix, iy],
        };
        Ok(self.store.read_scalar(VAR_Z, index)?)
    }

    /// Release the file handle.
    pub fn close(self) {
        debug!(path = %self.path().display(), "Closing source raster");
        self.store.close();
    }
}

impl std::fmt::Debug for SourceRaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRaster")
            .field("path", &self.path())
            .field("metadata", &self.metadata)
            .field("layout", &self.layout)
            .finish()
    }
}
