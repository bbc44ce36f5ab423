//! The fixed on-disk layout of a snapshot file.
//!
//! ```text
//! dimensions:
//!     x = nx ; y = ny ; time = UNLIMITED ;
//! variables:
//!     double x(x) ;                      x:units = "m" ;
//!     double y(y) ;                      y:units = "m" ;
//!     double time(time) ;                time:units = "s" ;
//!     float height(time, y, x) ;         height:units = "m" ;
//!     float momentum_x(time, y, x) ;     momentum_x:units = "m/s" ;
//!     float momentum_y(time, y, x) ;     momentum_y:units = "m/s" ;
//!     float bathymetry(y, x) ;           bathymetry:units = "m" ;   (optional)
//! ```
//!
//! Fields are declared with `x` as the fastest-varying dimension so a packed
//! `row * nx + col` buffer maps onto the variable without reordering.

use chrono::Utc;
use nc_store::{StoreWriter, ValueKind, VariableSpec};

use crate::error::Result;
use crate::types::{Field, TargetGrid};

pub const DIM_X: &str = "x";
pub const DIM_Y: &str = "y";
pub const DIM_TIME: &str = "time";

pub const VAR_X: &str = "x";
pub const VAR_Y: &str = "y";
pub const VAR_TIME: &str = "time";
pub const VAR_BATHYMETRY: &str = "bathymetry";

/// Global attribute holding the grid's cell size in metres.
pub const ATTR_CELL_SIZE: &str = "cell_size";
/// Global attribute holding the layout version.
pub const ATTR_SCHEMA_VERSION: &str = "snapshot_schema_version";
pub const SCHEMA_VERSION: &str = "1";
/// Global attribute holding the solver steps between stored slices.
pub const ATTR_WRITE_FREQUENCY: &str = "write_frequency";

const METER: &str = "m";

/// Add every dimension, variable and global attribute of the snapshot
/// layout. The store must be in its define phase.
pub(crate) fn define_schema(
    store: &mut StoreWriter,
    grid: &TargetGrid,
    with_bathymetry: bool,
    write_frequency: usize,
    title: Option<&str>,
) -> Result<()> {
    store.define_dimension(DIM_X, grid.nx)?;
    store.define_dimension(DIM_Y, grid.ny)?;
    store.define_unlimited_dimension(DIM_TIME)?;

    store.define_variable(
        &VariableSpec::new(VAR_X, &[DIM_X], ValueKind::F64)
            .units(METER)
            .attribute("long_name", "cell centre x"),
    )?;
    store.define_variable(
        &VariableSpec::new(VAR_Y, &[DIM_Y], ValueKind::F64)
            .units(METER)
            .attribute("long_name", "cell centre y"),
    )?;
    store.define_variable(
        &VariableSpec::new(VAR_TIME, &[DIM_TIME], ValueKind::F64)
            .units("s")
            .attribute("long_name", "simulation time"),
    )?;

    for field in Field::ALL {
        store.define_variable(
            &VariableSpec::new(field.name(), &[DIM_TIME, DIM_Y, DIM_X], ValueKind::F32)
                .units(field.units()),
        )?;
    }

    if with_bathymetry {
        store.define_variable(
            &VariableSpec::new(VAR_BATHYMETRY, &[DIM_Y, DIM_X], ValueKind::F32).units(METER),
        )?;
    }

    store.put_global_attribute("Conventions", "CF-1.8")?;
    store.put_global_attribute(ATTR_SCHEMA_VERSION, SCHEMA_VERSION)?;
    store.put_global_attribute(ATTR_CELL_SIZE, grid.cell_size)?;
    store.put_global_attribute(ATTR_WRITE_FREQUENCY, write_frequency as f64)?;
    if let Some(title) = title {
        store.put_global_attribute("title", title)?;
    }
    let history = format!(
        "{}: created by tsunami-io",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );
    store.put_global_attribute("history", history.as_str())?;

    Ok(())
}
