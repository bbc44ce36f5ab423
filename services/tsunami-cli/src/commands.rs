//! Subcommand implementations.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde_json::json;
use tracing::info;
use tsunami_io::{
    sample_initial_state, Field, SnapshotReader, SnapshotWriterBuilder, SourceRaster, TargetGrid,
    TsunamiEvent, TsunamiIoConfig,
};

/// Print a raster's extent and the grid derived for `nx` cells.
pub fn grid(bathymetry: &Path, nx: usize, as_json: bool) -> Result<()> {
    let raster = SourceRaster::open(bathymetry)
        .with_context(|| format!("Failed to open bathymetry {}", bathymetry.display()))?;
    let extent = *raster.extent();
    raster.close();

    let grid = TargetGrid::derive(&extent, nx).context("Failed to derive target grid")?;

    if as_json {
        let report = json!({
            "raster": extent,
            "grid": grid,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Bathymetry: {}", bathymetry.display());
    println!("  Samples:   {} x {}", extent.x_length, extent.y_length);
    println!("  X range:   [{}, {}]", extent.min_x, extent.max_x);
    println!("  Y range:   [{}, {}]", extent.min_y, extent.max_y);
    println!("  Cell size: {}", extent.cell_size);
    println!("Target grid:");
    println!("  Cells:     {} x {}", grid.nx, grid.ny);
    println!("  Cell size: {}", grid.cell_size);
    println!("  Domain:    {} x {}", grid.width(), grid.height());
    Ok(())
}

/// Write the initial snapshot of a tsunami event.
pub fn init(config_path: Option<&Path>, nx: Option<usize>, output: Option<PathBuf>) -> Result<()> {
    let mut config = match config_path {
        Some(path) => {
            let mut config = TsunamiIoConfig::from_yaml_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            config.apply_env();
            config
        }
        None => TsunamiIoConfig::from_env(),
    };
    if let Some(nx) = nx {
        config.nx = nx;
    }
    if let Some(output) = output {
        config.output_path = output;
    }
    config.validate().map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    info!(
        bathymetry = %config.bathymetry_path.display(),
        displacement = %config.displacement_path.display(),
        output = %config.output_path.display(),
        nx = config.nx,
        write_frequency = config.write_frequency,
        "Writing initial snapshot"
    );

    let mut writer = SnapshotWriterBuilder::from_config(&config)
        .build()
        .context("Failed to create snapshot writer")?;
    let grid = *writer.grid();

    let sources = writer
        .sources()
        .ok_or_else(|| anyhow!("Snapshot writer has no source rasters"))?;
    let state = sample_initial_state(&TsunamiEvent::new(sources), &grid)
        .context("Failed to sample initial state")?;

    if config.store_bathymetry {
        writer
            .write_bathymetry(&state.bathymetry, state.stride())
            .context("Failed to write bathymetry")?;
    }
    // solver step 0 is always on the write schedule
    writer
        .write_step(
            &state.height,
            &state.momentum_x,
            &state.momentum_y,
            state.stride(),
            0,
            0.0,
        )
        .context("Failed to write initial time slice")?;
    writer.close();

    println!(
        "Wrote {} ({} x {} cells of {} m)",
        config.output_path.display(),
        grid.nx,
        grid.ny,
        grid.cell_size
    );
    Ok(())
}

/// Print grid, time axis and per-step height range of a snapshot.
pub fn inspect(snapshot: &Path, as_json: bool) -> Result<()> {
    let reader = SnapshotReader::open(snapshot)
        .with_context(|| format!("Failed to open snapshot {}", snapshot.display()))?;
    let grid = *reader.grid();
    let steps = reader.time_steps()?;

    let mut rows = Vec::with_capacity(steps);
    for step in 0..steps {
        let slice = reader
            .read_time_slice(step)
            .with_context(|| format!("Failed to read time slice {}", step))?;
        rows.push((step, slice.time, slice.min_max(Field::Height)));
    }

    if as_json {
        let report = json!({
            "path": snapshot.display().to_string(),
            "grid": grid,
            "bathymetry": reader.has_bathymetry(),
            "steps": rows
                .iter()
                .map(|(step, time, range)| json!({
                    "step": step,
                    "time": time,
                    "height_min": range.map(|r| r.0),
                    "height_max": range.map(|r| r.1),
                }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Snapshot: {}", snapshot.display());
    println!("  Cells:      {} x {}", grid.nx, grid.ny);
    println!("  Cell size:  {}", grid.cell_size);
    println!("  Bathymetry: {}", if reader.has_bathymetry() { "yes" } else { "no" });
    println!("  Time steps: {}", steps);
    for (step, time, range) in rows {
        match range {
            Some((lo, hi)) => println!("  [{:>4}] t = {:<10} height [{}, {}]", step, time, lo, hi),
            None => println!("  [{:>4}] t = {:<10} height (no finite values)", step, time),
        }
    }
    Ok(())
}
