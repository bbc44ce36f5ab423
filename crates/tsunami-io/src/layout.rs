//! Conversions between the solver's strided buffers and packed store order.

use crate::error::{Result, TsunamiIoError};

/// Copy the `nx` x `ny` interior of a strided buffer into a packed
/// row-major buffer, narrowing to the store's single precision.
///
/// Element `(col, row)` is read from `row * stride + col` and written to
/// `row * nx + col`. Columns past `nx` in each row (ghost cells, padding)
/// are skipped.
pub fn destride(buffer: &[f64], stride: usize, nx: usize, ny: usize) -> Result<Vec<f32>> {
    if nx == 0 || ny == 0 {
        return Err(TsunamiIoError::invalid_buffer(format!(
            "grid {}x{} has no cells",
            nx, ny
        )));
    }
    if stride < nx {
        return Err(TsunamiIoError::invalid_buffer(format!(
            "stride {} is smaller than nx {}",
            stride, nx
        )));
    }

    let required = (ny - 1)
        .checked_mul(stride)
        .and_then(|rows| rows.checked_add(nx))
        .ok_or_else(|| {
            TsunamiIoError::invalid_buffer(format!(
                "{} rows at stride {} overflow the address space",
                ny, stride
            ))
        })?;
    if buffer.len() < required {
        return Err(TsunamiIoError::invalid_buffer(format!(
            "buffer holds {} values, {}x{} at stride {} needs {}",
            buffer.len(),
            nx,
            ny,
            stride,
            required
        )));
    }

    let mut packed = Vec::with_capacity(nx * ny);
    for row in buffer.chunks(stride).take(ny) {
        packed.extend(row[..nx].iter().map(|&value| value as f32));
    }
    Ok(packed)
}

/// Cell-centre coordinates `(i + 0.5) * cell_size` for `n` cells.
pub fn cell_centers(n: usize, cell_size: f64) -> Vec<f64> {
    (0..n).map(|i| (i as f64 + 0.5) * cell_size).collect()
}
