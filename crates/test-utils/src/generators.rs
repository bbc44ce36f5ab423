//! Generators for synthetic seabeds, uplifts and solver buffers.
//!
//! These produce predictable, verifiable values for the test suite.

/// Seabed at `depth` below sea level at `x = 0`, sloping up towards
/// positive x by `slope` metres per metre.
///
/// # Example
///
/// ```
/// use test_utils::sloped_seabed;
///
/// let seabed = sloped_seabed(100.0, 0.01);
/// assert_eq!(seabed(0.0, 0.0), -100.0);
/// assert_eq!(seabed(1000.0, 5.0), -90.0);
/// ```
pub fn sloped_seabed(depth: f64, slope: f64) -> impl Fn(f64, f64) -> f64 {
    move |x, _y| -depth + slope * x
}

/// Gaussian sea-floor uplift of `amplitude` metres centred at `center`.
pub fn gaussian_uplift(center: (f64, f64), radius: f64, amplitude: f64) -> impl Fn(f64, f64) -> f64 {
    move |x, y| {
        let dx = x - center.0;
        let dy = y - center.1;
        amplitude * (-(dx * dx + dy * dy) / (radius * radius)).exp()
    }
}

/// Creates a packed grid with values `col * 1000 + row`.
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50);
/// assert_eq!(grid[1], 1000.0);
/// assert_eq!(grid[10], 1.0);
/// ```
pub fn create_test_grid(nx: usize, ny: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(nx * ny);
    for row in 0..ny {
        for col in 0..nx {
            data.push((col * 1000 + row) as f64);
        }
    }
    data
}

/// Lay a packed `nx` x `ny` grid out with row stride `stride`, filling the
/// extra columns with `pad`, the way a solver with ghost cells stores it.
pub fn pad_rows(packed: &[f64], nx: usize, stride: usize, pad: f64) -> Vec<f64> {
    assert!(stride >= nx, "stride must be at least nx");
    packed
        .chunks(nx)
        .flat_map(|row| {
            row.iter()
                .copied()
                .chain(std::iter::repeat(pad).take(stride - nx))
        })
        .collect()
}
