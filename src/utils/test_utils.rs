use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dose::distribution::VolumeRef;
use crate::imaging::frame::SliceFrame;
use crate::imaging::grid::PixelGrid;

/// Volume reference shared by most dose tests.
pub fn new_volume() -> VolumeRef {
    VolumeRef::new("1.345.789")
}

/// `n` copies of the same dose value.
pub fn uniform_doses(value: f64, n: usize) -> Vec<f64> {
    vec![value; n]
}

/// The doses `0.0, 1.0, ..., n-1` in order.
pub fn graded_doses(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}

/// `n` positive doses spread around `center`, reproducible across runs.
pub fn noisy_doses(center: f64, n: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|_| (center + rng.random_range(-0.1 * center..0.1 * center)).max(0.0))
        .collect()
}

/// A grid with every pixel set to `value`.
pub fn filled_grid(columns: u32, rows: u32, value: i32) -> PixelGrid {
    PixelGrid::from_flat(columns, rows, vec![value; columns as usize * rows as usize]).unwrap()
}

/// A frame at position (-5, -3, 50) with column spacing 2.0 and row spacing
/// 3.0, matching the literal geometry cases used throughout the tests.
pub fn standard_frame(cosines: [f64; 6]) -> SliceFrame {
    let mut frame = SliceFrame::new();
    frame.set_pos_x(-5.0);
    frame.set_pos_y(-3.0);
    frame.set_pos_slice(50.0);
    frame.set_col_spacing(2.0).unwrap();
    frame.set_row_spacing(3.0).unwrap();
    frame.set_cosines(cosines);
    frame
}
