pub mod frame;
pub mod grid;
pub mod resample;

pub use frame::SliceFrame;
pub use grid::PixelGrid;
pub use resample::{HorizontalAlignment, VerticalAlignment};
