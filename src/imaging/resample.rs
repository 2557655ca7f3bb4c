//! Deterministic crop/pad resizing of pixel grids.
//!
//! Each axis is resized independently by exactly `|old - new|` units, either
//! cropped away or zero-padded, with the split between the two edges chosen
//! by an alignment policy. Cells that survive the resize keep their values
//! exactly.

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::imaging::grid::PixelGrid;

/// Edge policy for the column axis.
///
/// `Even` splits the delta between both edges, with the extra unit going to
/// the right (high-index) edge when the delta is odd. `Left`/`Right` apply
/// the whole delta at that edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlignment {
    #[default]
    Even,
    Left,
    Right,
}

/// Edge policy for the row axis; `Even` sends the odd extra unit to the
/// bottom (high-index) edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlignment {
    #[default]
    Even,
    Top,
    Bottom,
}

impl FromStr for HorizontalAlignment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "even" => Ok(HorizontalAlignment::Even),
            "left" => Ok(HorizontalAlignment::Left),
            "right" => Ok(HorizontalAlignment::Right),
            other => Err(Error::UnknownAlignment(other.to_string())),
        }
    }
}

impl FromStr for VerticalAlignment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "even" => Ok(VerticalAlignment::Even),
            "top" => Ok(VerticalAlignment::Top),
            "bottom" => Ok(VerticalAlignment::Bottom),
            other => Err(Error::UnknownAlignment(other.to_string())),
        }
    }
}

/// How much of the axis delta lands on the low-index edge.
fn low_edge_share(delta: u32, all_low: bool, all_high: bool) -> u32 {
    if all_low {
        delta
    } else if all_high {
        0
    } else {
        // even split, extra unit to the high-index edge
        delta / 2
    }
}

struct AxisPlan {
    src_start: u32,
    src_len: u32,
    dst_start: u32,
}

fn plan_axis(old: u32, new: u32, all_low: bool, all_high: bool) -> AxisPlan {
    if new <= old {
        AxisPlan {
            src_start: low_edge_share(old - new, all_low, all_high),
            src_len: new,
            dst_start: 0,
        }
    } else {
        AxisPlan {
            src_start: 0,
            src_len: old,
            dst_start: low_edge_share(new - old, all_low, all_high),
        }
    }
}

/// Resizes `grid` to `new_columns` x `new_rows`.
///
/// The axes are planned independently and composed in a single pass, so the
/// result equals applying either axis first.
pub fn resize(
    grid: &PixelGrid,
    new_columns: u32,
    new_rows: u32,
    horizontal: HorizontalAlignment,
    vertical: VerticalAlignment,
) -> PixelGrid {
    let cols = plan_axis(
        grid.columns(),
        new_columns,
        horizontal == HorizontalAlignment::Left,
        horizontal == HorizontalAlignment::Right,
    );
    let rows = plan_axis(
        grid.rows(),
        new_rows,
        vertical == VerticalAlignment::Top,
        vertical == VerticalAlignment::Bottom,
    );

    let kept = grid.window(cols.src_start, rows.src_start, cols.src_len, rows.src_len);
    let mut out = PixelGrid::zeros(new_columns, new_rows);
    kept.blit_into(&mut out, cols.dst_start, rows.dst_start);
    out
}

#[cfg(test)]
mod resample_tests {
    use super::*;
    use crate::utils::test_utils::filled_grid;

    fn marked_columns(grid: &mut PixelGrid, cols: &[i32]) {
        let (ncols, nrows) = (grid.columns() as i32, grid.rows() as i32);
        let mut indices = Vec::new();
        for r in 0..nrows {
            for &c in cols {
                let c = if c < 0 { ncols + c } else { c };
                indices.push((r * ncols + c) as usize);
            }
        }
        grid.set_pixels(&indices, -1).unwrap();
    }

    fn marked_rows(grid: &mut PixelGrid, rows: &[i32]) {
        let (ncols, nrows) = (grid.columns() as i32, grid.rows() as i32);
        let mut indices = Vec::new();
        for &r in rows {
            let r = if r < 0 { nrows + r } else { r };
            for c in 0..ncols {
                indices.push((r * ncols + c) as usize);
            }
        }
        grid.set_pixels(&indices, -1).unwrap();
    }

    #[test]
    fn test_even_crop_columns_symmetric() {
        let mut grid = filled_grid(4, 4, 1);
        marked_columns(&mut grid, &[0, -1]);
        let out = resize(&grid, 2, 4, HorizontalAlignment::Even, VerticalAlignment::Even);
        assert_eq!(out, filled_grid(2, 4, 1));
    }

    #[test]
    fn test_even_crop_columns_asymmetric_drops_right() {
        let mut grid = filled_grid(4, 4, 1);
        marked_columns(&mut grid, &[-1]);
        let out = resize(&grid, 3, 4, HorizontalAlignment::Even, VerticalAlignment::Even);
        assert_eq!(out, filled_grid(3, 4, 1));
    }

    #[test]
    fn test_left_crop_columns() {
        let mut grid = filled_grid(4, 4, 1);
        marked_columns(&mut grid, &[0, 1]);
        let out = resize(&grid, 2, 4, HorizontalAlignment::Left, VerticalAlignment::Even);
        assert_eq!(out, filled_grid(2, 4, 1));
    }

    #[test]
    fn test_right_crop_columns() {
        let mut grid = filled_grid(4, 4, 1);
        marked_columns(&mut grid, &[-2, -1]);
        let out = resize(&grid, 2, 4, HorizontalAlignment::Right, VerticalAlignment::Even);
        assert_eq!(out, filled_grid(2, 4, 1));
    }

    #[test]
    fn test_even_pad_columns_symmetric() {
        let grid = filled_grid(4, 4, 1);
        let out = resize(&grid, 6, 4, HorizontalAlignment::Even, VerticalAlignment::Even);
        let mut expected = PixelGrid::zeros(6, 4);
        filled_grid(4, 4, 1).blit_into(&mut expected, 1, 0);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_even_pad_columns_asymmetric_pads_right() {
        let grid = filled_grid(4, 4, 1);
        let out = resize(&grid, 5, 4, HorizontalAlignment::Even, VerticalAlignment::Even);
        let mut expected = PixelGrid::zeros(5, 4);
        filled_grid(4, 4, 1).blit_into(&mut expected, 0, 0);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_left_pad_columns() {
        let grid = filled_grid(4, 4, 1);
        let out = resize(&grid, 6, 4, HorizontalAlignment::Left, VerticalAlignment::Even);
        let mut expected = PixelGrid::zeros(6, 4);
        filled_grid(4, 4, 1).blit_into(&mut expected, 2, 0);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_right_pad_columns() {
        let grid = filled_grid(4, 4, 1);
        let out = resize(&grid, 6, 4, HorizontalAlignment::Right, VerticalAlignment::Even);
        let mut expected = PixelGrid::zeros(6, 4);
        filled_grid(4, 4, 1).blit_into(&mut expected, 0, 0);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_even_crop_rows_symmetric() {
        let mut grid = filled_grid(4, 4, 1);
        marked_rows(&mut grid, &[0, -1]);
        let out = resize(&grid, 4, 2, HorizontalAlignment::Even, VerticalAlignment::Even);
        assert_eq!(out, filled_grid(4, 2, 1));
    }

    #[test]
    fn test_even_crop_rows_asymmetric_drops_bottom() {
        let mut grid = filled_grid(4, 4, 1);
        marked_rows(&mut grid, &[-1]);
        let out = resize(&grid, 4, 3, HorizontalAlignment::Even, VerticalAlignment::Even);
        assert_eq!(out, filled_grid(4, 3, 1));
    }

    #[test]
    fn test_top_and_bottom_crop_rows() {
        let mut grid = filled_grid(4, 4, 1);
        marked_rows(&mut grid, &[0, 1]);
        let out = resize(&grid, 4, 2, HorizontalAlignment::Even, VerticalAlignment::Top);
        assert_eq!(out, filled_grid(4, 2, 1));

        let mut grid = filled_grid(4, 4, 1);
        marked_rows(&mut grid, &[-2, -1]);
        let out = resize(&grid, 4, 2, HorizontalAlignment::Even, VerticalAlignment::Bottom);
        assert_eq!(out, filled_grid(4, 2, 1));
    }

    #[test]
    fn test_pad_rows_policies() {
        let grid = filled_grid(4, 4, 1);

        let out = resize(&grid, 4, 6, HorizontalAlignment::Even, VerticalAlignment::Even);
        let mut expected = PixelGrid::zeros(4, 6);
        filled_grid(4, 4, 1).blit_into(&mut expected, 0, 1);
        assert_eq!(out, expected);

        let out = resize(&grid, 4, 5, HorizontalAlignment::Even, VerticalAlignment::Even);
        let mut expected = PixelGrid::zeros(4, 5);
        filled_grid(4, 4, 1).blit_into(&mut expected, 0, 0);
        assert_eq!(out, expected);

        let out = resize(&grid, 4, 6, HorizontalAlignment::Even, VerticalAlignment::Top);
        let mut expected = PixelGrid::zeros(4, 6);
        filled_grid(4, 4, 1).blit_into(&mut expected, 0, 2);
        assert_eq!(out, expected);

        let out = resize(&grid, 4, 6, HorizontalAlignment::Even, VerticalAlignment::Bottom);
        let mut expected = PixelGrid::zeros(4, 6);
        filled_grid(4, 4, 1).blit_into(&mut expected, 0, 0);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_combined_axes_compose() {
        // crop columns while padding rows, values survive untouched
        let mut grid = filled_grid(4, 4, 1);
        marked_columns(&mut grid, &[0, 1]);
        let out = resize(&grid, 2, 6, HorizontalAlignment::Left, VerticalAlignment::Bottom);
        let mut expected = PixelGrid::zeros(2, 6);
        filled_grid(2, 4, 1).blit_into(&mut expected, 0, 0);
        assert_eq!(out, expected);

        // order independence: rows-then-columns equals columns-then-rows
        let grid = PixelGrid::indgen(5, 3);
        let via_cols_first = resize(
            &resize(&grid, 3, 3, HorizontalAlignment::Even, VerticalAlignment::Even),
            3,
            5,
            HorizontalAlignment::Even,
            VerticalAlignment::Even,
        );
        let via_rows_first = resize(
            &resize(&grid, 5, 5, HorizontalAlignment::Even, VerticalAlignment::Even),
            3,
            5,
            HorizontalAlignment::Even,
            VerticalAlignment::Even,
        );
        let direct = resize(&grid, 3, 5, HorizontalAlignment::Even, VerticalAlignment::Even);
        assert_eq!(via_cols_first, direct);
        assert_eq!(via_rows_first, direct);
    }

    #[test]
    fn test_alignment_parsing() {
        assert_eq!("even".parse::<HorizontalAlignment>().unwrap(), HorizontalAlignment::Even);
        assert_eq!("left".parse::<HorizontalAlignment>().unwrap(), HorizontalAlignment::Left);
        assert_eq!("bottom".parse::<VerticalAlignment>().unwrap(), VerticalAlignment::Bottom);
        assert!("diagonal".parse::<HorizontalAlignment>().is_err());
    }
}
