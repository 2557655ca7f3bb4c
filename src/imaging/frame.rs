use nalgebra::{Matrix2, Vector2};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::imaging::grid::PixelGrid;
use crate::imaging::resample::{self, HorizontalAlignment, VerticalAlignment};

/// Placement of one 2D image slice in 3D patient space.
///
/// The frame carries the position of pixel (0, 0), the physical spacing per
/// index step, and the direction cosines of the column and row axes. The six
/// cosines are two 3D vectors `(c0, c1, c2)` (column direction) and
/// `(c3, c4, c5)` (row direction); oblique slices are permitted and the
/// vectors are not validated for unit length or orthogonality.
///
/// Every attribute starts unset and is assigned independently, mirroring how
/// the metadata trickles in from an external loader. No derived values are
/// cached; each transform recomputes from the current attributes and fails if
/// one it needs is still unset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SliceFrame {
    pos_x: Option<f64>,
    pos_y: Option<f64>,
    pos_slice: Option<f64>,
    col_spacing: Option<f64>,
    row_spacing: Option<f64>,
    cosines: Option<[f64; 6]>,
    columns: Option<u32>,
    rows: Option<u32>,
    pixels: Option<PixelGrid>,
}

impl SliceFrame {
    pub fn new() -> Self {
        SliceFrame::default()
    }

    pub fn pos_x(&self) -> Option<f64> {
        self.pos_x
    }

    pub fn pos_y(&self) -> Option<f64> {
        self.pos_y
    }

    pub fn pos_slice(&self) -> Option<f64> {
        self.pos_slice
    }

    pub fn col_spacing(&self) -> Option<f64> {
        self.col_spacing
    }

    pub fn row_spacing(&self) -> Option<f64> {
        self.row_spacing
    }

    pub fn cosines(&self) -> Option<[f64; 6]> {
        self.cosines
    }

    pub fn columns(&self) -> Option<u32> {
        self.columns
    }

    pub fn rows(&self) -> Option<u32> {
        self.rows
    }

    pub fn pixels(&self) -> Option<&PixelGrid> {
        self.pixels.as_ref()
    }

    pub fn set_pos_x(&mut self, value: f64) {
        self.pos_x = Some(value);
    }

    pub fn set_pos_y(&mut self, value: f64) {
        self.pos_y = Some(value);
    }

    pub fn set_pos_slice(&mut self, value: f64) {
        self.pos_slice = Some(value);
    }

    pub fn set_col_spacing(&mut self, value: f64) -> Result<()> {
        if value <= 0.0 {
            return Err(Error::NonPositiveSpacing(value));
        }
        self.col_spacing = Some(value);
        Ok(())
    }

    pub fn set_row_spacing(&mut self, value: f64) -> Result<()> {
        if value <= 0.0 {
            return Err(Error::NonPositiveSpacing(value));
        }
        self.row_spacing = Some(value);
        Ok(())
    }

    pub fn set_cosines(&mut self, cosines: [f64; 6]) {
        self.cosines = Some(cosines);
    }

    pub fn set_columns(&mut self, columns: u32) {
        self.columns = Some(columns);
    }

    pub fn set_rows(&mut self, rows: u32) {
        self.rows = Some(rows);
    }

    /// Attaches a pixel grid. The grid's shape must match the frame's
    /// declared `columns` x `rows`, which must be set first; the frame owns
    /// the grid exclusively from here on.
    pub fn attach_pixels(&mut self, grid: PixelGrid) -> Result<()> {
        let cols = self.require_u32(self.columns, "columns")?;
        let rows = self.require_u32(self.rows, "rows")?;
        if grid.columns() != cols || grid.rows() != rows {
            return Err(Error::GridShapeMismatch {
                cols,
                rows,
                data_cols: grid.columns(),
                data_rows: grid.rows(),
            });
        }
        self.pixels = Some(grid);
        Ok(())
    }

    fn require(&self, field: Option<f64>, name: &'static str) -> Result<f64> {
        field.ok_or(Error::MissingGeometry(name))
    }

    fn require_u32(&self, field: Option<u32>, name: &'static str) -> Result<u32> {
        field.ok_or(Error::MissingGeometry(name))
    }

    fn require_cosines(&self) -> Result<[f64; 6]> {
        self.cosines.ok_or(Error::MissingGeometry("cosines"))
    }

    /// Converts paired pixel indices to patient coordinates.
    ///
    /// For each pair `(ci, ri)` the affine map is
    /// `p = position + ci * col_spacing * col_dir + ri * row_spacing * row_dir`,
    /// evaluated elementwise over the whole input. Returns the x, y and z
    /// coordinate arrays.
    pub fn coordinates_from_indices(
        &self,
        col_indices: &[i32],
        row_indices: &[i32],
    ) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>)> {
        if col_indices.len() != row_indices.len() {
            return Err(Error::LengthMismatch {
                left: col_indices.len(),
                right: row_indices.len(),
            });
        }
        let x0 = self.require(self.pos_x, "pos_x")?;
        let y0 = self.require(self.pos_y, "pos_y")?;
        let z0 = self.require(self.pos_slice, "pos_slice")?;
        let cs = self.require(self.col_spacing, "col_spacing")?;
        let rs = self.require(self.row_spacing, "row_spacing")?;
        let [c0, c1, c2, c3, c4, c5] = self.require_cosines()?;

        let coords: Vec<(f64, f64, f64)> = col_indices
            .par_iter()
            .zip(row_indices.par_iter())
            .map(|(&ci, &ri)| {
                let (ci, ri) = (ci as f64, ri as f64);
                (
                    x0 + ci * cs * c0 + ri * rs * c3,
                    y0 + ci * cs * c1 + ri * rs * c4,
                    z0 + ci * cs * c2 + ri * rs * c5,
                )
            })
            .collect();

        let mut x = Vec::with_capacity(coords.len());
        let mut y = Vec::with_capacity(coords.len());
        let mut z = Vec::with_capacity(coords.len());
        for (xi, yi, zi) in coords {
            x.push(xi);
            y.push(yi);
            z.push(zi);
        }
        Ok((x, y, z))
    }

    /// Converts patient coordinates back to `(column, row)` pixel indices.
    ///
    /// Solves the 2x2 linear system formed by the x and y forward equations;
    /// the z equation is redundant for a valid cosine pair and is not
    /// consulted. Real-valued indices round half away from zero. Fails if
    /// the in-plane cosine matrix is singular.
    pub fn coordinates_to_indices(
        &self,
        x: &[f64],
        y: &[f64],
        z: &[f64],
    ) -> Result<(Vec<i32>, Vec<i32>)> {
        if x.len() != y.len() {
            return Err(Error::LengthMismatch {
                left: x.len(),
                right: y.len(),
            });
        }
        if x.len() != z.len() {
            return Err(Error::LengthMismatch {
                left: x.len(),
                right: z.len(),
            });
        }
        let x0 = self.require(self.pos_x, "pos_x")?;
        let y0 = self.require(self.pos_y, "pos_y")?;
        let cs = self.require(self.col_spacing, "col_spacing")?;
        let rs = self.require(self.row_spacing, "row_spacing")?;
        let [c0, c1, _, c3, c4, _] = self.require_cosines()?;

        let m = Matrix2::new(cs * c0, rs * c3, cs * c1, rs * c4);
        let inverse = m.try_inverse().ok_or(Error::SingularOrientation)?;

        let indices: Vec<(i32, i32)> = x
            .par_iter()
            .zip(y.par_iter())
            .map(|(&xi, &yi)| {
                let steps = inverse * Vector2::new(xi - x0, yi - y0);
                (steps.x.round() as i32, steps.y.round() as i32)
            })
            .collect();

        let mut cols = Vec::with_capacity(indices.len());
        let mut rows = Vec::with_capacity(indices.len());
        for (ci, ri) in indices {
            cols.push(ci);
            rows.push(ri);
        }
        Ok((cols, rows))
    }

    /// Reads the pixels closest to the given patient coordinates.
    ///
    /// Coordinates are inverted to indices first; an index that lands
    /// outside the grid fails the whole call rather than being clamped.
    pub fn extract_pixels(&self, x: &[f64], y: &[f64], z: &[f64]) -> Result<Vec<i32>> {
        let (cols, rows) = self.coordinates_to_indices(x, y, z)?;
        let grid = self.pixels.as_ref().ok_or(Error::NoPixelData)?;
        cols.iter()
            .zip(&rows)
            .map(|(&c, &r)| grid.value_at(c, r))
            .collect()
    }

    /// Writes one value per flat pixel index.
    pub fn insert_pixels(&mut self, indices: &[usize], values: &[i32]) -> Result<()> {
        let grid = self.pixels.as_mut().ok_or(Error::NoPixelData)?;
        grid.insert_pixels(indices, values)
    }

    /// Broadcasts one value across the given flat pixel indices.
    pub fn set_pixels(&mut self, indices: &[usize], value: i32) -> Result<()> {
        let grid = self.pixels.as_mut().ok_or(Error::NoPixelData)?;
        grid.set_pixels(indices, value)
    }

    /// Resizes the attached pixel grid to `columns` x `rows` under the given
    /// edge policies and records the new shape on the frame.
    pub fn set_resolution(
        &mut self,
        columns: u32,
        rows: u32,
        horizontal: HorizontalAlignment,
        vertical: VerticalAlignment,
    ) -> Result<()> {
        let grid = self.pixels.as_ref().ok_or(Error::NoPixelData)?;
        let resized = resample::resize(grid, columns, rows, horizontal, vertical);
        self.pixels = Some(resized);
        self.columns = Some(columns);
        self.rows = Some(rows);
        Ok(())
    }
}
