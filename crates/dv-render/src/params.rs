//! Parameter bundle consumed by the heatmap renderer

use ndarray::{Array2, ShapeError};

/// Grid dimensions as the renderer sees them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridShape {
    /// Cells per row (number of columns)
    pub row_len: usize,
    /// Cells per column (number of rows)
    pub col_len: usize,
}

impl GridShape {
    pub fn new(row_len: usize, col_len: usize) -> Self {
        Self { row_len, col_len }
    }

    pub fn cell_count(&self) -> usize {
        self.row_len * self.col_len
    }

    /// Flat row-major index of a cell
    pub fn flat_index(&self, row: usize, column: usize) -> usize {
        row * self.row_len + column
    }

    /// `(row, column)` of a flat row-major index
    pub fn cell_of(&self, index: usize) -> (usize, usize) {
        if self.row_len == 0 {
            return (0, 0);
        }
        (index / self.row_len, index % self.row_len)
    }
}

/// Everything a heatmap renderer needs for one draw configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    /// Grid values, row-major, `shape.cell_count()` long
    pub z: Vec<f32>,

    pub shape: GridShape,

    /// Column coordinates; `None` means implicit `0..row_len`
    pub x: Option<Vec<f32>>,

    /// Row coordinates; `None` means implicit `0..col_len`
    pub y: Option<Vec<f32>>,

    /// Absolute breakpoints for the step lookup, non-decreasing
    pub color_levels: Vec<f32>,

    /// RGBA quadruple per breakpoint
    pub color_values: Vec<f32>,
}

impl Default for RenderParams {
    /// Empty grid with a single black level
    fn default() -> Self {
        Self {
            z: Vec::new(),
            shape: GridShape::default(),
            x: None,
            y: None,
            color_levels: vec![0.0],
            color_values: vec![0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl RenderParams {
    /// Raw bytes of the value buffer, ready for upload
    pub fn z_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.z.as_slice())
    }

    /// Raw bytes of the color table
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.color_values.as_slice())
    }

    /// Reshape the value buffer back into `(rows, columns)`
    pub fn to_grid(&self) -> Result<Array2<f32>, ShapeError> {
        Array2::from_shape_vec((self.shape.col_len, self.shape.row_len), self.z.clone())
    }

    /// RGBA entry for breakpoint `level`
    pub fn color_at(&self, level: usize) -> Option<[f32; 4]> {
        let quad = self.color_values.get(level * 4..level * 4 + 4)?;
        Some([quad[0], quad[1], quad[2], quad[3]])
    }

    /// Step lookup: color of the highest breakpoint not above `value`
    ///
    /// Values below the first breakpoint take the first color.
    pub fn lookup_color(&self, value: f32) -> Option<[f32; 4]> {
        if self.color_levels.is_empty() || value.is_nan() {
            return None;
        }
        let level = self
            .color_levels
            .partition_point(|&l| l <= value)
            .saturating_sub(1);
        self.color_at(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params_2x3() -> RenderParams {
        RenderParams {
            z: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            shape: GridShape::new(3, 2),
            color_levels: vec![0.0, 5.0, 10.0],
            color_values: vec![
                0.0, 0.0, 0.0, 255.0,
                128.0, 128.0, 128.0, 255.0,
                255.0, 255.0, 255.0, 255.0,
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_default_color_table_is_consistent() {
        let params = RenderParams::default();
        assert_eq!(params.color_values.len(), 4 * params.color_levels.len());
    }

    #[test]
    fn test_to_grid() {
        let grid = params_2x3().to_grid().unwrap();
        assert_eq!(grid.dim(), (2, 3));
        assert_eq!(grid[[1, 0]], 4.0);
        assert_eq!(grid[[0, 2]], 3.0);
    }

    #[test]
    fn test_z_bytes_length() {
        assert_eq!(params_2x3().z_bytes().len(), 6 * std::mem::size_of::<f32>());
    }

    #[test]
    fn test_cell_of() {
        let shape = GridShape::new(3, 2);
        assert_eq!(shape.cell_of(4), (1, 1));
        assert_eq!(shape.flat_index(1, 2), 5);
    }

    #[test]
    fn test_step_lookup() {
        let params = params_2x3();
        assert_eq!(params.lookup_color(-1.0), Some([0.0, 0.0, 0.0, 255.0]));
        assert_eq!(params.lookup_color(4.9), Some([0.0, 0.0, 0.0, 255.0]));
        assert_eq!(params.lookup_color(5.0), Some([128.0, 128.0, 128.0, 255.0]));
        assert_eq!(params.lookup_color(99.0), Some([255.0, 255.0, 255.0, 255.0]));
        assert_eq!(params.lookup_color(f32::NAN), None);
    }
}
