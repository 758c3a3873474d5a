//! Hover descriptor returned for a resolved pick

/// Resolved pick on a heatmap trace
#[derive(Debug, Clone, PartialEq)]
pub struct PickResult {
    /// Uid of the trace that owns the point
    pub trace_uid: String,

    /// Coordinate reported by the renderer
    pub data_coord: [f64; 2],

    /// Data coordinate of the picked cell, `(x, y)`
    pub trace_coord: [f64; 2],

    /// Position in the flattened grid
    pub point_index: usize,

    pub row: usize,
    pub column: usize,

    /// Cell value
    pub z: f64,

    /// RGBA the color table assigns to `z`
    pub fill: Option<[f32; 4]>,

    pub text_label: Option<String>,
    pub color: Option<String>,
    pub name: String,
    pub hoverinfo: String,
}
