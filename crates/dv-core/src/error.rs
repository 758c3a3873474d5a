//! Error types shared by the trace adapter and its collaborators

use thiserror::Error;

/// Errors that can occur while updating or picking a trace
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("invalid trace data: {0}")]
    InvalidTrace(#[from] InvalidTrace),

    #[error("color parse error: {0}")]
    ColorParse(#[from] ColorParseError),

    #[error("renderer error: {0}")]
    Render(#[from] RenderError),

    #[error("unresolvable pick: point id {point_id} is outside the index table ({len} entries)")]
    UnresolvablePick { point_id: usize, len: usize },

    #[error("no trace with uid '{0}'")]
    UnknownTrace(String),
}

/// Ways a trace description can be malformed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidTrace {
    #[error("calc trace holds no grid")]
    MissingGrid,

    #[error("z grid is empty")]
    EmptyGrid,

    #[error("z row {row} has {found} values, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },

    #[error("{axis} has {found} coordinates, expected {expected}")]
    AxisLength { axis: Axis, expected: usize, found: usize },

    #[error("colorscale is empty")]
    EmptyColorscale,

    #[error("colorscale stop {index} is {value}, expected a value in [0, 1]")]
    StopOutOfRange { index: usize, value: f64 },

    #[error("colorscale stop {index} ({value}) is below the previous stop ({previous})")]
    NonMonotonicStops { index: usize, value: f64, previous: f64 },

    #[error("color domain [{zmin}, {zmax}] is inverted or not finite")]
    InvalidDomain { zmin: f64, zmax: f64 },

    #[error("renderer index table maps to {index}, but the grid has {len} cells")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Coordinate axis, used in error reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}

/// Failure to turn a color string into RGBA
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,

    #[error("invalid hex color '{0}'")]
    InvalidHex(String),

    #[error("invalid color function '{0}'")]
    InvalidFunction(String),

    #[error("unknown color name '{0}'")]
    UnknownName(String),
}

/// Failure reported by a renderer handle
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("renderer rejected parameters: {0}")]
    Rejected(String),

    #[error("renderer resource lost: {0}")]
    Lost(String),
}
