//! Core types for GPU heatmap traces
//!
//! This crate holds the declarative trace description, the calc grid, the
//! point-id index table and the errors shared by the renderer contract and
//! the trace adapter.

pub mod bounds;
pub mod calc;
pub mod color;
pub mod config;
pub mod error;
pub mod hover;
pub mod index;
pub mod trace;

// Re-export commonly used types
pub use bounds::Bounds;
pub use calc::{calc_heatmap, color_domain, CalcPoint};
pub use color::Rgba;
pub use config::{AdapterConfig, ColorRange};
pub use error::{Axis, ColorParseError, InvalidTrace, RenderError, TraceError};
pub use hover::PickResult;
pub use index::IndexTable;
pub use trace::{CellValues, ColorStop, Colorscale, HeatmapTrace};
