//! Trace adapters between plot descriptions and GPU renderers

pub mod plots;
mod scene;

pub use plots::utils::{convert, ColorParser, ColorTable, CssColorParser};
pub use plots::HeatmapGl;
pub use scene::TraceRegistry;
