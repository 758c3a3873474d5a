//! Utilities for plot traces

pub mod colors;
pub mod colorscale;

// Re-export commonly used items
pub use colors::{parse_css_color, ColorParser, CssColorParser};
pub use colorscale::{convert, ColorTable};
