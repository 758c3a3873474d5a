//! Colorscale to step lookup table conversion
//!
//! The heatmap shader performs a step lookup against absolute breakpoints,
//! so normalized stop positions are rescaled into the trace's z domain and
//! each stop color is expanded into an RGBA quadruple.

use dv_core::{ColorRange, Colorscale, InvalidTrace, TraceError};

use super::colors::ColorParser;

/// Breakpoints and their colors, ready for the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct ColorTable {
    /// Absolute breakpoints, non-decreasing
    pub color_levels: Vec<f32>,
    /// RGBA quadruple per breakpoint
    pub color_values: Vec<f32>,
}

/// Convert a colorscale over `[zmin, zmax]` into a lookup table
///
/// Fails with [`InvalidTrace`] for a malformed scale or domain, and passes
/// color parse failures through unchanged.
pub fn convert(
    colorscale: &Colorscale,
    zmin: f64,
    zmax: f64,
    parser: &dyn ColorParser,
    range: ColorRange,
) -> Result<ColorTable, TraceError> {
    colorscale.validate()?;
    let span = zmax - zmin;
    if !zmin.is_finite() || !zmax.is_finite() || !span.is_finite() || zmin > zmax {
        return Err(InvalidTrace::InvalidDomain { zmin, zmax }.into());
    }

    let n = colorscale.len();
    let mut color_levels = Vec::with_capacity(n);
    let mut color_values = Vec::with_capacity(4 * n);

    for stop in colorscale.stops() {
        let rgba = parser.parse(stop.color())?;
        color_levels.push((zmin + stop.position() * span) as f32);
        color_values.extend_from_slice(&rgba.to_array(range));
    }

    Ok(ColorTable {
        color_levels,
        color_values,
    })
}
