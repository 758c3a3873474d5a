//! Calc step: turns a trace's raw grid into the grid handed to the adapter

use tracing::debug;

use crate::trace::HeatmapTrace;

/// Computed grid for one trace, plus the finite data range
#[derive(Debug, Clone, PartialEq)]
pub struct CalcPoint {
    /// Grid rows, outer index is the row
    pub z: Vec<Vec<f64>>,
    pub zmin: f64,
    pub zmax: f64,
    /// For each calc cell, row-major, the flat index of the trace cell it came
    /// from. `None` when the calc grid keeps the trace's own order; padded
    /// cells map to `None`.
    pub source_index: Option<Vec<Option<usize>>>,
}

impl CalcPoint {
    /// Wrap a grid and compute its finite range
    pub fn from_grid(z: Vec<Vec<f64>>) -> Self {
        let (zmin, zmax) = finite_range(&z);
        Self {
            z,
            zmin,
            zmax,
            source_index: None,
        }
    }

    /// Flat index into the trace's per-cell lists for calc cell `index`
    pub fn source_of(&self, index: usize) -> Option<usize> {
        match &self.source_index {
            Some(map) => map.get(index).copied().flatten(),
            None => Some(index),
        }
    }
}

/// Build the calc trace for a heatmap
///
/// Applies `transpose` (padding short rows with NaN) and records the finite
/// data range used when the trace leaves `zmin`/`zmax` unset.
pub fn calc_heatmap(trace: &HeatmapTrace) -> Vec<CalcPoint> {
    let calc = if trace.transpose {
        CalcPoint {
            source_index: Some(transposed_sources(&trace.z)),
            ..CalcPoint::from_grid(transpose(&trace.z))
        }
    } else {
        CalcPoint::from_grid(trace.z.clone())
    };
    debug!(
        "Calc for '{}': {} rows, data range [{}, {}]",
        trace.uid,
        calc.z.len(),
        calc.zmin,
        calc.zmax
    );
    vec![calc]
}

/// Length of the longest row
pub fn max_row_length(z: &[Vec<f64>]) -> usize {
    z.iter().map(Vec::len).max().unwrap_or(0)
}

fn transpose(z: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let cols = max_row_length(z);
    (0..cols)
        .map(|c| z.iter().map(|row| row.get(c).copied().unwrap_or(f64::NAN)).collect())
        .collect()
}

/// Source flat index of every transposed cell, row-major over the result
///
/// Offsets follow the trace rows' own lengths, so per-cell lists flattened
/// from a ragged 2D list line up with the grid.
fn transposed_sources(z: &[Vec<f64>]) -> Vec<Option<usize>> {
    let mut offsets = Vec::with_capacity(z.len());
    let mut offset = 0;
    for row in z {
        offsets.push(offset);
        offset += row.len();
    }

    (0..max_row_length(z))
        .flat_map(|c| {
            z.iter()
                .zip(&offsets)
                .map(move |(row, &start)| (c < row.len()).then_some(start + c))
        })
        .collect()
}

/// Finite min/max; a flat or empty range widens to half a unit each way
fn finite_range(z: &[Vec<f64>]) -> (f64, f64) {
    let (mut lo, mut hi) = z
        .iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    if !lo.is_finite() {
        lo = 0.0;
        hi = 0.0;
    }
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    (lo, hi)
}

/// Color domain for a trace: explicit bounds win over the data range
pub fn color_domain(trace: &HeatmapTrace, calc: &CalcPoint) -> (f64, f64) {
    (
        trace.zmin.unwrap_or(calc.zmin),
        trace.zmax.unwrap_or(calc.zmax),
    )
}
