//! Declarative heatmap trace description
//!
//! A [`HeatmapTrace`] is the user-facing description of one heatmap series:
//! identity, display metadata, the raw grid and its styling. It deserializes
//! from the same JSON shape a plotting front end emits.

use serde::{Deserialize, Deserializer};

use crate::error::InvalidTrace;

/// A value given either once for the whole trace or once per grid cell
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "CellValuesRepr<T>")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub enum CellValues<T> {
    Scalar(T),
    /// One entry per cell, row-major
    PerPoint(Vec<T>),
}

impl<T> CellValues<T> {
    /// Value for the cell at flat `index`. `None` when a per-cell list is too short.
    pub fn resolve(&self, index: usize) -> Option<&T> {
        match self {
            CellValues::Scalar(value) => Some(value),
            CellValues::PerPoint(values) => values.get(index),
        }
    }

    pub fn is_per_point(&self) -> bool {
        matches!(self, CellValues::PerPoint(_))
    }
}

/// Accepted JSON shapes; a 2D list is flattened row-major
#[derive(Deserialize)]
#[serde(untagged)]
enum CellValuesRepr<T> {
    Grid(Vec<Vec<T>>),
    List(Vec<T>),
    Scalar(T),
}

impl<T> From<CellValuesRepr<T>> for CellValues<T> {
    fn from(repr: CellValuesRepr<T>) -> Self {
        match repr {
            CellValuesRepr::Grid(rows) => CellValues::PerPoint(rows.into_iter().flatten().collect()),
            CellValuesRepr::List(values) => CellValues::PerPoint(values),
            CellValuesRepr::Scalar(value) => CellValues::Scalar(value),
        }
    }
}

/// One colorscale stop: normalized position and color string
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColorStop(pub f64, pub String);

impl ColorStop {
    pub fn new(position: f64, color: impl Into<String>) -> Self {
        Self(position, color.into())
    }

    pub fn position(&self) -> f64 {
        self.0
    }

    pub fn color(&self) -> &str {
        &self.1
    }
}

/// Ordered list of color stops over the normalized range [0, 1]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Colorscale(pub Vec<ColorStop>);

impl Default for Colorscale {
    fn default() -> Self {
        Colorscale(vec![ColorStop::new(0.0, "#000000"), ColorStop::new(1.0, "#ffffff")])
    }
}

impl Colorscale {
    pub fn new(stops: Vec<ColorStop>) -> Self {
        Colorscale(stops)
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check the stops are non-empty, within [0, 1] and non-decreasing
    pub fn validate(&self) -> Result<(), InvalidTrace> {
        if self.0.is_empty() {
            return Err(InvalidTrace::EmptyColorscale);
        }

        let mut previous = f64::NEG_INFINITY;
        for (index, stop) in self.0.iter().enumerate() {
            let value = stop.position();
            if !(0.0..=1.0).contains(&value) {
                return Err(InvalidTrace::StopOutOfRange { index, value });
            }
            if value < previous {
                return Err(InvalidTrace::NonMonotonicStops { index, value, previous });
            }
            previous = value;
        }
        Ok(())
    }

    /// Mirror the scale so the last color sits at 0
    pub fn reversed(&self) -> Self {
        Colorscale(
            self.0
                .iter()
                .rev()
                .map(|stop| ColorStop(1.0 - stop.0, stop.1.clone()))
                .collect(),
        )
    }
}

/// Full description of a heatmap trace
#[derive(Debug, Clone, Deserialize)]
pub struct HeatmapTrace {
    /// Stable identity across updates
    pub uid: String,

    #[serde(default)]
    pub name: String,

    /// Hover mode; the adapter's configured default applies when unset
    #[serde(default)]
    pub hoverinfo: Option<String>,

    /// Column coordinates, one per grid column
    #[serde(default)]
    pub x: Option<Vec<f64>>,

    /// Row coordinates, one per grid row
    #[serde(default)]
    pub y: Option<Vec<f64>>,

    /// Raw grid; `null` cells become NaN
    #[serde(default, deserialize_with = "nullable_grid")]
    pub z: Vec<Vec<f64>>,

    #[serde(default)]
    pub text: Option<CellValues<String>>,

    #[serde(default)]
    pub color: Option<CellValues<String>>,

    #[serde(default)]
    pub colorscale: Colorscale,

    #[serde(default)]
    pub reversescale: bool,

    /// Lower color bound; derived from the data when unset
    #[serde(default)]
    pub zmin: Option<f64>,

    /// Upper color bound; derived from the data when unset
    #[serde(default)]
    pub zmax: Option<f64>,

    /// Swap rows and columns during the calc step
    #[serde(default)]
    pub transpose: bool,
}

impl HeatmapTrace {
    /// Create a trace with default styling around a grid
    pub fn new(uid: impl Into<String>, z: Vec<Vec<f64>>) -> Self {
        Self {
            uid: uid.into(),
            name: String::new(),
            hoverinfo: None,
            x: None,
            y: None,
            z,
            text: None,
            color: None,
            colorscale: Colorscale::default(),
            reversescale: false,
            zmin: None,
            zmax: None,
            transpose: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_x(mut self, x: Vec<f64>) -> Self {
        self.x = Some(x);
        self
    }

    pub fn with_y(mut self, y: Vec<f64>) -> Self {
        self.y = Some(y);
        self
    }

    pub fn with_text(mut self, text: CellValues<String>) -> Self {
        self.text = Some(text);
        self
    }

    pub fn with_color(mut self, color: CellValues<String>) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_colorscale(mut self, colorscale: Colorscale) -> Self {
        self.colorscale = colorscale;
        self
    }

    pub fn with_domain(mut self, zmin: f64, zmax: f64) -> Self {
        self.zmin = Some(zmin);
        self.zmax = Some(zmax);
        self
    }

    /// Colorscale after applying `reversescale`
    pub fn effective_colorscale(&self) -> Colorscale {
        if self.reversescale {
            self.colorscale.reversed()
        } else {
            self.colorscale.clone()
        }
    }

    /// Parse a single trace from JSON
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

fn nullable_grid<'de, D>(deserializer: D) -> Result<Vec<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows: Vec<Vec<Option<f64>>> = Vec::deserialize(deserializer)?;
    Ok(rows
        .into_iter()
        .map(|row| row.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_scalar_and_per_point() {
        let scalar = CellValues::Scalar("all".to_string());
        assert_eq!(scalar.resolve(42).map(String::as_str), Some("all"));

        let per_point = CellValues::PerPoint(vec![1, 2, 3]);
        assert_eq!(per_point.resolve(1), Some(&2));
        assert_eq!(per_point.resolve(3), None);
    }

    #[test]
    fn test_text_shapes_from_json() {
        let scalar: CellValues<String> = serde_json::from_str(r#""label""#).unwrap();
        assert_eq!(scalar, CellValues::Scalar("label".to_string()));

        let flat: CellValues<String> = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(flat, CellValues::PerPoint(vec!["a".into(), "b".into()]));

        let grid: CellValues<String> = serde_json::from_str(r#"[["a", "b"], ["c", "d"]]"#).unwrap();
        assert_eq!(grid, CellValues::PerPoint(vec!["a".into(), "b".into(), "c".into(), "d".into()]));
    }

    #[test]
    fn test_trace_from_json() {
        let trace = HeatmapTrace::from_json_str(
            r##"{
                "uid": "t0",
                "name": "temps",
                "z": [[1, null, 3], [4, 5, 6]],
                "x": [10, 20, 30],
                "colorscale": [[0, "#000000"], [1, "#ffffff"]],
                "zmin": 0,
                "zmax": 10
            }"##,
        )
        .unwrap();

        assert_eq!(trace.uid, "t0");
        assert_eq!(trace.x, Some(vec![10.0, 20.0, 30.0]));
        assert!(trace.y.is_none());
        assert!(trace.z[0][1].is_nan());
        assert_eq!(trace.colorscale.len(), 2);
        assert_eq!(trace.zmax, Some(10.0));
    }

    #[test]
    fn test_colorscale_validation() {
        assert!(Colorscale::default().validate().is_ok());
        assert_eq!(Colorscale::new(vec![]).validate(), Err(InvalidTrace::EmptyColorscale));

        let out_of_range = Colorscale::new(vec![ColorStop::new(0.0, "red"), ColorStop::new(1.5, "blue")]);
        assert_eq!(
            out_of_range.validate(),
            Err(InvalidTrace::StopOutOfRange { index: 1, value: 1.5 })
        );

        let backwards = Colorscale::new(vec![ColorStop::new(0.6, "red"), ColorStop::new(0.4, "blue")]);
        assert!(matches!(
            backwards.validate(),
            Err(InvalidTrace::NonMonotonicStops { index: 1, .. })
        ));
    }

    #[test]
    fn test_reversed_colorscale() {
        let scale = Colorscale::new(vec![
            ColorStop::new(0.0, "black"),
            ColorStop::new(0.25, "gray"),
            ColorStop::new(1.0, "white"),
        ]);
        let reversed = scale.reversed();

        assert_eq!(reversed.stops()[0], ColorStop::new(0.0, "white"));
        assert_eq!(reversed.stops()[1], ColorStop::new(0.75, "gray"));
        assert_eq!(reversed.stops()[2], ColorStop::new(1.0, "black"));
        assert!(reversed.validate().is_ok());
    }
}
