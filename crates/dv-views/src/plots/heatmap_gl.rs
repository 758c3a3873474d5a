//! GPU heatmap trace
//!
//! [`HeatmapGl`] keeps the per-trace state behind one renderer handle. Each
//! [`update`](HeatmapGl::update) flattens the calc grid row-major, extracts
//! axis bounds, converts the colorscale into the renderer's step lookup table
//! and pushes the result. Picks coming back from the renderer are resolved
//! through the index table to the source row, column and cell metadata.
//!
//! Calls on one instance must be serialized by the caller; `update` takes
//! `&mut self` and `dispose` consumes the trace.

use dv_core::{
    color_domain, AdapterConfig, Axis, Bounds, CalcPoint, CellValues, HeatmapTrace, IndexTable,
    InvalidTrace, PickResult, TraceError,
};
use dv_render::{GridShape, HeatmapRenderer, PickEvent, RenderParams, Scene};
use tracing::{debug, info, warn};

use super::utils::colors::{ColorParser, CssColorParser};
use super::utils::colorscale;

/// Heatmap trace drawn by a GPU renderer
pub struct HeatmapGl {
    uid: String,
    name: String,
    hoverinfo: String,
    text_labels: Option<CellValues<String>>,
    color: Option<CellValues<String>>,

    /// Flattened grid at full precision, row-major
    z_data: Vec<f64>,
    /// Calc cell to trace cell, set when the calc step reorders cells
    cell_source: Option<Vec<Option<usize>>>,
    x_data: Option<Vec<f64>>,
    y_data: Option<Vec<f64>>,

    id_to_index: IndexTable,
    bounds: Bounds,
    params: RenderParams,

    config: AdapterConfig,
    parser: Box<dyn ColorParser>,
    renderer: Box<dyn HeatmapRenderer>,
}

impl HeatmapGl {
    /// Allocate an empty trace and its renderer handle
    ///
    /// The renderer starts with an empty grid and a single-level color table.
    pub fn new(scene: &mut dyn Scene, uid: impl Into<String>, config: AdapterConfig) -> Self {
        let params = RenderParams::default();
        let renderer = scene.create_heatmap2d(&params);
        let uid = uid.into();
        debug!("Created heatmap trace '{}'", uid);

        Self {
            uid,
            name: String::new(),
            hoverinfo: config.default_hoverinfo.clone(),
            text_labels: None,
            color: None,
            z_data: Vec::new(),
            cell_source: None,
            x_data: None,
            y_data: None,
            id_to_index: IndexTable::default(),
            bounds: Bounds::default(),
            params,
            config,
            parser: Box::new(CssColorParser),
            renderer,
        }
    }

    /// Replace the color string parser
    pub fn with_parser(mut self, parser: impl ColorParser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    /// Allocate a trace and apply its first update
    pub fn create(
        scene: &mut dyn Scene,
        trace: &HeatmapTrace,
        calc: &[CalcPoint],
        config: AdapterConfig,
    ) -> Result<Self, TraceError> {
        let mut heatmap = Self::new(scene, trace.uid.clone(), config);
        if let Err(err) = heatmap.update(trace, calc) {
            heatmap.dispose();
            return Err(err);
        }
        Ok(heatmap)
    }

    /// Apply a new trace description and calc grid
    ///
    /// The grid comes from `calc[0].z`. Input is validated, the colorscale
    /// converted and the renderer updated before any state changes, so a
    /// malformed trace, a bad color string or a rejected push leaves the
    /// previous state in place.
    pub fn update(&mut self, trace: &HeatmapTrace, calc: &[CalcPoint]) -> Result<(), TraceError> {
        let calc_point = calc.first().ok_or(InvalidTrace::MissingGrid)?;
        let shape = grid_shape(&calc_point.z)?;
        check_axis(trace.x.as_deref(), shape.row_len, Axis::X)?;
        check_axis(trace.y.as_deref(), shape.col_len, Axis::Y)?;

        let (zmin, zmax) = color_domain(trace, calc_point);
        let colors = colorscale::convert(
            &trace.effective_colorscale(),
            zmin,
            zmax,
            self.parser.as_ref(),
            self.config.color_range,
        )?;

        let z_data = calc_point.z.concat();
        let params = RenderParams {
            z: z_data.iter().map(|&v| v as f32).collect(),
            shape,
            x: to_f32(trace.x.as_deref()),
            y: to_f32(trace.y.as_deref()),
            color_levels: colors.color_levels,
            color_values: colors.color_values,
        };

        let cells = shape.cell_count();
        self.renderer.update(&params)?;
        let id_to_index = match self.renderer.id_to_index() {
            Some(ids) => match IndexTable::from_renderer(ids, cells) {
                Ok(table) => table,
                Err(err) => {
                    self.restore_renderer();
                    return Err(err.into());
                }
            },
            None => IndexTable::row_major(cells),
        };

        let (x_min, x_max) = axis_extent(trace.x.as_deref(), shape.row_len);
        let (y_min, y_max) = axis_extent(trace.y.as_deref(), shape.col_len);
        self.bounds = Bounds::new(x_min, y_min, x_max, y_max);
        self.x_data = trace.x.clone();
        self.y_data = trace.y.clone();
        self.z_data = z_data;
        self.cell_source = calc_point.source_index.clone();
        self.text_labels = trace.text.clone();
        self.color = trace.color.clone();
        self.name = trace.name.clone();
        self.hoverinfo = trace
            .hoverinfo
            .clone()
            .unwrap_or_else(|| self.config.default_hoverinfo.clone());
        self.id_to_index = id_to_index;
        self.params = params;

        info!(
            "Updated heatmap '{}': {}x{} cells, color domain [{}, {}], {} levels",
            self.uid,
            shape.row_len,
            shape.col_len,
            zmin,
            zmax,
            self.params.color_levels.len()
        );
        Ok(())
    }

    /// Push the committed parameters back after a push that cannot be used
    fn restore_renderer(&mut self) {
        if let Err(err) = self.renderer.update(&self.params) {
            warn!("Heatmap '{}' could not restore its renderer: {}", self.uid, err);
        }
    }

    /// Resolve a renderer pick to the cell it refers to
    pub fn handle_pick(&self, pick: &PickEvent) -> Result<PickResult, TraceError> {
        let index = self.id_to_index.resolve(pick.point_id).ok_or_else(|| {
            warn!("Heatmap '{}' cannot resolve point id {}", self.uid, pick.point_id);
            TraceError::UnresolvablePick {
                point_id: pick.point_id,
                len: self.id_to_index.len(),
            }
        })?;

        let (row, column) = self.params.shape.cell_of(index);
        let x = axis_value(self.x_data.as_deref(), column);
        let y = axis_value(self.y_data.as_deref(), row);
        let z = self.z_data.get(index).copied().unwrap_or(f64::NAN);
        let source = match &self.cell_source {
            Some(map) => map.get(index).copied().flatten(),
            None => Some(index),
        };
        debug!("Heatmap '{}' pick {} -> row {}, column {}", self.uid, pick.point_id, row, column);

        Ok(PickResult {
            trace_uid: self.uid.clone(),
            data_coord: pick.data_coord,
            trace_coord: [x, y],
            point_index: index,
            row,
            column,
            z,
            fill: self.params.lookup_color(z as f32),
            text_label: resolve_cell(self.text_labels.as_ref(), source),
            color: resolve_cell(self.color.as_ref(), source),
            name: self.name.clone(),
            hoverinfo: self.hoverinfo.clone(),
        })
    }

    /// Release the renderer handle
    pub fn dispose(self) {
        debug!("Disposing heatmap '{}'", self.uid);
        self.renderer.dispose();
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hoverinfo(&self) -> &str {
        &self.hoverinfo
    }

    /// `[x_min, y_min, x_max, y_max]` of the last update
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Parameters last pushed to the renderer
    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    pub fn shape(&self) -> GridShape {
        self.params.shape
    }

    pub fn index_table(&self) -> &IndexTable {
        &self.id_to_index
    }
}

impl std::fmt::Debug for HeatmapGl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeatmapGl")
            .field("uid", &self.uid)
            .field("name", &self.name)
            .field("shape", &self.params.shape)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

/// Shape of a non-empty rectangular grid
fn grid_shape(z: &[Vec<f64>]) -> Result<GridShape, InvalidTrace> {
    let row_len = z.first().map_or(0, Vec::len);
    if row_len == 0 {
        return Err(InvalidTrace::EmptyGrid);
    }
    if let Some((row, found)) = z
        .iter()
        .map(Vec::len)
        .enumerate()
        .find(|&(_, len)| len != row_len)
    {
        return Err(InvalidTrace::RaggedRow {
            row,
            expected: row_len,
            found,
        });
    }
    Ok(GridShape::new(row_len, z.len()))
}

fn check_axis(coords: Option<&[f64]>, expected: usize, axis: Axis) -> Result<(), InvalidTrace> {
    match coords {
        Some(coords) if coords.len() != expected => Err(InvalidTrace::AxisLength {
            axis,
            expected,
            found: coords.len(),
        }),
        _ => Ok(()),
    }
}

/// First and last coordinate, or `0..len` for an implicit axis
fn axis_extent(coords: Option<&[f64]>, len: usize) -> (f64, f64) {
    match coords {
        Some(coords) => (coords[0], coords[len - 1]),
        None => (0.0, len as f64),
    }
}

fn axis_value(coords: Option<&[f64]>, i: usize) -> f64 {
    coords
        .and_then(|c| c.get(i).copied())
        .unwrap_or(i as f64)
}

fn to_f32(coords: Option<&[f64]>) -> Option<Vec<f32>> {
    coords.map(|c| c.iter().map(|&v| v as f32).collect())
}

fn resolve_cell(values: Option<&CellValues<String>>, source: Option<usize>) -> Option<String> {
    values.zip(source).and_then(|(v, i)| v.resolve(i)).cloned()
}
