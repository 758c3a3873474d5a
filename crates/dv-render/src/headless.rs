//! Headless heatmap renderer
//!
//! Keeps the last parameters of every handle it allocates instead of drawing
//! them. Clones of a [`HeadlessScene`] share state, so a test can hand one
//! clone to the code under test and inspect the other.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::{GridShape, HeatmapRenderer, PickEvent, RenderError, RenderParams, Scene};

/// Order in which the renderer numbers cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointOrder {
    /// Point id equals the flat row-major index; no table is reported
    #[default]
    RowMajor,
    /// Ids walk columns first; the renderer reports its table
    ColumnMajor,
}

/// Bookkeeping for one allocated handle
#[derive(Debug, Clone)]
pub struct HandleRecord {
    pub params: RenderParams,
    pub updates: usize,
    pub disposed: bool,
}

#[derive(Debug, Default)]
struct SceneState {
    handles: Vec<HandleRecord>,
    order: PointOrder,
    fail_updates: bool,
}

/// Scene whose renderers only record what they were given
#[derive(Debug, Clone, Default)]
pub struct HeadlessScene {
    state: Arc<Mutex<SceneState>>,
}

impl HeadlessScene {
    /// Create a scene numbering points row-major
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scene numbering points in the given order
    pub fn with_point_order(order: PointOrder) -> Self {
        let scene = Self::default();
        scene.state.lock().order = order;
        scene
    }

    /// Make every subsequent renderer update fail
    pub fn set_fail_updates(&self, fail: bool) {
        self.state.lock().fail_updates = fail;
    }

    /// Number of handles ever allocated
    pub fn handle_count(&self) -> usize {
        self.state.lock().handles.len()
    }

    /// Number of handles not yet disposed
    pub fn live_handles(&self) -> usize {
        self.state.lock().handles.iter().filter(|h| !h.disposed).count()
    }

    /// Snapshot of a handle's record
    pub fn record(&self, handle: usize) -> Option<HandleRecord> {
        self.state.lock().handles.get(handle).cloned()
    }

    /// Last parameters pushed to a handle
    pub fn params(&self, handle: usize) -> Option<RenderParams> {
        self.record(handle).map(|r| r.params)
    }

    /// Turn a data coordinate into the pick the renderer would emit
    ///
    /// Explicit axes snap to the nearest coordinate. Implicit axes treat cell
    /// `i` as covering `[i, i + 1)`, and miss outside the grid.
    pub fn pick(&self, handle: usize, data_coord: [f64; 2]) -> Option<PickEvent> {
        let state = self.state.lock();
        let record = state.handles.get(handle)?;
        if record.disposed {
            return None;
        }

        let params = &record.params;
        let column = axis_cell(params.x.as_deref(), params.shape.row_len, data_coord[0])?;
        let row = axis_cell(params.y.as_deref(), params.shape.col_len, data_coord[1])?;
        let point_id = point_id(state.order, params.shape, row, column);

        Some(PickEvent { point_id, data_coord })
    }
}

impl Scene for HeadlessScene {
    fn create_heatmap2d(&mut self, params: &RenderParams) -> Box<dyn HeatmapRenderer> {
        let mut state = self.state.lock();
        let handle = state.handles.len();
        state.handles.push(HandleRecord {
            params: params.clone(),
            updates: 0,
            disposed: false,
        });
        debug!("Allocated headless heatmap {}", handle);

        Box::new(HeadlessHeatmap {
            handle,
            state: Arc::clone(&self.state),
        })
    }
}

struct HeadlessHeatmap {
    handle: usize,
    state: Arc<Mutex<SceneState>>,
}

impl HeatmapRenderer for HeadlessHeatmap {
    fn update(&mut self, params: &RenderParams) -> Result<(), RenderError> {
        let mut state = self.state.lock();
        if state.fail_updates {
            return Err(RenderError::Rejected(format!("headless heatmap {} refuses updates", self.handle)));
        }

        let record = &mut state.handles[self.handle];
        if record.disposed {
            return Err(RenderError::Lost(format!("headless heatmap {} was disposed", self.handle)));
        }
        record.params = params.clone();
        record.updates += 1;

        debug!(
            "Headless heatmap {} updated: {}x{} cells, {} color levels",
            self.handle,
            params.shape.row_len,
            params.shape.col_len,
            params.color_levels.len()
        );
        Ok(())
    }

    fn id_to_index(&self) -> Option<Vec<usize>> {
        let state = self.state.lock();
        match state.order {
            PointOrder::RowMajor => None,
            PointOrder::ColumnMajor => {
                let shape = state.handles[self.handle].params.shape;
                let table = (0..shape.cell_count())
                    .map(|id| {
                        let column = id / shape.col_len;
                        let row = id % shape.col_len;
                        shape.flat_index(row, column)
                    })
                    .collect();
                Some(table)
            }
        }
    }

    fn dispose(self: Box<Self>) {
        self.state.lock().handles[self.handle].disposed = true;
        debug!("Disposed headless heatmap {}", self.handle);
    }
}

fn axis_cell(coords: Option<&[f32]>, len: usize, value: f64) -> Option<usize> {
    if len == 0 || !value.is_finite() {
        return None;
    }

    match coords {
        Some(coords) => coords
            .iter()
            .take(len)
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                let da = (**a as f64 - value).abs();
                let db = (**b as f64 - value).abs();
                da.total_cmp(&db)
            })
            .map(|(i, _)| i),
        None => {
            let cell = value.floor();
            (cell >= 0.0 && cell < len as f64).then_some(cell as usize)
        }
    }
}

fn point_id(order: PointOrder, shape: GridShape, row: usize, column: usize) -> usize {
    match order {
        PointOrder::RowMajor => shape.flat_index(row, column),
        PointOrder::ColumnMajor => column * shape.col_len + row,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_params() -> RenderParams {
        RenderParams {
            z: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            shape: GridShape::new(3, 2),
            ..Default::default()
        }
    }

    #[test]
    fn test_records_updates_and_dispose() {
        let mut scene = HeadlessScene::new();
        let mut renderer = scene.create_heatmap2d(&RenderParams::default());
        assert_eq!(scene.live_handles(), 1);

        renderer.update(&grid_params()).unwrap();
        let record = scene.record(0).unwrap();
        assert_eq!(record.updates, 1);
        assert_eq!(record.params.z.len(), 6);

        renderer.dispose();
        assert_eq!(scene.live_handles(), 0);
        assert_eq!(scene.handle_count(), 1);
    }

    #[test]
    fn test_failing_updates() {
        let mut scene = HeadlessScene::new();
        let mut renderer = scene.create_heatmap2d(&RenderParams::default());
        scene.set_fail_updates(true);
        assert!(matches!(renderer.update(&grid_params()), Err(RenderError::Rejected(_))));
    }

    #[test]
    fn test_pick_implicit_axes() {
        let mut scene = HeadlessScene::new();
        let mut renderer = scene.create_heatmap2d(&RenderParams::default());
        renderer.update(&grid_params()).unwrap();

        let pick = scene.pick(0, [1.5, 1.2]).unwrap();
        assert_eq!(pick.point_id, 4);
        assert!(scene.pick(0, [3.5, 0.0]).is_none());
    }

    #[test]
    fn test_pick_explicit_axes() {
        let mut scene = HeadlessScene::new();
        let mut renderer = scene.create_heatmap2d(&RenderParams::default());
        let params = RenderParams {
            x: Some(vec![10.0, 20.0, 30.0]),
            y: Some(vec![5.0, 6.0]),
            ..grid_params()
        };
        renderer.update(&params).unwrap();

        assert_eq!(scene.pick(0, [29.0, 5.1]).unwrap().point_id, 2);
    }

    #[test]
    fn test_column_major_table() {
        let mut scene = HeadlessScene::with_point_order(PointOrder::ColumnMajor);
        let mut renderer = scene.create_heatmap2d(&RenderParams::default());
        renderer.update(&grid_params()).unwrap();

        // ids 0,1 walk the first column: flat 0 and 3
        assert_eq!(renderer.id_to_index(), Some(vec![0, 3, 1, 4, 2, 5]));
        // cell (row 1, column 1) is id 3
        assert_eq!(scene.pick(0, [1.5, 1.5]).unwrap().point_id, 3);
    }
}
