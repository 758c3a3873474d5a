//! Rendering abstraction layer
//!
//! This crate defines the contract between heatmap traces and the GPU
//! renderer that draws them: the parameter bundle, the renderer handle and
//! the scene that hands out handles. A headless implementation is included
//! for tests and offline tools.

pub mod headless;
pub mod params;

pub use dv_core::RenderError;
pub use headless::{HeadlessScene, PointOrder};
pub use params::{GridShape, RenderParams};

/// Pick reported by a renderer for a hovered or clicked point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickEvent {
    /// Renderer-assigned point identifier
    pub point_id: usize,
    /// Device-space coordinate of the interaction, in data units
    pub data_coord: [f64; 2],
}

/// Handle to a heatmap owned by a renderer
pub trait HeatmapRenderer: Send {
    /// Replace the drawn data and color table
    fn update(&mut self, params: &RenderParams) -> Result<(), RenderError>;

    /// Point-id to flat-index table for the last update.
    ///
    /// Renderers that assign ids in row-major order return `None`.
    fn id_to_index(&self) -> Option<Vec<usize>> {
        None
    }

    /// Release the GPU resources behind this handle
    fn dispose(self: Box<Self>);
}

/// Graphics context able to allocate heatmap renderers
pub trait Scene {
    /// Allocate a heatmap configured with `params`
    fn create_heatmap2d(&mut self, params: &RenderParams) -> Box<dyn HeatmapRenderer>;
}
