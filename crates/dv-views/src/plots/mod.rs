//! Plot trace implementations

// GPU-backed 2D traces
pub mod heatmap_gl;

// Utilities
pub mod utils;

// Re-exports
pub use heatmap_gl::HeatmapGl;
