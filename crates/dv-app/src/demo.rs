//! Demo run for the heatmap adapter
//! Syncs trace descriptions into a headless scene and hovers each trace

use anyhow::{Context, Result};
use dv_core::{AdapterConfig, Bounds, HeatmapTrace, PickResult};
use dv_render::HeadlessScene;
use dv_views::TraceRegistry;
use tracing::{info, warn};

/// Traces shipped with the demo
pub const SAMPLE_TRACES: &str = include_str!("../assets/sample_traces.json");

/// What a demo run produced
#[derive(Debug)]
pub struct DemoReport {
    pub traces: usize,
    pub failures: usize,
    pub bounds: Option<Bounds>,
    pub picks: Vec<PickResult>,
}

/// Parse a JSON array of trace descriptions
pub fn parse_traces(json: &str) -> Result<Vec<HeatmapTrace>> {
    serde_json::from_str(json).context("Failed to parse trace descriptions")
}

/// Sync `traces` into a fresh scene and hover the center of each one
pub fn run(traces: &[HeatmapTrace], config: AdapterConfig) -> Result<DemoReport> {
    let scene = HeadlessScene::new();
    let mut registry = TraceRegistry::new(scene.clone(), config);

    let failures = registry.sync(traces);
    for (uid, err) in &failures {
        warn!("Skipping trace '{}': {}", uid, err);
    }

    let bounds = registry.data_bounds();
    if let Some(b) = bounds {
        info!(
            "Scene bounds: x [{}, {}], y [{}, {}]",
            b.x_min, b.x_max, b.y_min, b.y_max
        );
    }

    // handles are allocated in sync order and never reused
    let mut picks = Vec::new();
    for (n, heatmap) in registry.iter().enumerate() {
        let b = heatmap.bounds();
        let center = [(b.x_min + b.x_max) / 2.0, (b.y_min + b.y_max) / 2.0];
        let Some(handle) = live_handle(&scene, n) else {
            warn!("No live renderer handle for '{}'", heatmap.uid());
            continue;
        };
        let Some(event) = scene.pick(handle, center) else {
            warn!("No cell under the center of '{}'", heatmap.uid());
            continue;
        };

        let pick = registry
            .pick(heatmap.uid(), &event)
            .with_context(|| format!("Failed to resolve pick on '{}'", heatmap.uid()))?;
        info!(
            "Hover '{}' at ({}, {}): z = {}, label = {:?}",
            pick.name, pick.trace_coord[0], pick.trace_coord[1], pick.z, pick.text_label
        );
        picks.push(pick);
    }

    Ok(DemoReport {
        traces: registry.len(),
        failures: failures.len(),
        bounds,
        picks,
    })
}

/// Map the n-th live trace to its scene handle, skipping disposed ones
fn live_handle(scene: &HeadlessScene, n: usize) -> Option<usize> {
    (0..scene.handle_count())
        .filter(|&h| scene.record(h).map_or(false, |r| !r.disposed))
        .nth(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_traces_parse() {
        let traces = parse_traces(SAMPLE_TRACES).unwrap();
        assert_eq!(traces.len(), 2);
        assert_eq!(traces[0].uid, "surface-temp");
        assert!(traces[1].reversescale);
    }

    #[test]
    fn test_sample_run() {
        let traces = parse_traces(SAMPLE_TRACES).unwrap();
        let report = run(&traces, AdapterConfig::default()).unwrap();

        assert_eq!(report.traces, 2);
        assert_eq!(report.failures, 0);
        assert_eq!(report.picks.len(), 2);
        assert_eq!(report.bounds.unwrap().as_array(), [0.0, 0.0, 30.0, 300.0]);

        let occupancy = &report.picks[1];
        assert_eq!(occupancy.hoverinfo, "z+text");
        assert_eq!(occupancy.text_label.as_deref(), Some("cafe"));
    }

    #[test]
    fn test_live_handle_skips_disposed() {
        let scene = HeadlessScene::new();
        let mut registry = TraceRegistry::new(scene.clone(), AdapterConfig::default());
        let bad = HeatmapTrace::new("bad", vec![]);
        let good = HeatmapTrace::new("good", vec![vec![1.0]]);
        registry.sync(&[bad, good]);

        // the failed create left handle 0 disposed
        assert_eq!(live_handle(&scene, 0), Some(1));
        assert_eq!(live_handle(&scene, 1), None);
    }

    #[test]
    fn test_malformed_json() {
        assert!(parse_traces("[{\"name\": \"no uid\"}]").is_err());
    }
}
