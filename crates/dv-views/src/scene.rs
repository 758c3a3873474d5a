//! Trace registry for one scene
//!
//! Owns the heatmap traces drawn into a scene, keyed by uid. [`sync`]
//! creates a trace the first time its uid appears, updates it in place on
//! later calls and disposes it once the uid is gone.
//!
//! [`sync`]: TraceRegistry::sync

use ahash::AHashMap;
use dv_core::{calc_heatmap, AdapterConfig, Bounds, HeatmapTrace, PickResult, TraceError};
use dv_render::{PickEvent, Scene};
use tracing::{debug, info, warn};

use crate::plots::HeatmapGl;

/// Heatmap traces of one scene, keyed by uid
pub struct TraceRegistry<S: Scene> {
    scene: S,
    config: AdapterConfig,
    traces: AHashMap<String, HeatmapGl>,
    /// Uids in the order of the last sync
    order: Vec<String>,
}

impl<S: Scene> TraceRegistry<S> {
    /// Create an empty registry drawing into `scene`
    pub fn new(scene: S, config: AdapterConfig) -> Self {
        Self {
            scene,
            config,
            traces: AHashMap::new(),
            order: Vec::new(),
        }
    }

    /// Bring the registry in line with `traces`
    ///
    /// Each trace is processed independently; failures are returned per uid
    /// and do not stop the others. A trace that fails its first update is not
    /// registered. A trace that fails a later update keeps its previous state.
    pub fn sync(&mut self, traces: &[HeatmapTrace]) -> Vec<(String, TraceError)> {
        let mut failures = Vec::new();
        let mut order = Vec::with_capacity(traces.len());

        for trace in traces {
            if order.contains(&trace.uid) {
                warn!("Duplicate trace uid '{}', later entry wins", trace.uid);
            } else {
                order.push(trace.uid.clone());
            }

            if let Err(err) = self.upsert(trace) {
                warn!("Trace '{}' failed to update: {}", trace.uid, err);
                failures.push((trace.uid.clone(), err));
            }
        }

        let stale: Vec<String> = self
            .traces
            .keys()
            .filter(|uid| !order.contains(*uid))
            .cloned()
            .collect();
        for uid in stale {
            if let Some(trace) = self.traces.remove(&uid) {
                info!("Removing trace '{}'", uid);
                trace.dispose();
            }
        }

        order.retain(|uid| self.traces.contains_key(uid));
        self.order = order;
        debug!("Scene holds {} traces after sync", self.traces.len());
        failures
    }

    fn upsert(&mut self, trace: &HeatmapTrace) -> Result<(), TraceError> {
        let calc = calc_heatmap(trace);
        match self.traces.get_mut(&trace.uid) {
            Some(existing) => existing.update(trace, &calc),
            None => {
                let created = HeatmapGl::create(&mut self.scene, trace, &calc, self.config.clone())?;
                info!("Added trace '{}'", trace.uid);
                self.traces.insert(trace.uid.clone(), created);
                Ok(())
            }
        }
    }

    /// Resolve a pick reported for the trace `uid`
    pub fn pick(&self, uid: &str, event: &PickEvent) -> Result<PickResult, TraceError> {
        self.traces
            .get(uid)
            .ok_or_else(|| TraceError::UnknownTrace(uid.to_string()))?
            .handle_pick(event)
    }

    /// Union of every trace's bounds with min <= max, `None` for an empty scene
    pub fn data_bounds(&self) -> Option<Bounds> {
        self.iter()
            .map(HeatmapGl::bounds)
            .reduce(|acc, b| acc.union(&b))
            .map(|b| b.normalized())
    }

    pub fn get(&self, uid: &str) -> Option<&HeatmapGl> {
        self.traces.get(uid)
    }

    /// Traces in the order of the last sync
    pub fn iter(&self) -> impl Iterator<Item = &HeatmapGl> {
        self.order.iter().filter_map(|uid| self.traces.get(uid))
    }

    pub fn uids(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.traces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Dispose every trace
    pub fn clear(&mut self) {
        for (_, trace) in self.traces.drain() {
            trace.dispose();
        }
        self.order.clear();
    }
}

impl<S: Scene> Drop for TraceRegistry<S> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dv_core::InvalidTrace;
    use dv_render::HeadlessScene;

    fn registry() -> (TraceRegistry<HeadlessScene>, HeadlessScene) {
        let scene = HeadlessScene::new();
        (TraceRegistry::new(scene.clone(), AdapterConfig::default()), scene)
    }

    fn trace(uid: &str, z: Vec<Vec<f64>>) -> HeatmapTrace {
        HeatmapTrace::new(uid, z).with_domain(0.0, 10.0)
    }

    #[test]
    fn test_sync_creates_updates_and_removes() {
        let (mut registry, scene) = registry();

        let failures = registry.sync(&[trace("a", vec![vec![1.0, 2.0]]), trace("b", vec![vec![3.0]])]);
        assert!(failures.is_empty());
        assert_eq!(registry.uids(), ["a".to_string(), "b".to_string()]);
        assert_eq!(scene.handle_count(), 2);

        // same uid is updated in place, not reallocated
        registry.sync(&[trace("a", vec![vec![5.0, 6.0, 7.0]])]);
        assert_eq!(scene.handle_count(), 2);
        assert_eq!(scene.live_handles(), 1);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("a").unwrap().params().z, vec![5.0, 6.0, 7.0]);
        assert!(registry.get("b").is_none());
    }

    #[test]
    fn test_failures_are_scoped_to_one_trace() {
        let (mut registry, scene) = registry();

        let failures = registry.sync(&[
            trace("good", vec![vec![1.0]]),
            trace("bad", vec![vec![1.0, 2.0], vec![3.0]]),
        ]);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "bad");
        assert!(matches!(
            failures[0].1,
            TraceError::InvalidTrace(InvalidTrace::RaggedRow { .. })
        ));
        assert_eq!(registry.uids(), ["good".to_string()]);
        assert_eq!(scene.live_handles(), 1);
    }

    #[test]
    fn test_pick_routing() {
        let (mut registry, scene) = registry();
        registry.sync(&[trace("a", vec![vec![1.0, 2.0], vec![3.0, 4.0]])]);

        let event = scene.pick(0, [1.5, 1.5]).unwrap();
        let result = registry.pick("a", &event).unwrap();
        assert_eq!(result.z, 4.0);

        let err = registry.pick("missing", &event).unwrap_err();
        assert!(matches!(err, TraceError::UnknownTrace(ref uid) if uid == "missing"));
    }

    #[test]
    fn test_data_bounds_union() {
        let (mut registry, _scene) = registry();
        assert_eq!(registry.data_bounds(), None);

        registry.sync(&[
            trace("a", vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]),
            trace("b", vec![vec![1.0]]).with_x(vec![-5.0]).with_y(vec![8.0]),
        ]);
        assert_eq!(registry.data_bounds().unwrap().as_array(), [-5.0, 0.0, 3.0, 8.0]);
    }

    #[test]
    fn test_single_descending_trace_bounds() {
        let (mut registry, _scene) = registry();
        registry.sync(&[trace("a", vec![vec![1.0, 2.0]]).with_x(vec![30.0, 10.0])]);

        assert_eq!(registry.data_bounds().unwrap().as_array(), [10.0, 0.0, 30.0, 1.0]);
    }

    #[test]
    fn test_rejected_update_keeps_trace() {
        let (mut registry, scene) = registry();
        registry.sync(&[trace("a", vec![vec![1.0, 2.0], vec![3.0, 4.0]])]);

        scene.set_fail_updates(true);
        let failures = registry.sync(&[trace("a", vec![vec![9.0]])]);
        assert!(matches!(failures[0].1, TraceError::Render(_)));

        let event = scene.pick(0, [1.5, 1.5]).unwrap();
        assert_eq!(registry.pick("a", &event).unwrap().z, 4.0);
        assert_eq!(registry.data_bounds().unwrap().as_array(), [0.0, 0.0, 2.0, 2.0]);
    }

    #[test]
    fn test_drop_disposes_traces() {
        let (mut registry, scene) = registry();
        registry.sync(&[trace("a", vec![vec![1.0]]), trace("b", vec![vec![2.0]])]);
        assert_eq!(scene.live_handles(), 2);

        drop(registry);
        assert_eq!(scene.live_handles(), 0);
    }
}
