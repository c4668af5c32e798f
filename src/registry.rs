//! Process-wide lookup from chart id to live engine handle.
//!
//! The registry exists for bulk operations (window-level resize listeners,
//! app-teardown sweeps) and holds *non-owning* `Weak` references: disposal
//! authority stays with whichever caller drives the chart's lifecycle, and
//! that caller's disposal path is responsible for deregistering. An
//! explicit object owned by the composition root, never hidden module
//! state.

use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use tracing::warn;

use crate::config::ChartId;
use crate::engine::EngineHandle;

type WeakEngine = Weak<std::cell::RefCell<dyn crate::engine::ChartEngine>>;

#[derive(Default)]
pub struct ChartRegistry {
    charts: IndexMap<ChartId, WeakEngine>,
}

impl ChartRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handle under `id`, replacing any prior entry.
    ///
    /// Replacement never disposes: disposal ordering belongs to the caller,
    /// which must not have a still-in-use instance torn down mid-hot-swap.
    pub fn register(&mut self, id: ChartId, handle: &EngineHandle) {
        self.charts.insert(id, Rc::downgrade(handle));
    }

    /// Live handle for `id`, pruning the entry when the instance is gone.
    pub fn get(&mut self, id: &ChartId) -> Option<EngineHandle> {
        match self.charts.get(id).and_then(Weak::upgrade) {
            Some(handle) => Some(handle),
            None => {
                self.charts.shift_remove(id);
                None
            }
        }
    }

    /// Removes the entry for `id`. Returns `true` when one existed.
    pub fn remove(&mut self, id: &ChartId) -> bool {
        self.charts.shift_remove(id).is_some()
    }

    /// All live entries, in registration order. Dead entries are pruned.
    pub fn get_all(&mut self) -> Vec<(ChartId, EngineHandle)> {
        self.charts.retain(|_, weak| weak.strong_count() > 0);
        self.charts
            .iter()
            .filter_map(|(id, weak)| weak.upgrade().map(|handle| (id.clone(), handle)))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.charts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    /// Resizes every live instance. One broken chart never blocks the rest:
    /// per-instance failures are logged and the sweep continues. Returns the
    /// number of instances resized successfully.
    pub fn resize_all(&mut self) -> usize {
        let entries = self.get_all();
        let mut resized = 0;
        for (id, handle) in entries {
            match handle.borrow_mut().resize(None) {
                Ok(()) => resized += 1,
                Err(err) => {
                    warn!(chart_id = %id, error = %err, "resize failed during bulk sweep");
                }
            }
        }
        resized
    }

    /// Disposes every live instance and empties the registry, even when
    /// individual disposals fail. Iterates a snapshot so the map is already
    /// clear if anything re-enters during the sweep. Returns the number of
    /// instances disposed successfully.
    pub fn dispose_all(&mut self) -> usize {
        let entries = std::mem::take(&mut self.charts);
        let mut disposed = 0;
        for (id, weak) in entries {
            let Some(handle) = weak.upgrade() else {
                continue;
            };
            match handle.borrow_mut().dispose() {
                Ok(()) => disposed += 1,
                Err(err) => {
                    warn!(chart_id = %id, error = %err, "dispose failed during bulk sweep");
                }
            }
        }
        disposed
    }
}

impl std::fmt::Debug for ChartRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartRegistry")
            .field("entries", &self.charts.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::engine::{EngineHandle, NullEngine};

    use super::*;

    fn handle() -> EngineHandle {
        Rc::new(RefCell::new(NullEngine::default()))
    }

    #[test]
    fn register_then_remove_leaves_nothing() {
        let mut registry = ChartRegistry::new();
        let engine = handle();
        let id = ChartId::new("a");

        registry.register(id.clone(), &engine);
        assert!(registry.get(&id).is_some());
        assert!(registry.remove(&id));
        assert!(registry.get(&id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn dropped_handles_are_pruned_on_access() {
        let mut registry = ChartRegistry::new();
        let id = ChartId::new("gone");
        {
            let engine = handle();
            registry.register(id.clone(), &engine);
        }
        assert_eq!(registry.len(), 1);
        assert!(registry.get(&id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn register_same_id_replaces_without_disposing_prior() {
        let mut registry = ChartRegistry::new();
        let first = handle();
        let second = handle();
        let id = ChartId::new("swap");

        registry.register(id.clone(), &first);
        registry.register(id.clone(), &second);

        assert_eq!(registry.len(), 1);
        assert!(!first.borrow().is_disposed());
        let live = registry.get(&id).expect("replacement entry");
        assert!(Rc::ptr_eq(&live, &second));
    }
}
