//! The init → bind-events → set-option → [update] → dispose sequence any UI
//! binding follows around an adapter instance.
//!
//! One `ChartLifecycle` drives exactly one mounted chart through
//! `Uninitialized → Initializing → Ready → Updating (self-loop) → Disposed`.
//! `Disposed` is terminal; a new mount of the same logical chart is a new
//! lifecycle. Deferred surface acquisition completes on the caller's next
//! mount/update cycle via [`ChartLifecycle::poll`]; the host's render loop
//! is the retry mechanism, so an unmount racing a pending init simply means
//! the late callback finds a disposed adapter and does nothing.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, warn};

use crate::adapter::{Adapter, InitStatus};
use crate::config::ChartId;
use crate::engine::{EngineHandle, EventHandler};
use crate::error::AdapterResult;
use crate::registry::ChartRegistry;

/// Window within which resize bursts collapse into one trailing invocation.
pub const RESIZE_DEBOUNCE_WINDOW: Duration = Duration::from_millis(100);

/// Trailing-edge debouncer.
///
/// Every request re-arms the deadline; the pending invocation fires once the
/// window elapses with no further requests. Driven by explicit timestamps so
/// hosts with different tick sources (rAF, timers, test clocks) can all feed
/// it deterministically.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub fn request(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Consumes the pending invocation when its deadline has passed.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(RESIZE_DEBOUNCE_WINDOW)
    }
}

/// Phases of one mounted chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Uninitialized,
    Initializing,
    Ready,
    Updating,
    Disposed,
}

/// Invoked once, with the live engine handle, when the chart becomes ready.
pub type ReadyCallback = Box<dyn FnOnce(&EngineHandle)>;

pub struct ChartLifecycle {
    id: ChartId,
    adapter: Box<dyn Adapter>,
    registry: Rc<RefCell<ChartRegistry>>,
    phase: LifecyclePhase,
    on_ready: Option<ReadyCallback>,
    /// Handlers queued before the engine exists; bound at the Ready transition.
    pending_handlers: Vec<(String, EventHandler)>,
    resize_debounce: Debouncer,
}

impl ChartLifecycle {
    #[must_use]
    pub fn new(
        id: ChartId,
        adapter: Box<dyn Adapter>,
        registry: Rc<RefCell<ChartRegistry>>,
    ) -> Self {
        Self {
            id,
            adapter,
            registry,
            phase: LifecyclePhase::Uninitialized,
            on_ready: None,
            pending_handlers: Vec::new(),
            resize_debounce: Debouncer::default(),
        }
    }

    #[must_use]
    pub fn with_on_ready(mut self, callback: ReadyCallback) -> Self {
        self.on_ready = Some(callback);
        self
    }

    /// Queues an event binding. Before Ready the handler waits; afterwards it
    /// binds immediately.
    pub fn bind(&mut self, event: impl Into<String>, handler: EventHandler) {
        let event = event.into();
        if matches!(self.phase, LifecyclePhase::Ready | LifecyclePhase::Updating) {
            self.adapter.on(&event, handler);
        } else if self.phase != LifecyclePhase::Disposed {
            self.pending_handlers.push((event, handler));
        }
    }

    #[must_use]
    pub fn id(&self) -> &ChartId {
        &self.id
    }

    #[must_use]
    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    #[must_use]
    pub fn instance(&self) -> Option<EngineHandle> {
        self.adapter.instance()
    }

    #[must_use]
    pub fn adapter(&self) -> &dyn Adapter {
        self.adapter.as_ref()
    }

    /// Starts the chart: runs adapter init and, when acquisition completes
    /// synchronously, transitions straight to Ready. A chart whose surface is
    /// still pending stays `Initializing` until a later [`poll`]/update.
    ///
    /// [`poll`]: ChartLifecycle::poll
    pub fn mount(&mut self) -> AdapterResult<LifecyclePhase> {
        if self.phase == LifecyclePhase::Disposed {
            return Ok(LifecyclePhase::Disposed);
        }
        self.set_phase(LifecyclePhase::Initializing);
        let status = self.adapter.init()?;
        if status == InitStatus::Ready || self.adapter.instance().is_some() {
            self.finish_init();
        }
        Ok(self.phase)
    }

    /// Completes a deferred init when the surface has arrived since the last
    /// cycle. Safe to call from any phase.
    pub fn poll(&mut self) {
        if self.phase == LifecyclePhase::Initializing && self.adapter.instance().is_some() {
            self.finish_init();
        }
    }

    /// Ready transition: bind queued handlers, fire `on_ready`, apply the
    /// configured initial option, register the handle. In that order.
    fn finish_init(&mut self) {
        let Some(handle) = self.adapter.instance() else {
            return;
        };
        for (event, handler) in self.pending_handlers.drain(..) {
            self.adapter.on(&event, handler);
        }
        if let Some(callback) = self.on_ready.take() {
            callback(&handle);
        }
        if let Some(option) = self.adapter.config().option.clone() {
            if let Err(err) = self.adapter.set_option(&option, false) {
                warn!(chart_id = %self.id, error = %err, "initial option rejected by engine");
            }
        }
        self.registry.borrow_mut().register(self.id.clone(), &handle);
        self.set_phase(LifecyclePhase::Ready);
    }

    /// Forwards an option update with merge semantics by default
    /// (`not_merge = false`). Updates apply in call order; only resize is
    /// ever coalesced. Silent no-op before Ready and after Disposed.
    pub fn update_option(&mut self, option: &Value, not_merge: bool) -> AdapterResult<()> {
        self.poll();
        match self.phase {
            LifecyclePhase::Ready => {
                self.set_phase(LifecyclePhase::Updating);
                let outcome = self.adapter.set_option(option, not_merge);
                self.set_phase(LifecyclePhase::Ready);
                outcome
            }
            _ => Ok(()),
        }
    }

    /// Toggles the engine's built-in loading overlay.
    pub fn set_loading(&mut self, loading: bool, opts: Option<&Value>) {
        self.poll();
        if !matches!(self.phase, LifecyclePhase::Ready | LifecyclePhase::Updating) {
            return;
        }
        if loading {
            self.adapter.show_loading(opts);
        } else {
            self.adapter.hide_loading();
        }
    }

    /// Records a resize trigger (window resize event, orientation change).
    /// The actual engine resize happens in [`flush_resize`] after the
    /// debounce window elapses.
    ///
    /// [`flush_resize`]: ChartLifecycle::flush_resize
    pub fn request_resize(&mut self, now: Instant) {
        if self.phase != LifecyclePhase::Disposed {
            self.resize_debounce.request(now);
        }
    }

    /// Performs at most one engine resize per request burst. Returns whether
    /// a resize was performed.
    pub fn flush_resize(&mut self, now: Instant) -> AdapterResult<bool> {
        if self.phase == LifecyclePhase::Disposed || !self.resize_debounce.fire_due(now) {
            return Ok(false);
        }
        self.poll();
        self.adapter.resize()?;
        Ok(true)
    }

    /// Tears the chart down: adapter dispose (which unbinds events first),
    /// then registry removal, then the terminal phase. Idempotent, and safe
    /// to call while an async surface acquisition is still outstanding.
    pub fn unmount(&mut self) -> AdapterResult<()> {
        if self.phase == LifecyclePhase::Disposed {
            return Ok(());
        }
        let outcome = self.adapter.dispose();
        self.registry.borrow_mut().remove(&self.id);
        self.set_phase(LifecyclePhase::Disposed);
        self.pending_handlers.clear();
        outcome
    }

    fn set_phase(&mut self, phase: LifecyclePhase) {
        if self.phase != phase {
            debug!(chart_id = %self.id, ?phase, "lifecycle phase transition");
            self.phase = phase;
        }
    }
}

impl Drop for ChartLifecycle {
    fn drop(&mut self) {
        if self.phase != LifecyclePhase::Disposed {
            if let Err(err) = self.unmount() {
                warn!(chart_id = %self.id, error = %err, "dispose failed during drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::Debouncer;

    #[test]
    fn debouncer_fires_once_after_trailing_edge() {
        let mut debounce = Debouncer::new(Duration::from_millis(100));
        let start = Instant::now();

        debounce.request(start);
        debounce.request(start + Duration::from_millis(30));
        debounce.request(start + Duration::from_millis(60));

        assert!(!debounce.fire_due(start + Duration::from_millis(90)));
        assert!(debounce.fire_due(start + Duration::from_millis(160)));
        assert!(!debounce.fire_due(start + Duration::from_millis(200)));
    }

    #[test]
    fn each_request_rearms_the_deadline() {
        let mut debounce = Debouncer::new(Duration::from_millis(100));
        let start = Instant::now();

        debounce.request(start);
        debounce.request(start + Duration::from_millis(90));
        // The first deadline has passed, but the burst is still live.
        assert!(!debounce.fire_due(start + Duration::from_millis(120)));
        assert!(debounce.fire_due(start + Duration::from_millis(190)));
    }
}
