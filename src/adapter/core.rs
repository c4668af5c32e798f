//! Plumbing shared by every platform adapter.
//!
//! Platform files own surface acquisition and the mount descriptor; the
//! core owns engine construction, option/event forwarding, renderer
//! degradation, and teardown. Held behind `Rc` so deferred host callbacks
//! can re-enter the adapter after `init` has returned.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use smallvec::SmallVec;
use tracing::warn;

use crate::config::{ChartConfig, RendererKind};
use crate::engine::{
    EngineFactory, EngineHandle, EngineInitOptions, EventHandler, ExportOptions, HandlerId,
};
use crate::error::AdapterResult;
use crate::platform::Platform;
use crate::surface::{CanvasHost, Surface, SurfaceSize};

use super::{InitStatus, PlatformCaps};

#[derive(Default)]
struct CoreState {
    engine: Option<EngineHandle>,
    surface: Option<Surface>,
    bound: SmallVec<[(String, HandlerId); 4]>,
    disposed: bool,
    /// Bumped by every `begin_init`; completions from an older attempt are
    /// stale and must not land.
    generation: u64,
    /// Set once the current attempt's acquisition has resolved, found or not.
    query_resolved: bool,
    /// Latest option received while no engine exists yet (bridge platforms).
    pending_option: Option<(Value, bool)>,
}

pub(crate) struct AdapterCore {
    platform: Platform,
    caps: PlatformCaps,
    config: ChartConfig,
    /// Buffer `set_option` calls arriving before the engine exists instead
    /// of dropping them (React Native bridge latency).
    buffer_pending_option: bool,
    host: Rc<dyn CanvasHost>,
    engines: Rc<dyn EngineFactory>,
    state: RefCell<CoreState>,
}

impl AdapterCore {
    pub(crate) fn new(
        platform: Platform,
        caps: PlatformCaps,
        config: ChartConfig,
        host: Rc<dyn CanvasHost>,
        engines: Rc<dyn EngineFactory>,
    ) -> Rc<Self> {
        Self::build(platform, caps, config, false, host, engines)
    }

    pub(crate) fn new_buffering(
        platform: Platform,
        caps: PlatformCaps,
        config: ChartConfig,
        host: Rc<dyn CanvasHost>,
        engines: Rc<dyn EngineFactory>,
    ) -> Rc<Self> {
        Self::build(platform, caps, config, true, host, engines)
    }

    fn build(
        platform: Platform,
        caps: PlatformCaps,
        config: ChartConfig,
        buffer_pending_option: bool,
        host: Rc<dyn CanvasHost>,
        engines: Rc<dyn EngineFactory>,
    ) -> Rc<Self> {
        Rc::new(Self {
            platform,
            caps,
            config,
            buffer_pending_option,
            host,
            engines,
            state: RefCell::new(CoreState::default()),
        })
    }

    pub(crate) fn platform(&self) -> Platform {
        self.platform
    }

    pub(crate) fn caps(&self) -> PlatformCaps {
        self.caps
    }

    pub(crate) fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub(crate) fn canvas_id(&self) -> &str {
        &self.config.canvas_id
    }

    pub(crate) fn host(&self) -> &dyn CanvasHost {
        self.host.as_ref()
    }

    /// Renderer actually passed to the engine. An `svg` request on a
    /// platform without svg support degrades to `canvas` instead of failing.
    pub(crate) fn effective_renderer(&self) -> RendererKind {
        if self.config.renderer == RendererKind::Svg && !self.caps.supports_svg {
            warn!(
                platform = %self.platform,
                canvas_id = %self.config.canvas_id,
                "svg renderer not supported on this platform, falling back to canvas"
            );
            return RendererKind::Canvas;
        }
        self.config.renderer
    }

    /// Configured dimensions resolved against the current host viewport.
    pub(crate) fn resolved_size(&self) -> SurfaceSize {
        let viewport = self.host.viewport_size();
        SurfaceSize::new(
            self.config.width.resolve(viewport.width),
            self.config.height.resolve(viewport.height),
        )
    }

    /// Config override, then the surface-reported ratio, then the host.
    /// Mini-program hosts report real ratios here; `1.0` is never assumed.
    fn effective_device_pixel_ratio(&self, surface: &Surface) -> f64 {
        if let Some(ratio) = self.config.device_pixel_ratio {
            return ratio;
        }
        if surface.device_pixel_ratio > 0.0 {
            return surface.device_pixel_ratio;
        }
        self.host.device_pixel_ratio()
    }

    /// Prepares for a (re-)acquisition attempt. Returns `false` when the
    /// adapter is disposed and the attempt must not proceed. A live prior
    /// engine is disposed first, and the generation bump invalidates any
    /// prior attempt's query still in flight, so at most one instance exists
    /// per adapter.
    pub(crate) fn begin_init(&self) -> bool {
        let (prior, bound) = {
            let mut state = self.state.borrow_mut();
            if state.disposed {
                return false;
            }
            state.generation += 1;
            state.query_resolved = false;
            state.surface = None;
            (state.engine.take(), std::mem::take(&mut state.bound))
        };
        if let Some(engine) = prior {
            let mut engine = engine.borrow_mut();
            for (event, id) in bound {
                engine.off(&event, Some(id));
            }
            if let Err(err) = engine.dispose() {
                warn!(
                    canvas_id = %self.config.canvas_id,
                    error = %err,
                    "failed to dispose prior engine instance during re-init"
                );
            }
        }
        true
    }

    /// Completes a synchronous acquisition with the lookup outcome. No-op
    /// when the adapter is disposed or when no node was found.
    pub(crate) fn complete_with_surface(&self, found: Option<Surface>) {
        let generation = self.state.borrow().generation;
        self.complete_with_surface_at(generation, found);
    }

    /// Completes the acquisition attempt tagged `generation`. No-op when the
    /// adapter was disposed while the query was in flight (the liveness
    /// guard for unmounts racing mini-program selector callbacks), when the
    /// attempt has been superseded by a newer `begin_init`, or when no node
    /// was found.
    fn complete_with_surface_at(&self, generation: u64, found: Option<Surface>) {
        {
            let mut state = self.state.borrow_mut();
            if state.disposed || state.generation != generation {
                return;
            }
            state.query_resolved = true;
        }
        let Some(mut surface) = found else {
            return;
        };

        let ratio = self.effective_device_pixel_ratio(&surface);
        surface.device_pixel_ratio = ratio;
        let resolved = self.resolved_size();
        let width = if surface.width > 0.0 {
            surface.width
        } else {
            resolved.width
        };
        let height = if surface.height > 0.0 {
            surface.height
        } else {
            resolved.height
        };

        let opts = EngineInitOptions {
            renderer: self.effective_renderer(),
            width,
            height,
            device_pixel_ratio: ratio,
        };
        let engine = self
            .engines
            .init(&surface, self.config.theme.as_ref(), &opts);

        let pending = {
            let mut state = self.state.borrow_mut();
            if state.disposed || state.generation != generation {
                // Disposed or superseded on the callback stack between the
                // guard above and engine construction; drop the fresh
                // instance immediately.
                drop(state);
                let _ = engine.borrow_mut().dispose();
                return;
            }
            state.surface = Some(surface);
            state.engine = Some(Rc::clone(&engine));
            state.pending_option.take()
        };
        if let Some((option, not_merge)) = pending {
            if let Err(err) = engine.borrow_mut().set_option(&option, not_merge) {
                warn!(
                    canvas_id = %self.config.canvas_id,
                    error = %err,
                    "buffered option rejected after deferred init"
                );
            }
        }
    }

    /// Status to report from `init` after the acquisition attempt ran.
    pub(crate) fn status_after_init(&self) -> InitStatus {
        let state = self.state.borrow();
        if state.engine.is_some() {
            InitStatus::Ready
        } else if state.disposed || state.query_resolved {
            InitStatus::Unavailable
        } else {
            InitStatus::Pending
        }
    }

    pub(crate) fn instance(&self) -> Option<EngineHandle> {
        self.state.borrow().engine.clone()
    }

    pub(crate) fn surface(&self) -> Option<Surface> {
        self.state.borrow().surface.clone()
    }

    pub(crate) fn set_option(&self, option: &Value, not_merge: bool) -> AdapterResult<()> {
        let engine = {
            let mut state = self.state.borrow_mut();
            if state.disposed {
                return Ok(());
            }
            match state.engine.clone() {
                Some(engine) => engine,
                None => {
                    if self.buffer_pending_option {
                        state.pending_option = Some((option.clone(), not_merge));
                    }
                    return Ok(());
                }
            }
        };
        engine.borrow_mut().set_option(option, not_merge)
    }

    pub(crate) fn resize(&self) -> AdapterResult<()> {
        let Some(engine) = self.live_engine() else {
            return Ok(());
        };
        let size = self.resolved_size();
        engine.borrow_mut().resize(Some(size))
    }

    pub(crate) fn on(&self, event: &str, handler: EventHandler) -> Option<HandlerId> {
        let engine = self.live_engine()?;
        let id = engine.borrow_mut().on(event, handler);
        self.state
            .borrow_mut()
            .bound
            .push((event.to_owned(), id));
        Some(id)
    }

    pub(crate) fn off(&self, event: &str, id: Option<HandlerId>) {
        let Some(engine) = self.live_engine() else {
            return;
        };
        engine.borrow_mut().off(event, id);
        self.state
            .borrow_mut()
            .bound
            .retain(|(name, bound)| name != event || id.is_some_and(|wanted| *bound != wanted));
    }

    pub(crate) fn dispatch_action(&self, action: &Value) -> AdapterResult<()> {
        match self.live_engine() {
            Some(engine) => engine.borrow_mut().dispatch_action(action),
            None => Ok(()),
        }
    }

    pub(crate) fn show_loading(&self, opts: Option<&Value>) {
        if let Some(engine) = self.live_engine() {
            engine.borrow_mut().show_loading(opts);
        }
    }

    pub(crate) fn hide_loading(&self) {
        if let Some(engine) = self.live_engine() {
            engine.borrow_mut().hide_loading();
        }
    }

    pub(crate) fn get_data_url(&self, opts: &ExportOptions) -> Option<String> {
        if !self.caps.supports_export {
            return None;
        }
        let engine = self.live_engine()?;
        let url = engine.borrow().get_data_url(opts);
        url
    }

    pub(crate) fn clear(&self) {
        if let Some(engine) = self.live_engine() {
            engine.borrow_mut().clear();
        }
    }

    /// Unbinds every recorded handler, disposes the engine, and marks the
    /// adapter terminally disposed. Idempotent; a failing engine dispose is
    /// still surfaced but the adapter stays disposed regardless.
    pub(crate) fn dispose(&self) -> AdapterResult<()> {
        let (engine, bound) = {
            let mut state = self.state.borrow_mut();
            if state.disposed {
                return Ok(());
            }
            state.disposed = true;
            state.surface = None;
            state.pending_option = None;
            (state.engine.take(), std::mem::take(&mut state.bound))
        };
        if let Some(engine) = engine {
            let mut engine = engine.borrow_mut();
            for (event, id) in bound {
                engine.off(&event, Some(id));
            }
            engine.dispose()?;
        }
        Ok(())
    }

    /// Runs one callback-based acquisition attempt against the host. The
    /// continuation holds its own `Rc` so it stays valid however late the
    /// host resolves it; the captured generation makes it a no-op once the
    /// adapter is disposed or a newer attempt has started.
    pub(crate) fn query_and_complete(core: &Rc<Self>) {
        let generation = core.state.borrow().generation;
        let continuation = Rc::clone(core);
        core.host.query_surface(
            core.canvas_id(),
            Box::new(move |found| continuation.complete_with_surface_at(generation, found)),
        );
    }

    fn live_engine(&self) -> Option<EngineHandle> {
        let state = self.state.borrow();
        if state.disposed {
            return None;
        }
        state.engine.clone()
    }
}
