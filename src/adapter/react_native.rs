//! React Native adapter.
//!
//! The engine runs inside an embedded WebView; every capability call
//! crosses a message bridge. Acquisition is deferred on the bridge
//! handshake, and the handshake round-trip means an option set immediately
//! after `init` may arrive before the engine exists on the far side. That
//! first option is therefore best-effort: the adapter buffers the latest
//! one and replays it once the bridge reports ready, and callers remain
//! free to re-issue it themselves.

use std::rc::Rc;

use serde_json::Value;

use crate::config::ChartConfig;
use crate::engine::{EngineFactory, EngineHandle, EventHandler, ExportOptions, HandlerId};
use crate::error::AdapterResult;
use crate::platform::Platform;
use crate::surface::{CanvasHost, Surface, SurfaceElement};

use super::core::AdapterCore;
use super::{Adapter, InitStatus, PlatformCaps};

const CAPS: PlatformCaps = PlatformCaps {
    // The WebView engine renders svg as well as canvas.
    supports_svg: true,
    supports_export: true,
    async_surface: true,
};

pub struct ReactNativeAdapter {
    core: Rc<AdapterCore>,
}

impl ReactNativeAdapter {
    #[must_use]
    pub fn new(
        config: ChartConfig,
        host: Rc<dyn CanvasHost>,
        engines: Rc<dyn EngineFactory>,
    ) -> Self {
        Self {
            core: AdapterCore::new_buffering(Platform::ReactNative, CAPS, config, host, engines),
        }
    }
}

impl Adapter for ReactNativeAdapter {
    fn platform(&self) -> Platform {
        self.core.platform()
    }

    fn config(&self) -> &ChartConfig {
        self.core.config()
    }

    fn caps(&self) -> PlatformCaps {
        self.core.caps()
    }

    fn init(&mut self) -> AdapterResult<InitStatus> {
        if !self.core.begin_init() {
            return Ok(InitStatus::Unavailable);
        }
        AdapterCore::query_and_complete(&self.core);
        Ok(self.core.status_after_init())
    }

    fn instance(&self) -> Option<EngineHandle> {
        self.core.instance()
    }

    fn surface(&self) -> Option<Surface> {
        self.core.surface()
    }

    fn set_option(&mut self, option: &Value, not_merge: bool) -> AdapterResult<()> {
        self.core.set_option(option, not_merge)
    }

    fn resize(&mut self) -> AdapterResult<()> {
        self.core.resize()
    }

    fn on(&mut self, event: &str, handler: EventHandler) -> Option<HandlerId> {
        self.core.on(event, handler)
    }

    fn off(&mut self, event: &str, id: Option<HandlerId>) {
        self.core.off(event, id)
    }

    fn dispatch_action(&mut self, action: &Value) -> AdapterResult<()> {
        self.core.dispatch_action(action)
    }

    fn show_loading(&mut self, opts: Option<&Value>) {
        self.core.show_loading(opts)
    }

    fn hide_loading(&mut self) {
        self.core.hide_loading()
    }

    fn get_data_url(&self, opts: &ExportOptions) -> Option<String> {
        self.core.get_data_url(opts)
    }

    fn clear(&mut self) {
        self.core.clear()
    }

    fn dispose(&mut self) -> AdapterResult<()> {
        self.core.dispose()
    }

    fn render(&self) -> SurfaceElement {
        SurfaceElement::WebViewBridge {
            bridge_id: self.core.canvas_id().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::engine::NullEngineFactory;
    use crate::surface::{HeadlessHost, Surface, SurfaceKind};

    use super::*;

    #[test]
    fn option_before_bridge_ready_is_buffered_and_replayed() {
        let host = Rc::new(
            HeadlessHost::deferred().with_surface(Surface::new(
                "bridge",
                SurfaceKind::OffscreenWebView,
                360.0,
                640.0,
            )),
        );
        let engines = Rc::new(NullEngineFactory::new());
        let mut adapter = ReactNativeAdapter::new(
            ChartConfig::new("bridge"),
            host.clone(),
            engines.clone(),
        );

        assert_eq!(adapter.init().expect("init"), InitStatus::Pending);
        let option = json!({"series": [{"type": "line", "data": [1, 2, 3]}]});
        adapter
            .set_option(&option, false)
            .expect("pre-ready option is best-effort, not an error");

        host.flush();
        let engine = engines.last_engine().expect("engine after handshake");
        let applied = &engine.borrow().applied_options;
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].0, option);
        assert!(!applied[0].1);
    }

    #[test]
    fn only_the_latest_pre_ready_option_is_replayed() {
        let host = Rc::new(
            HeadlessHost::deferred().with_surface(Surface::new(
                "bridge",
                SurfaceKind::OffscreenWebView,
                360.0,
                640.0,
            )),
        );
        let engines = Rc::new(NullEngineFactory::new());
        let mut adapter = ReactNativeAdapter::new(
            ChartConfig::new("bridge"),
            host.clone(),
            engines.clone(),
        );

        adapter.init().expect("init");
        adapter.set_option(&json!({"v": 1}), false).expect("first");
        adapter.set_option(&json!({"v": 2}), true).expect("second");

        host.flush();
        let engine = engines.last_engine().expect("engine after handshake");
        let applied = &engine.borrow().applied_options;
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].0, json!({"v": 2}));
        assert!(applied[0].1);
    }
}
