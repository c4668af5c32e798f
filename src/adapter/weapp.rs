//! WeChat mini-program adapter.
//!
//! The canvas node is resolved through the host's selector query
//! (`wx.createSelectorQuery` in the real runtime), which reports back
//! asynchronously with the node, its context, and its measured size. The
//! query racing the component mount is normal: a missing node resolves to
//! `Unavailable` and the caller retries on its next mount cycle. Only the
//! `canvas` renderer exists here; `svg` requests degrade. The device pixel
//! ratio comes from the host's system info, never assumed to be 1.

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
    supports_svg: false,
    supports_export: true,
    async_surface: true,
};

pub struct WeappAdapter {
    core: Rc<AdapterCore>,
}

impl WeappAdapter {
    #[must_use]
    pub fn new(
        config: ChartConfig,
        host: Rc<dyn CanvasHost>,
        engines: Rc<dyn EngineFactory>,
    ) -> Self {
        Self {
            core: AdapterCore::new(Platform::Weapp, CAPS, config, host, engines),
        }
    }
}

impl Adapter for WeappAdapter {
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
        SurfaceElement::NativeCanvas {
            canvas_id: self.core.canvas_id().to_owned(),
            canvas_type: "2d".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::RendererKind;
    use crate::engine::NullEngineFactory;
    use crate::surface::{HeadlessHost, Surface, SurfaceKind};

    use super::*;

    #[test]
    fn deferred_query_reports_pending_until_flushed() {
        let host = Rc::new(
            HeadlessHost::deferred()
                .with_surface(Surface::new("main", SurfaceKind::NodeCanvas, 320.0, 240.0)),
        );
        let engines = Rc::new(NullEngineFactory::new());
        let mut adapter = WeappAdapter::new(ChartConfig::new("main"), host.clone(), engines);

        assert_eq!(adapter.init().expect("init"), InitStatus::Pending);
        assert!(adapter.instance().is_none());

        host.flush();
        assert!(adapter.instance().is_some());
    }

    #[test]
    fn device_pixel_ratio_comes_from_the_host() {
        let host = Rc::new(
            HeadlessHost::immediate()
                .with_device_pixel_ratio(3.0)
                .with_surface(Surface::new("main", SurfaceKind::NodeCanvas, 320.0, 240.0)),
        );
        let engines = Rc::new(NullEngineFactory::new());
        let mut adapter =
            WeappAdapter::new(ChartConfig::new("main"), host, engines.clone());

        adapter.init().expect("init");
        let record = engines.init_calls().pop().expect("one init call");
        assert_eq!(record.opts.device_pixel_ratio, 3.0);
        assert_eq!(record.surface.device_pixel_ratio, 3.0);
    }

    #[test]
    fn svg_request_degrades_to_canvas_without_error() {
        let host = Rc::new(
            HeadlessHost::immediate()
                .with_surface(Surface::new("main", SurfaceKind::NodeCanvas, 320.0, 240.0)),
        );
        let engines = Rc::new(NullEngineFactory::new());
        let config = ChartConfig::new("main").with_renderer(RendererKind::Svg);
        let mut adapter = WeappAdapter::new(config, host, engines.clone());

        assert_eq!(adapter.init().expect("init"), InitStatus::Ready);
        let record = engines.init_calls().pop().expect("one init call");
        assert_eq!(record.opts.renderer, RendererKind::Canvas);
    }
}
