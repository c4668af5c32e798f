//! Web (browser) adapter.
//!
//! Surface acquisition is synchronous: the DOM element either exists at
//! call time or it does not. Both `canvas` and `svg` renderers are
//! supported, as is image export. Window-resize debouncing lives in the
//! lifecycle layer, which feeds the host resize events through its
//! trailing-edge debouncer.

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
    supports_svg: true,
    supports_export: true,
    async_surface: false,
};

pub struct H5Adapter {
    core: Rc<AdapterCore>,
}

impl H5Adapter {
    #[must_use]
    pub fn new(
        config: ChartConfig,
        host: Rc<dyn CanvasHost>,
        engines: Rc<dyn EngineFactory>,
    ) -> Self {
        Self {
            core: AdapterCore::new(Platform::H5, CAPS, config, host, engines),
        }
    }
}

impl Adapter for H5Adapter {
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
        let found = self.core.host().find_surface(self.core.canvas_id());
        self.core.complete_with_surface(found);
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
        SurfaceElement::DomCanvas {
            element_id: self.core.canvas_id().to_owned(),
            renderer: self.core.effective_renderer(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::NullEngineFactory;
    use crate::surface::{HeadlessHost, Surface, SurfaceKind};

    use super::*;

    fn adapter_with_surface() -> (H5Adapter, Rc<NullEngineFactory>) {
        let host = Rc::new(
            HeadlessHost::immediate()
                .with_surface(Surface::new("main", SurfaceKind::Dom, 800.0, 600.0)),
        );
        let engines = Rc::new(NullEngineFactory::new());
        let adapter = H5Adapter::new(ChartConfig::new("main"), host, engines.clone());
        (adapter, engines)
    }

    #[test]
    fn init_is_synchronous_and_ready() {
        let (mut adapter, engines) = adapter_with_surface();
        let status = adapter.init().expect("init");
        assert_eq!(status, InitStatus::Ready);
        assert!(adapter.instance().is_some());
        assert_eq!(engines.created_count(), 1);
    }

    #[test]
    fn missing_element_is_unavailable_not_an_error() {
        let host = Rc::new(HeadlessHost::immediate());
        let engines = Rc::new(NullEngineFactory::new());
        let mut adapter = H5Adapter::new(ChartConfig::new("absent"), host, engines);
        let status = adapter.init().expect("init must not fail");
        assert_eq!(status, InitStatus::Unavailable);
        assert!(adapter.instance().is_none());
    }

    #[test]
    fn bound_surface_is_exposed_until_dispose() {
        let (mut adapter, _engines) = adapter_with_surface();
        adapter.init().expect("init");

        let surface = adapter.surface().expect("bound surface");
        assert_eq!(surface.canvas_id, "main");
        assert_eq!(surface.width, 800.0);

        adapter.dispose().expect("dispose");
        assert!(adapter.surface().is_none());
    }

    #[test]
    fn render_descriptor_is_a_dom_canvas() {
        let (adapter, _) = adapter_with_surface();
        assert_eq!(
            adapter.render(),
            SurfaceElement::DomCanvas {
                element_id: "main".to_owned(),
                renderer: crate::config::RendererKind::Canvas,
            }
        );
    }
}
