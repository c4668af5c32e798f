//! Alipay mini-program adapter.
//!
//! Same acquisition shape as WeChat (`my.createSelectorQuery` in the real
//! runtime): an asynchronous node query resolving through a callback.
//! Export differs: the host only offers a temp-file snapshot path, so
//! `get_data_url` reports `None` instead of an in-memory data URL.

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
    supports_export: false,
    async_surface: true,
};

pub struct AlipayAdapter {
    core: Rc<AdapterCore>,
}

impl AlipayAdapter {
    #[must_use]
    pub fn new(
        config: ChartConfig,
        host: Rc<dyn CanvasHost>,
        engines: Rc<dyn EngineFactory>,
    ) -> Self {
        Self {
            core: AdapterCore::new(Platform::Alipay, CAPS, config, host, engines),
        }
    }
}

impl Adapter for AlipayAdapter {
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
