//! Adapter selection: explicit platform override, or auto-detection.

use std::rc::Rc;

use crate::adapter::{Adapter, H5Adapter};
use crate::config::ChartConfig;
use crate::engine::EngineFactory;
use crate::error::{AdapterError, AdapterResult};
use crate::platform::{self, EnvironmentProbe, Platform};
use crate::surface::CanvasHost;

/// Injectable capabilities owned by the application's composition root.
///
/// Bundling them keeps the factory signature stable while every seam
/// (environment probe, canvas host, engine construction) stays replaceable
/// in tests and headless embeddings.
#[derive(Clone)]
pub struct AdapterContext {
    pub probe: Rc<dyn EnvironmentProbe>,
    pub host: Rc<dyn CanvasHost>,
    pub engines: Rc<dyn EngineFactory>,
}

impl AdapterContext {
    #[must_use]
    pub fn new(
        probe: Rc<dyn EnvironmentProbe>,
        host: Rc<dyn CanvasHost>,
        engines: Rc<dyn EngineFactory>,
    ) -> Self {
        Self {
            probe,
            host,
            engines,
        }
    }
}

/// Constructs the adapter matching the configured or detected platform.
///
/// Every call produces a fresh adapter (no caching, no singletons), so
/// multiple charts on one page get independent instances. Fails only on
/// actual misconfiguration: a missing canvas id, or a platform tag whose
/// adapter was compiled out of this build.
pub fn get_adapter(config: ChartConfig, ctx: &AdapterContext) -> AdapterResult<Box<dyn Adapter>> {
    if config.canvas_id.trim().is_empty() {
        return Err(AdapterError::MissingCanvasId);
    }
    let resolved = config
        .platform
        .unwrap_or_else(|| platform::detect(ctx.probe.as_ref()));

    let host = Rc::clone(&ctx.host);
    let engines = Rc::clone(&ctx.engines);
    match resolved {
        Platform::H5 => Ok(Box::new(H5Adapter::new(config, host, engines))),

        #[cfg(feature = "weapp")]
        Platform::Weapp => Ok(Box::new(crate::adapter::WeappAdapter::new(
            config, host, engines,
        ))),
        #[cfg(not(feature = "weapp"))]
        Platform::Weapp => Err(AdapterError::UnsupportedPlatform(resolved)),

        #[cfg(feature = "alipay")]
        Platform::Alipay => Ok(Box::new(crate::adapter::AlipayAdapter::new(
            config, host, engines,
        ))),
        #[cfg(not(feature = "alipay"))]
        Platform::Alipay => Err(AdapterError::UnsupportedPlatform(resolved)),

        #[cfg(feature = "swan")]
        Platform::Swan => Ok(Box::new(crate::adapter::SwanAdapter::new(
            config, host, engines,
        ))),
        #[cfg(not(feature = "swan"))]
        Platform::Swan => Err(AdapterError::UnsupportedPlatform(resolved)),

        #[cfg(feature = "harmony")]
        Platform::Harmony => Ok(Box::new(crate::adapter::HarmonyAdapter::new(
            config, host, engines,
        ))),
        #[cfg(not(feature = "harmony"))]
        Platform::Harmony => Err(AdapterError::UnsupportedPlatform(resolved)),

        #[cfg(feature = "react-native")]
        Platform::ReactNative => Ok(Box::new(crate::adapter::ReactNativeAdapter::new(
            config, host, engines,
        ))),
        #[cfg(not(feature = "react-native"))]
        Platform::ReactNative => Err(AdapterError::UnsupportedPlatform(resolved)),
    }
}
