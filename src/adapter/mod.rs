//! The capability contract every platform implementation satisfies.
//!
//! Each platform adapter is an explicit tagged variant of the same
//! interface, with no optional capability probing at call sites. Capability
//! divergence (svg rendering, image export, asynchronous surface
//! acquisition) is declared up front in [`PlatformCaps`].

pub(crate) mod core;

mod h5;
pub use h5::H5Adapter;

#[cfg(feature = "weapp")]
mod weapp;
#[cfg(feature = "weapp")]
pub use weapp::WeappAdapter;

#[cfg(feature = "alipay")]
mod alipay;
#[cfg(feature = "alipay")]
pub use alipay::AlipayAdapter;

#[cfg(feature = "swan")]
mod swan;
#[cfg(feature = "swan")]
pub use swan::SwanAdapter;

#[cfg(feature = "harmony")]
mod harmony;
#[cfg(feature = "harmony")]
pub use harmony::HarmonyAdapter;

#[cfg(feature = "react-native")]
mod react_native;
#[cfg(feature = "react-native")]
pub use react_native::ReactNativeAdapter;

use serde_json::Value;

use crate::config::ChartConfig;
use crate::engine::{EngineHandle, EventHandler, ExportOptions, HandlerId};
use crate::error::AdapterResult;
use crate::platform::Platform;
use crate::surface::{Surface, SurfaceElement};

/// Static capability table of one platform adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformCaps {
    /// Whether the engine may be constructed with the `svg` renderer.
    pub supports_svg: bool,
    /// Whether `get_data_url` can produce an image.
    pub supports_export: bool,
    /// Whether surface acquisition resolves through a deferred callback.
    pub async_surface: bool,
}

/// Outcome of an `init` attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStatus {
    /// The engine instance is constructed and bound.
    Ready,
    /// Surface acquisition is in flight; poll `instance()` on the next
    /// mount/update cycle.
    Pending,
    /// The surface does not exist (yet), or the adapter is disposed.
    /// Transient: callers retry via their own mount lifecycle.
    Unavailable,
}

/// Platform-specific implementation of the chart lifecycle contract.
pub trait Adapter {
    fn platform(&self) -> Platform;

    fn config(&self) -> &ChartConfig;

    fn caps(&self) -> PlatformCaps;

    /// Acquires the native surface and constructs the engine instance.
    ///
    /// Never fails for a transient "not yet mounted" condition; errors are
    /// reserved for unrecoverable misconfiguration. Re-initializing while an
    /// engine is live disposes the prior instance first. After `dispose`
    /// this is a no-op returning [`InitStatus::Unavailable`].
    fn init(&mut self) -> AdapterResult<InitStatus>;

    /// The live engine handle, once init has completed successfully.
    fn instance(&self) -> Option<EngineHandle>;

    /// The surface bound by the last successful init, until dispose.
    fn surface(&self) -> Option<Surface>;

    /// Forwards a chart option; silent no-op before init completes.
    fn set_option(&mut self, option: &Value, not_merge: bool) -> AdapterResult<()>;

    /// Recomputes surface pixel dimensions and informs the engine. Safe to
    /// call repeatedly; cheap enough for a debounced resize handler.
    fn resize(&mut self) -> AdapterResult<()>;

    /// Binds an event handler. Returns `None` before init completes.
    fn on(&mut self, event: &str, handler: EventHandler) -> Option<HandlerId>;

    /// Unbinds one handler, or all handlers for `event` when `id` is `None`.
    fn off(&mut self, event: &str, id: Option<HandlerId>);

    fn dispatch_action(&mut self, action: &Value) -> AdapterResult<()>;

    fn show_loading(&mut self, opts: Option<&Value>);

    fn hide_loading(&mut self);

    /// Exports the current render; `None` on platforms without off-screen
    /// export capability.
    fn get_data_url(&self, opts: &ExportOptions) -> Option<String>;

    fn clear(&mut self);

    /// Unbinds every recorded handler, destroys the engine instance, and
    /// releases the surface binding. Idempotent; every other method is a
    /// safe no-op afterwards.
    fn dispose(&mut self) -> AdapterResult<()>;

    /// The platform-native drawing-surface descriptor to mount.
    fn render(&self) -> SurfaceElement;
}
