//! Contract the adapter layer binds to on the underlying chart engine.
//!
//! The engine (ECharts or an equivalent) is a black-box collaborator: the
//! adapter never inspects option objects, it only forwards them.

mod null_engine;

pub use null_engine::{NullEngine, NullEngineFactory};

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{RendererKind, Theme};
use crate::error::AdapterResult;
use crate::surface::{Surface, SurfaceSize};

/// Live engine instance handle.
///
/// Exclusively owned by the adapter that created it; the registry only ever
/// holds a `Weak` to the same allocation.
pub type EngineHandle = Rc<RefCell<dyn ChartEngine>>;

/// Identifier for one bound event handler, scoped to its engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(pub u64);

/// Callback bound to an engine event; receives the event payload.
pub type EventHandler = Box<dyn FnMut(&Value)>;

/// Image export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

/// Options for exporting the current render to a data URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub format: ImageFormat,
    pub pixel_ratio: f64,
    pub background: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ImageFormat::Png,
            pixel_ratio: 1.0,
            background: None,
        }
    }
}

/// Construction parameters forwarded to the engine at `init` time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineInitOptions {
    pub renderer: RendererKind,
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
}

/// Constructs engine instances bound to an acquired surface.
///
/// Injected at the composition root; tests supply [`NullEngineFactory`].
/// Construction is infallible: a bound surface always yields an instance;
/// malformed options fail later, in `set_option`.
pub trait EngineFactory {
    fn init(
        &self,
        surface: &Surface,
        theme: Option<&Theme>,
        opts: &EngineInitOptions,
    ) -> EngineHandle;
}

/// Capability surface of one live engine instance.
pub trait ChartEngine {
    /// Applies a chart option. `not_merge = false` keeps the engine's merge
    /// semantics; `true` requests full replacement.
    fn set_option(&mut self, option: &Value, not_merge: bool) -> AdapterResult<()>;

    /// Re-measures against `size`, or re-reads the bound surface when `None`
    /// (the bulk-resize path has no adapter context to compute dimensions).
    fn resize(&mut self, size: Option<SurfaceSize>) -> AdapterResult<()>;

    fn on(&mut self, event: &str, handler: EventHandler) -> HandlerId;

    /// Unbinds one handler, or every handler for `event` when `id` is `None`.
    fn off(&mut self, event: &str, id: Option<HandlerId>);

    fn dispatch_action(&mut self, action: &Value) -> AdapterResult<()>;

    fn show_loading(&mut self, opts: Option<&Value>);

    fn hide_loading(&mut self);

    /// Exports the current render; `None` when the platform binding cannot
    /// produce an off-screen image.
    fn get_data_url(&self, opts: &ExportOptions) -> Option<String>;

    /// Clears drawn content without tearing down the surface binding.
    fn clear(&mut self);

    fn dispose(&mut self) -> AdapterResult<()>;

    /// `true` once `dispose` has run.
    fn is_disposed(&self) -> bool;
}
