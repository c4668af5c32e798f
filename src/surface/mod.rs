//! Native drawing surfaces and the host capability used to acquire them.

mod hosts;

pub use hosts::HeadlessHost;

use serde::{Deserialize, Serialize};

use crate::config::RendererKind;

/// What kind of native drawing target a surface is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SurfaceKind {
    /// DOM element in a browser document.
    Dom,
    /// Mini-program native canvas node resolved via selector query.
    NodeCanvas,
    /// Off-screen context behind an embedded WebView bridge.
    OffscreenWebView,
}

/// Logical (CSS-pixel) extent of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}

impl SurfaceSize {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A native drawing target an adapter has bound to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub canvas_id: String,
    pub kind: SurfaceKind,
    /// Extent reported by the host at acquisition time, in CSS pixels.
    pub width: f64,
    pub height: f64,
    /// Host-reported ratio; `0.0` means "not reported, ask the host".
    pub device_pixel_ratio: f64,
}

impl Surface {
    #[must_use]
    pub fn new(canvas_id: impl Into<String>, kind: SurfaceKind, width: f64, height: f64) -> Self {
        Self {
            canvas_id: canvas_id.into(),
            kind,
            width,
            height,
            device_pixel_ratio: 0.0,
        }
    }

    #[must_use]
    pub fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    #[must_use]
    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }
}

/// Platform-native element descriptor the UI layer mounts.
///
/// Serializable so bindings can ship it across a bridge or template layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SurfaceElement {
    /// `<canvas>`/`<div>` target in a browser document.
    DomCanvas {
        element_id: String,
        renderer: RendererKind,
    },
    /// Native canvas component in a mini-program template.
    NativeCanvas {
        canvas_id: String,
        /// Component type attribute, e.g. `"2d"`.
        canvas_type: String,
    },
    /// WebView hosting the engine behind a message bridge.
    WebViewBridge { bridge_id: String },
}

/// Continuation receiving the outcome of an asynchronous surface query.
pub type SurfaceCallback = Box<dyn FnOnce(Option<Surface>)>;

/// Host-environment capability adapters acquire surfaces through.
///
/// Browser-style hosts resolve synchronously via [`CanvasHost::find_surface`];
/// mini-program hosts resolve through a selector query whose callback may
/// fire after an arbitrary number of event-loop turns, or never (node
/// removed before the query resolves).
pub trait CanvasHost {
    /// Platform-reported device pixel ratio.
    fn device_pixel_ratio(&self) -> f64;

    /// Extent of the hosting viewport, used to resolve percentage dimensions.
    fn viewport_size(&self) -> SurfaceSize;

    /// Synchronous lookup. Hosts without a synchronous node tree return `None`.
    fn find_surface(&self, canvas_id: &str) -> Option<Surface>;

    /// Callback-based selector query. The callback receives `None` when no
    /// node matches `canvas_id` at resolution time.
    fn query_surface(&self, canvas_id: &str, callback: SurfaceCallback);
}
