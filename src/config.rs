//! Chart configuration: the single input object driving adapter construction.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::platform::Platform;

/// Process-unique identifier for a mounted chart.
///
/// Doubles as the registry key and, on mini-program platforms, should match
/// the canvas node id so selector queries resolve unambiguously.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChartId(String);

static NEXT_CHART_ID: AtomicU64 = AtomicU64::new(1);

impl ChartId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh process-unique id.
    #[must_use]
    pub fn generate() -> Self {
        let seq = NEXT_CHART_ID.fetch_add(1, Ordering::Relaxed);
        Self(format!("chart-{seq}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One side of a requested chart size, absolute or relative to the host viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Pixels(f64),
    Percent(f64),
}

impl Dimension {
    pub const FULL: Self = Self::Percent(100.0);

    /// Resolves the dimension against the hosting container extent, in CSS pixels.
    #[must_use]
    pub fn resolve(self, container: f64) -> f64 {
        match self {
            Self::Pixels(px) => px,
            Self::Percent(pct) => container * pct / 100.0,
        }
    }
}

impl FromStr for Dimension {
    type Err = String;

    /// Accepts `"320"`, `"320px"`, and `"100%"`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if let Some(pct) = trimmed.strip_suffix('%') {
            let value: f64 = pct
                .trim()
                .parse()
                .map_err(|_| format!("invalid percentage dimension `{raw}`"))?;
            return Ok(Self::Percent(value));
        }
        let numeric = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
        let value: f64 = numeric
            .parse()
            .map_err(|_| format!("invalid pixel dimension `{raw}`"))?;
        Ok(Self::Pixels(value))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(px) => write!(f, "{px}px"),
            Self::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

/// Renderer requested from the underlying engine.
///
/// `Svg` is only honored on platforms that support it; everywhere else the
/// adapter degrades to `Canvas` instead of failing (see `PlatformCaps`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    #[default]
    Canvas,
    Svg,
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Canvas => f.write_str("canvas"),
            Self::Svg => f.write_str("svg"),
        }
    }
}

/// Built-in theme name or an inline style object forwarded to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Theme {
    Named(String),
    Inline(Value),
}

/// Input to adapter construction.
///
/// Plain data: callbacks (`on_ready`, event handlers) attach to the
/// lifecycle instead so configurations stay cloneable and serializable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Explicit platform override; auto-detected when absent.
    pub platform: Option<Platform>,
    /// Identifier of the target drawing surface. Must be unique among
    /// concurrently mounted charts on mini-program platforms.
    pub canvas_id: String,
    pub width: Dimension,
    pub height: Dimension,
    pub theme: Option<Theme>,
    pub renderer: RendererKind,
    /// Overrides the platform-reported device pixel ratio.
    pub device_pixel_ratio: Option<f64>,
    /// Chart option object, opaque to the adapter layer.
    pub option: Option<Value>,
}

impl ChartConfig {
    #[must_use]
    pub fn new(canvas_id: impl Into<String>) -> Self {
        Self {
            platform: None,
            canvas_id: canvas_id.into(),
            width: Dimension::FULL,
            height: Dimension::FULL,
            theme: None,
            renderer: RendererKind::Canvas,
            device_pixel_ratio: None,
            option: None,
        }
    }

    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: Dimension, height: Dimension) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    #[must_use]
    pub fn with_renderer(mut self, renderer: RendererKind) -> Self {
        self.renderer = renderer;
        self
    }

    #[must_use]
    pub fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = Some(ratio);
        self
    }

    #[must_use]
    pub fn with_option(mut self, option: Value) -> Self {
        self.option = Some(option);
        self
    }
}
