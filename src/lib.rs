//! omnichart: multi-platform chart adapter layer.
//!
//! This crate normalizes heterogeneous canvas back-ends (DOM canvas,
//! mini-program native canvas nodes, embedded WebView bridges) behind one
//! chart lifecycle contract so a single configuration object can drive a
//! black-box chart engine on every platform.

pub mod adapter;
pub mod config;
pub mod engine;
pub mod error;
pub mod factory;
pub mod lifecycle;
pub mod platform;
pub mod registry;
pub mod surface;
pub mod telemetry;

pub use adapter::{Adapter, InitStatus, PlatformCaps};
pub use config::{ChartConfig, ChartId, Dimension, RendererKind, Theme};
pub use error::{AdapterError, AdapterResult};
pub use factory::{AdapterContext, get_adapter};
pub use lifecycle::{ChartLifecycle, LifecyclePhase};
pub use platform::Platform;
pub use registry::ChartRegistry;
