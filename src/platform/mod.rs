//! Platform tags, the environment probe, and auto-detection.

mod detect;
mod probe;

pub use detect::detect;
pub use probe::{EnvironmentProbe, HostMarker, StaticProbe};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Symbolic identifier selecting which adapter to instantiate.
///
/// Every tag exists regardless of enabled cargo features; the factory
/// reports `UnsupportedPlatform` for tags whose adapter was compiled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    /// Browser / web runtime.
    H5,
    /// WeChat mini-program.
    Weapp,
    /// Alipay mini-program.
    Alipay,
    /// Baidu/Swan mini-program.
    Swan,
    /// HarmonyOS runtime.
    Harmony,
    /// React Native via an embedded WebView bridge.
    ReactNative,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::H5 => "h5",
            Self::Weapp => "weapp",
            Self::Alipay => "alipay",
            Self::Swan => "swan",
            Self::Harmony => "harmony",
            Self::ReactNative => "react-native",
        };
        f.write_str(tag)
    }
}
