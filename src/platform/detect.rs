use super::{EnvironmentProbe, HostMarker, Platform};

/// Detection priority. Multiple markers can coexist (an embedded WebView
/// exposes both a browser window and its host bridge object), so checks run
/// in this fixed order and stop at the first match.
const DETECTION_ORDER: [(HostMarker, Platform); 6] = [
    (HostMarker::WxApi, Platform::Weapp),
    (HostMarker::MyApi, Platform::Alipay),
    (HostMarker::SwanApi, Platform::Swan),
    (HostMarker::HarmonyUiKit, Platform::Harmony),
    (HostMarker::RnBridge, Platform::ReactNative),
    (HostMarker::BrowserWindow, Platform::H5),
];

/// Inspects the host environment and returns the platform tag.
///
/// Pure query: never panics, mutates nothing, and falls back to
/// [`Platform::H5`] when no marker matches (server-side rendering, headless
/// test processes).
#[must_use]
pub fn detect(probe: &dyn EnvironmentProbe) -> Platform {
    for (marker, platform) in DETECTION_ORDER {
        if probe.has_marker(marker) {
            return platform;
        }
    }
    Platform::H5
}
