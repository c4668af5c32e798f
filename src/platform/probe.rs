use std::collections::BTreeSet;

/// Host globals whose presence identifies the running platform.
///
/// Mirrors the `typeof wx !== 'undefined'`-style markers real runtimes
/// expose: a mini-program host object with a system-info query surface, a
/// WebView bridge object, or a plain browser window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HostMarker {
    /// WeChat host API object (`wx`).
    WxApi,
    /// Alipay host API object (`my`).
    MyApi,
    /// Baidu host API object (`swan`).
    SwanApi,
    /// HarmonyOS UI kit capability surface.
    HarmonyUiKit,
    /// React Native WebView message bridge.
    RnBridge,
    /// Browser `window`/`document` pair.
    BrowserWindow,
}

/// Injectable view of the host environment.
///
/// Production wiring supplies a probe backed by real global lookups; tests
/// and headless embeddings substitute a [`StaticProbe`] snapshot so
/// detection never touches process-global state.
pub trait EnvironmentProbe {
    /// Reports whether the given host marker is present. Must be pure: the
    /// same snapshot answers the same way on every call.
    fn has_marker(&self, marker: HostMarker) -> bool;
}

/// Fixed snapshot of host markers.
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    markers: BTreeSet<HostMarker>,
}

impl StaticProbe {
    /// An empty environment: no browser, no mini-program host. This is what
    /// server-side rendering looks like to the detector.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A plain browser environment.
    #[must_use]
    pub fn browser() -> Self {
        Self::default().with_marker(HostMarker::BrowserWindow)
    }

    #[must_use]
    pub fn with_marker(mut self, marker: HostMarker) -> Self {
        self.markers.insert(marker);
        self
    }
}

impl EnvironmentProbe for StaticProbe {
    fn has_marker(&self, marker: HostMarker) -> bool {
        self.markers.contains(&marker)
    }
}
