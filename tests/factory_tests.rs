use std::rc::Rc;

use omnichart::engine::NullEngineFactory;
use omnichart::platform::{HostMarker, StaticProbe};
use omnichart::surface::{HeadlessHost, Surface, SurfaceKind};
use omnichart::{Adapter, AdapterContext, AdapterError, ChartConfig, Platform, get_adapter};

fn context(probe: StaticProbe) -> AdapterContext {
    let host = HeadlessHost::immediate()
        .with_surface(Surface::new("main", SurfaceKind::Dom, 800.0, 600.0));
    AdapterContext::new(
        Rc::new(probe),
        Rc::new(host),
        Rc::new(NullEngineFactory::new()),
    )
}

#[test]
fn explicit_platform_override_wins_over_detection() {
    let ctx = context(StaticProbe::browser().with_marker(HostMarker::WxApi));
    let config = ChartConfig::new("main").with_platform(Platform::H5);
    let adapter = get_adapter(config, &ctx).expect("adapter");
    assert_eq!(adapter.platform(), Platform::H5);
}

#[test]
fn auto_detection_selects_the_host_platform() {
    let ctx = context(StaticProbe::browser().with_marker(HostMarker::MyApi));
    let adapter = get_adapter(ChartConfig::new("main"), &ctx).expect("adapter");
    assert_eq!(adapter.platform(), Platform::Alipay);
}

#[test]
fn missing_canvas_id_is_a_configuration_error() {
    let ctx = context(StaticProbe::browser());
    let err = get_adapter(ChartConfig::new("  "), &ctx).err().expect("must fail");
    assert!(matches!(err, AdapterError::MissingCanvasId));
}

#[test]
fn each_call_constructs_an_independent_adapter() {
    let ctx = context(StaticProbe::browser());
    let mut first = get_adapter(ChartConfig::new("main"), &ctx).expect("first");
    let second = get_adapter(ChartConfig::new("main"), &ctx).expect("second");

    first.init().expect("init first");
    assert!(first.instance().is_some());
    // The sibling adapter shares nothing with the first one.
    assert!(second.instance().is_none());
}

#[test]
fn every_compiled_platform_tag_resolves_to_an_adapter() {
    for platform in [
        Platform::H5,
        Platform::Weapp,
        Platform::Alipay,
        Platform::Swan,
        Platform::Harmony,
        Platform::ReactNative,
    ] {
        let ctx = context(StaticProbe::browser());
        let config = ChartConfig::new("main").with_platform(platform);
        let adapter = get_adapter(config, &ctx).expect("adapter for platform");
        assert_eq!(adapter.platform(), platform);
    }
}
