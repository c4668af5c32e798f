use std::rc::Rc;

use serde_json::json;

use omnichart::adapter::InitStatus;
use omnichart::engine::{ChartEngine, ExportOptions, NullEngineFactory};
use omnichart::platform::StaticProbe;
use omnichart::surface::{HeadlessHost, Surface, SurfaceKind};
use omnichart::{Adapter, AdapterContext, ChartConfig, Platform, get_adapter};

fn ready_adapter(platform: Platform) -> (Box<dyn Adapter>, Rc<NullEngineFactory>) {
    let kind = if platform == Platform::H5 {
        SurfaceKind::Dom
    } else {
        SurfaceKind::NodeCanvas
    };
    let host = HeadlessHost::immediate().with_surface(Surface::new("main", kind, 400.0, 300.0));
    let engines = Rc::new(NullEngineFactory::new());
    let ctx = AdapterContext::new(
        Rc::new(StaticProbe::browser()),
        Rc::new(host),
        engines.clone(),
    );
    let config = ChartConfig::new("main").with_platform(platform);
    let mut adapter = get_adapter(config, &ctx).expect("adapter");
    assert_eq!(adapter.init().expect("init"), InitStatus::Ready);
    (adapter, engines)
}

#[test]
fn dispose_is_idempotent_across_every_platform() {
    for platform in [
        Platform::H5,
        Platform::Weapp,
        Platform::Alipay,
        Platform::Swan,
        Platform::Harmony,
        Platform::ReactNative,
    ] {
        let (mut adapter, _engines) = ready_adapter(platform);
        assert!(adapter.instance().is_some());

        adapter.dispose().expect("first dispose");
        assert!(adapter.instance().is_none());
        adapter.dispose().expect("second dispose");
        assert!(adapter.instance().is_none());
    }
}

#[test]
fn every_capability_is_a_safe_noop_after_dispose() {
    let (mut adapter, engines) = ready_adapter(Platform::H5);
    adapter.dispose().expect("dispose");

    adapter
        .set_option(&json!({"series": []}), false)
        .expect("set_option after dispose");
    adapter.resize().expect("resize after dispose");
    assert!(adapter.on("click", Box::new(|_| {})).is_none());
    adapter.off("click", None);
    adapter
        .dispatch_action(&json!({"type": "highlight"}))
        .expect("dispatch after dispose");
    adapter.show_loading(None);
    adapter.hide_loading();
    assert!(adapter.get_data_url(&ExportOptions::default()).is_none());
    adapter.clear();

    // Nothing above reached the engine.
    let engine = engines.last_engine().expect("engine");
    assert!(engine.borrow().applied_options.is_empty());
    assert_eq!(engine.borrow().resize_calls, 0);
}

#[test]
fn init_after_dispose_does_not_reacquire_resources() {
    let (mut adapter, engines) = ready_adapter(Platform::Weapp);
    adapter.dispose().expect("dispose");

    assert_eq!(adapter.init().expect("init"), InitStatus::Unavailable);
    assert!(adapter.instance().is_none());
    assert_eq!(engines.created_count(), 1);
}

#[test]
fn dispose_unbinds_all_previously_bound_events() {
    let (mut adapter, engines) = ready_adapter(Platform::H5);
    adapter.on("click", Box::new(|_| {}));
    adapter.on("legendselectchanged", Box::new(|_| {}));

    let engine = engines.last_engine().expect("engine");
    assert_eq!(engine.borrow().bound_handler_count(), 2);

    adapter.dispose().expect("dispose");
    assert_eq!(engine.borrow().bound_handler_count(), 0);
    assert!(engine.borrow().is_disposed());
}

#[test]
fn off_without_id_unbinds_every_handler_for_the_event() {
    let (mut adapter, engines) = ready_adapter(Platform::H5);
    let first = adapter.on("click", Box::new(|_| {})).expect("first handler");
    adapter.on("click", Box::new(|_| {}));
    adapter.on("datazoom", Box::new(|_| {}));

    adapter.off("click", Some(first));
    let engine = engines.last_engine().expect("engine");
    assert_eq!(engine.borrow().bound_handler_count(), 2);

    adapter.off("click", None);
    assert_eq!(engine.borrow().bound_handler_count(), 1);
    assert_eq!(engine.borrow_mut().emit("datazoom", &json!({})), 1);
}

#[test]
fn retried_init_supersedes_the_outstanding_query() {
    let host = Rc::new(
        HeadlessHost::deferred()
            .with_surface(Surface::new("main", SurfaceKind::NodeCanvas, 320.0, 240.0)),
    );
    let engines = Rc::new(NullEngineFactory::new());
    let ctx = AdapterContext::new(
        Rc::new(StaticProbe::browser()),
        host.clone(),
        engines.clone(),
    );
    let config = ChartConfig::new("main").with_platform(Platform::Weapp);
    let mut adapter = get_adapter(config, &ctx).expect("adapter");

    assert_eq!(adapter.init().expect("first init"), InitStatus::Pending);
    assert_eq!(adapter.init().expect("second init"), InitStatus::Pending);
    assert_eq!(host.pending_queries(), 2);

    // Only the attempt still current when its query resolves may construct
    // an engine; the superseded one must not leave an orphan behind.
    assert_eq!(host.flush(), 2);
    assert_eq!(engines.created_count(), 1);
    assert!(adapter.instance().is_some());
}

#[test]
fn reinit_with_a_live_engine_disposes_the_prior_instance_first() {
    let (mut adapter, engines) = ready_adapter(Platform::H5);
    let first = engines.last_engine().expect("first engine");

    assert_eq!(adapter.init().expect("re-init"), InitStatus::Ready);
    assert_eq!(engines.created_count(), 2);
    assert!(first.borrow().is_disposed());

    let second = engines.last_engine().expect("second engine");
    assert!(!second.borrow().is_disposed());
}
