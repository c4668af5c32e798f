use std::rc::Rc;

use serde_json::json;

use omnichart::engine::NullEngineFactory;
use omnichart::platform::StaticProbe;
use omnichart::surface::{HeadlessHost, Surface, SurfaceKind};
use omnichart::{Adapter, AdapterContext, ChartConfig, get_adapter};

fn ready_adapter() -> (Box<dyn Adapter>, Rc<NullEngineFactory>) {
    let host = HeadlessHost::immediate()
        .with_surface(Surface::new("main", SurfaceKind::Dom, 640.0, 480.0));
    let engines = Rc::new(NullEngineFactory::new());
    let ctx = AdapterContext::new(
        Rc::new(StaticProbe::browser()),
        Rc::new(host),
        engines.clone(),
    );
    let mut adapter = get_adapter(ChartConfig::new("main"), &ctx).expect("adapter");
    adapter.init().expect("init");
    (adapter, engines)
}

#[test]
fn option_updates_reach_the_engine_in_issue_order() {
    let (mut adapter, engines) = ready_adapter();

    let a = json!({"series": [{"type": "line", "data": [1]}]});
    let b = json!({"series": [{"type": "line", "data": [1, 2]}]});
    let c = json!({"series": [{"type": "line", "data": [1, 2, 3]}]});
    adapter.set_option(&a, false).expect("a");
    adapter.set_option(&b, false).expect("b");
    adapter.set_option(&c, false).expect("c");

    let engine = engines.last_engine().expect("engine");
    let applied: Vec<_> = engine
        .borrow()
        .applied_options
        .iter()
        .map(|(option, _)| option.clone())
        .collect();
    assert_eq!(applied, vec![a, b, c]);
}

#[test]
fn merge_semantics_are_the_default() {
    let (mut adapter, engines) = ready_adapter();
    adapter.set_option(&json!({"x": 1}), false).expect("merge");
    adapter
        .set_option(&json!({"x": 2}), true)
        .expect("full replace");

    let engine = engines.last_engine().expect("engine");
    let flags: Vec<bool> = engine
        .borrow()
        .applied_options
        .iter()
        .map(|(_, not_merge)| *not_merge)
        .collect();
    assert_eq!(flags, vec![false, true]);
}

#[test]
fn option_before_init_is_a_silent_noop() {
    let host = HeadlessHost::immediate();
    let engines = Rc::new(NullEngineFactory::new());
    let ctx = AdapterContext::new(
        Rc::new(StaticProbe::browser()),
        Rc::new(host),
        engines.clone(),
    );
    let mut adapter = get_adapter(ChartConfig::new("main"), &ctx).expect("adapter");

    adapter
        .set_option(&json!({"series": []}), false)
        .expect("pre-init option must not fail");
    assert_eq!(engines.created_count(), 0);
}

#[test]
fn malformed_option_errors_propagate_to_the_caller() {
    let (mut adapter, engines) = ready_adapter();
    engines
        .last_engine()
        .expect("engine")
        .borrow_mut()
        .fail_set_option = true;

    let err = adapter
        .set_option(&json!({"series": "not-an-array"}), false)
        .expect_err("engine rejection must surface");
    assert!(err.to_string().contains("chart engine failure"));
}
