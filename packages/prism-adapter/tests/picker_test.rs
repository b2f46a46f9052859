mod common;

use common::{MockHost, MockRenderer, recorder, rect};
use prism_adapter::{Adapter, DomEvent, EventKind};
use serde_json::{Value, json};
use std::rc::Rc;

fn picking_adapter() -> (Adapter<MockRenderer, MockHost>, Rc<MockHost>, common::Emitted) {
    let renderer = Rc::new(
        MockRenderer::default()
            .with_node(1, "App", Some(rect()))
            .with_node(2, "Button", Some(rect())),
    );
    let host = Rc::new(MockHost::default());
    let (emit, emitted) = recorder();
    let adapter = Adapter::new(emit, renderer, host.clone());
    (adapter, host, emitted)
}

#[test]
fn test_start_is_idempotent() {
    let (adapter, host, _) = picking_adapter();
    adapter.start_pick_element();
    let count = host.listener_count();
    assert!(count > 0);
    adapter.start_pick_element();
    assert_eq!(host.listener_count(), count);
}

#[test]
fn test_stop_when_idle_is_noop() {
    let (adapter, host, emitted) = picking_adapter();
    adapter.stop_pick_element();
    assert_eq!(host.listener_count(), 0);
    assert!(emitted.borrow().is_empty());

    adapter.start_pick_element();
    adapter.stop_pick_element();
    adapter.stop_pick_element();
    assert_eq!(host.listener_count(), 0);
    assert!(!adapter.is_picking());
}

#[test]
fn test_hover_highlights_and_selects() {
    let (adapter, host, emitted) = picking_adapter();
    adapter.start_pick_element();

    host.move_over(2);
    host.move_over(1);

    assert_eq!(adapter.highlighted(), Some(1));
    assert_eq!(
        *emitted.borrow(),
        vec![
            ("select-node".to_string(), json!(2)),
            ("select-node".to_string(), json!(1)),
        ]
    );
}

#[test]
fn test_unresolved_target_is_ignored() {
    let (adapter, host, emitted) = picking_adapter();
    adapter.start_pick_element();
    host.move_over(77);
    host.dispatch(DomEvent::new(EventKind::PointerMove, None));
    assert!(emitted.borrow().is_empty());
    assert_eq!(adapter.highlighted(), None);
}

#[test]
fn test_no_hover_events_after_stop() {
    let (adapter, host, emitted) = picking_adapter();
    adapter.start_pick_element();
    adapter.stop_pick_element();
    host.move_over(1);
    assert!(emitted.borrow().is_empty());
}

#[test]
fn test_click_ends_picking() {
    let (adapter, host, emitted) = picking_adapter();
    adapter.start_pick_element();
    host.move_over(1);

    let down = host.dispatch(DomEvent::new(EventKind::PointerDown, None));
    assert!(down.default_prevented());
    assert!(adapter.is_picking());

    let click = host.click();
    assert!(click.default_prevented());
    assert!(click.propagation_stopped());

    assert!(!adapter.is_picking());
    assert_eq!(host.listener_count(), 0);
    assert_eq!(adapter.highlighted(), None);
    assert!(host.overlay.borrow().is_none());
    assert_eq!(
        emitted.borrow().last().cloned(),
        Some(("stop-picker".to_string(), Value::Null))
    );
}

#[test]
fn test_escape_cancels_other_keys_do_not() {
    let (adapter, host, emitted) = picking_adapter();
    adapter.start_pick_element();

    let other = host.dispatch(DomEvent::key_down("a"));
    assert!(!other.default_prevented());
    assert!(adapter.is_picking());

    let escape = host.dispatch(DomEvent::key_down("Escape"));
    assert!(escape.default_prevented());
    assert!(!adapter.is_picking());
    assert_eq!(emitted.borrow().len(), 1);
    assert_eq!(emitted.borrow()[0].0, "stop-picker");
}

#[test]
fn test_page_clicks_pass_through_when_idle() {
    let (_adapter, host, _) = picking_adapter();
    let click = host.click();
    assert!(!click.default_prevented());
}
