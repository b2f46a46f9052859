mod common;

use common::{MockHost, MockRenderer, rect};
use prism_adapter::{Agent, Outbound, Sink};
use prism_protocol::Message;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

struct Page {
    agent: Agent<MockRenderer, MockHost>,
    renderer: Rc<MockRenderer>,
    sent: Rc<RefCell<Vec<Message>>>,
}

fn page() -> Page {
    let sent: Rc<RefCell<Vec<Message>>> = Rc::default();
    let sink: Sink = {
        let sent = sent.clone();
        Rc::new(move |msg: Message| sent.borrow_mut().push(msg))
    };
    let renderer = Rc::new(MockRenderer::default().with_node(1, "App", Some(rect())));
    let agent = Agent::new(
        Outbound::new(sink),
        renderer.clone(),
        Rc::new(MockHost::default()),
    );
    Page {
        agent,
        renderer,
        sent,
    }
}

#[test]
fn test_events_before_initialized_are_dropped() {
    let page = page();
    page.agent.receive(&Message::new("inspect", json!(1)));
    assert!(page.sent.borrow().is_empty());

    page.agent.receive(&Message::initialized());
    page.agent.receive(&Message::new("inspect", json!(1)));

    let sent = page.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].name, "inspect-result");
    assert_eq!(sent[0].payload["name"], json!("App"));
}

#[test]
fn test_initialized_flushes_renderer() {
    let page = page();
    page.agent.receive(&Message::initialized());
    assert_eq!(page.renderer.calls(), vec!["flush"]);
}

#[test]
fn test_bad_commands_are_ignored() {
    let page = page();
    page.agent.receive(&Message::initialized());
    page.agent.receive(&Message::new("explode", json!(null)));
    page.agent.receive(&Message::new("inspect", json!("one")));
    page.agent
        .receive(&Message::new("log", json!({ "id": 1, "children": [2] })));
    assert!(page.sent.borrow().is_empty());
    assert_eq!(page.renderer.calls(), vec!["flush", "log 1 [2]"]);
}

#[test]
fn test_disconnect_closes_outbound() {
    let page = page();
    page.agent.receive(&Message::initialized());
    page.agent.receive(&Message::new("startPickElement", json!(null)));
    assert!(page.agent.adapter().is_picking());

    page.agent.disconnected();
    assert!(!page.agent.adapter().is_picking());
    page.agent.receive(&Message::new("inspect", json!(1)));
    assert!(page.sent.borrow().is_empty());
}
