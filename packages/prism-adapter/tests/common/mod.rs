#![allow(dead_code)]

use prism_adapter::{
    Clipboard, DomEvent, EmitterFn, EventKind, EventTarget, FilterState, Listener,
    ListenerHandle, Measure, Overlay, Rect, Renderer,
};
use prism_protocol::{ElementKind, Id, InspectData, PathSegment, UpdateType};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct MockDom {
    pub key: u32,
    pub rect: Option<Rect>,
}

impl Measure for MockDom {
    fn bounding_rect(&self) -> Option<Rect> {
        self.rect
    }
}

pub struct MockNode {
    pub name: String,
    pub dom: Vec<Option<MockDom>>,
    pub inspectable: bool,
}

#[derive(Default)]
pub struct MockRenderer {
    pub nodes: RefCell<HashMap<Id, MockNode>>,
    pub calls: RefCell<Vec<String>>,
}

impl MockRenderer {
    pub fn with_node(self, id: Id, name: &str, rect: Option<Rect>) -> Self {
        self.nodes.borrow_mut().insert(
            id,
            MockNode {
                name: name.to_string(),
                dom: vec![Some(MockDom { key: id as u32, rect })],
                inspectable: true,
            },
        );
        self
    }

    pub fn unmount(&self, id: Id) {
        self.nodes.borrow_mut().remove(&id);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Renderer for MockRenderer {
    type VNode = Id;
    type Dom = MockDom;

    fn get_vnode_by_id(&self, id: Id) -> Option<Id> {
        self.nodes.borrow().contains_key(&id).then_some(id)
    }

    fn get_display_name(&self, vnode: &Id) -> String {
        self.nodes
            .borrow()
            .get(vnode)
            .map(|n| n.name.clone())
            .unwrap_or_default()
    }

    fn find_dom_for_vnode(&self, id: Id) -> Option<Vec<Option<MockDom>>> {
        self.nodes.borrow().get(&id).map(|n| n.dom.clone())
    }

    fn find_vnode_id_for_dom(&self, node: &MockDom) -> Option<Id> {
        let id = node.key as Id;
        self.nodes.borrow().contains_key(&id).then_some(id)
    }

    fn apply_filters(&self, _filters: &FilterState) {
        self.calls.borrow_mut().push("filters".into());
    }

    fn has(&self, id: Id) -> bool {
        self.nodes.borrow().contains_key(&id)
    }

    fn log(&self, id: Id, children: &[Id]) {
        self.calls
            .borrow_mut()
            .push(format!("log {} {:?}", id, children));
    }

    fn inspect(&self, id: Id) -> Option<InspectData> {
        let nodes = self.nodes.borrow();
        let node = nodes.get(&id).filter(|n| n.inspectable)?;
        Some(InspectData {
            id,
            name: node.name.clone(),
            kind: ElementKind::FunctionComponent,
            context: None,
            can_edit_hooks: false,
            hooks: None,
            can_edit_props: true,
            props: None,
            can_edit_state: false,
            state: None,
        })
    }

    fn on_commit(&self, vnode: &Id) {
        self.calls.borrow_mut().push(format!("commit {}", vnode));
    }

    fn on_unmount(&self, vnode: &Id) {
        self.calls.borrow_mut().push(format!("unmount {}", vnode));
    }

    fn flush_initial(&self) {
        self.calls.borrow_mut().push("flush".into());
    }

    fn force_update(&self, id: Id) {
        self.calls.borrow_mut().push(format!("force {}", id));
    }

    fn update(&self, id: Id, kind: UpdateType, path: &[PathSegment], value: Value) {
        let path: Vec<String> = path.iter().map(|s| s.to_string()).collect();
        self.calls.borrow_mut().push(format!(
            "update {} {:?} {} {}",
            id,
            kind,
            path.join("."),
            value
        ));
    }
}

#[derive(Default)]
pub struct MockHost {
    next: Cell<u64>,
    listeners: RefCell<Vec<(ListenerHandle, EventKind, Listener<MockDom>)>>,
    pub overlay: RefCell<Option<(Rect, String)>>,
    pub hides: Cell<usize>,
    pub clipboard: RefCell<Vec<String>>,
}

impl MockHost {
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn dispatch(&self, mut event: DomEvent<MockDom>) -> DomEvent<MockDom> {
        // Listeners may detach themselves while running.
        let matching: Vec<Listener<MockDom>> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, kind, _)| *kind == event.kind)
            .map(|(_, _, l)| l.clone())
            .collect();
        for listener in matching {
            listener(&mut event);
        }
        event
    }

    pub fn move_over(&self, key: u32) -> DomEvent<MockDom> {
        self.dispatch(DomEvent::new(
            EventKind::PointerMove,
            Some(MockDom { key, rect: None }),
        ))
    }

    pub fn click(&self) -> DomEvent<MockDom> {
        self.dispatch(DomEvent::new(EventKind::Click, None))
    }
}

impl EventTarget<MockDom> for MockHost {
    fn add_event_listener(&self, kind: EventKind, listener: Listener<MockDom>) -> ListenerHandle {
        let handle = ListenerHandle(self.next.get());
        self.next.set(self.next.get() + 1);
        self.listeners.borrow_mut().push((handle, kind, listener));
        handle
    }

    fn remove_event_listener(&self, handle: ListenerHandle) {
        self.listeners.borrow_mut().retain(|(h, _, _)| *h != handle);
    }
}

impl Overlay for MockHost {
    fn show(&self, rect: Rect, label: &str) {
        *self.overlay.borrow_mut() = Some((rect, label.to_string()));
    }

    fn hide(&self) {
        self.hides.set(self.hides.get() + 1);
        *self.overlay.borrow_mut() = None;
    }
}

impl Clipboard for MockHost {
    fn write_text(&self, text: &str) {
        self.clipboard.borrow_mut().push(text.to_string());
    }
}

pub type Emitted = Rc<RefCell<Vec<(String, Value)>>>;

pub fn recorder() -> (EmitterFn, Emitted) {
    let emitted: Emitted = Rc::default();
    let sink = emitted.clone();
    let emit: EmitterFn = Rc::new(move |name: &str, payload: Value| {
        sink.borrow_mut().push((name.to_string(), payload));
    });
    (emit, emitted)
}

pub fn rect() -> Rect {
    Rect::new(10.0, 20.0, 100.0, 50.0)
}
