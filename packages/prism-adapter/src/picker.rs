use crate::host::{DomEvent, EventKind, EventTarget, Listener, ListenerHandle};
use crate::renderer::Renderer;
use prism_protocol::Id;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Element picking: maps the pointer position to a tree node until the user
/// clicks or presses Escape.
pub struct Picker<R: Renderer + 'static, T: EventTarget<R::Dom> + 'static> {
    inner: Rc<PickerInner<R, T>>,
}

struct PickerInner<R: Renderer, T: EventTarget<R::Dom>> {
    target: Rc<T>,
    renderer: Rc<R>,
    on_hover: Box<dyn Fn(Id)>,
    on_cancel: Box<dyn Fn()>,
    // Non-empty exactly while picking.
    listeners: RefCell<Vec<ListenerHandle>>,
}

impl<R: Renderer + 'static, T: EventTarget<R::Dom> + 'static> Picker<R, T> {
    pub fn new(
        target: Rc<T>,
        renderer: Rc<R>,
        on_hover: impl Fn(Id) + 'static,
        on_cancel: impl Fn() + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(PickerInner {
                target,
                renderer,
                on_hover: Box::new(on_hover),
                on_cancel: Box::new(on_cancel),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn is_picking(&self) -> bool {
        !self.inner.listeners.borrow().is_empty()
    }

    pub fn start(&self) {
        if self.is_picking() {
            return;
        }
        tracing::debug!("Picker started");

        let handles: Vec<ListenerHandle> = [
            EventKind::PointerMove,
            EventKind::PointerDown,
            EventKind::Click,
            EventKind::KeyDown,
        ]
        .into_iter()
        .map(|kind| {
            let weak = Rc::downgrade(&self.inner);
            self.inner
                .target
                .add_event_listener(kind, listener(weak, kind))
        })
        .collect();

        *self.inner.listeners.borrow_mut() = handles;
    }

    pub fn stop(&self) {
        self.inner.stop();
    }
}

fn listener<R, T>(weak: Weak<PickerInner<R, T>>, kind: EventKind) -> Listener<R::Dom>
where
    R: Renderer + 'static,
    T: EventTarget<R::Dom> + 'static,
{
    Rc::new(move |event: &mut DomEvent<R::Dom>| {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        match kind {
            EventKind::PointerMove => inner.on_pointer_move(event),
            EventKind::PointerDown => inner.on_pointer_down(event),
            EventKind::Click => inner.on_click(event),
            EventKind::KeyDown => inner.on_key_down(event),
        }
    })
}

impl<R: Renderer, T: EventTarget<R::Dom>> PickerInner<R, T> {
    fn stop(&self) {
        let handles = std::mem::take(&mut *self.listeners.borrow_mut());
        if handles.is_empty() {
            return;
        }
        for handle in handles {
            self.target.remove_event_listener(handle);
        }
        tracing::debug!("Picker stopped");
    }

    fn on_pointer_move(&self, event: &mut DomEvent<R::Dom>) {
        let Some(target) = event.target.as_ref() else {
            return;
        };
        if let Some(id) = self.renderer.find_vnode_id_for_dom(target) {
            tracing::trace!("Picker hovering node {}", id);
            (self.on_hover)(id);
        }
    }

    // Swallowed so the page does not start a drag or focus change under the picker.
    fn on_pointer_down(&self, event: &mut DomEvent<R::Dom>) {
        self.consume(event);
    }

    fn on_click(&self, event: &mut DomEvent<R::Dom>) {
        self.consume(event);
        self.finish();
    }

    fn on_key_down(&self, event: &mut DomEvent<R::Dom>) {
        if event.key.as_deref() == Some("Escape") {
            self.consume(event);
            self.finish();
        }
    }

    fn consume(&self, event: &mut DomEvent<R::Dom>) {
        event.prevent_default();
        event.stop_propagation();
    }

    fn finish(&self) {
        self.stop();
        (self.on_cancel)();
    }
}
