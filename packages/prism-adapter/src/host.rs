//! The slice of the page environment the adapter needs: document-wide event
//! listeners, an overlay to draw highlights on, and the clipboard.

use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        let top = self.top.min(other.top);
        let left = self.left.min(other.left);
        Rect {
            top,
            left,
            width: self.right().max(other.right()) - left,
            height: self.bottom().max(other.bottom()) - top,
        }
    }
}

/// Anything that can report where it sits on screen.
pub trait Measure {
    fn bounding_rect(&self) -> Option<Rect>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerMove,
    PointerDown,
    Click,
    KeyDown,
}

/// A DOM event as delivered to a listener. `D` is the renderer's DOM handle.
#[derive(Debug, Clone)]
pub struct DomEvent<D> {
    pub kind: EventKind,
    pub target: Option<D>,
    pub key: Option<String>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl<D> DomEvent<D> {
    pub fn new(kind: EventKind, target: Option<D>) -> Self {
        Self {
            kind,
            target,
            key: None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn key_down(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::new(EventKind::KeyDown, None)
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

pub type Listener<D> = Rc<dyn Fn(&mut DomEvent<D>)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub u64);

/// The inspected document. Listeners run in the capture phase so the page
/// never sees an event the picker consumed.
pub trait EventTarget<D> {
    fn add_event_listener(&self, kind: EventKind, listener: Listener<D>) -> ListenerHandle;
    fn remove_event_listener(&self, handle: ListenerHandle);
}

pub trait Overlay {
    fn show(&self, rect: Rect, label: &str);
    fn hide(&self);
}

pub trait Clipboard {
    fn write_text(&self, text: &str);
}

/// Everything the adapter touches outside the tree itself.
pub trait Host<D>: EventTarget<D> + Overlay + Clipboard {}

impl<D, T> Host<D> for T where T: EventTarget<D> + Overlay + Clipboard {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_covers_both() {
        let a = Rect::new(10.0, 10.0, 20.0, 5.0);
        let b = Rect::new(12.0, 0.0, 5.0, 20.0);
        assert_eq!(a.union(&b), Rect::new(10.0, 0.0, 30.0, 22.0));
    }
}
