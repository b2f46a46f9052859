use crate::host::{Measure, Overlay, Rect};
use crate::renderer::Renderer;
use prism_protocol::Id;
use std::cell::Cell;
use std::rc::Rc;

/// Draws the overlay for at most one node at a time.
pub struct Highlighter<R: Renderer, O: Overlay> {
    renderer: Rc<R>,
    overlay: Rc<O>,
    active: Cell<Option<Id>>,
}

impl<R: Renderer, O: Overlay> Highlighter<R, O> {
    pub fn new(renderer: Rc<R>, overlay: Rc<O>) -> Self {
        Self {
            renderer,
            overlay,
            active: Cell::new(None),
        }
    }

    pub fn active(&self) -> Option<Id> {
        self.active.get()
    }

    pub fn highlight(&self, id: Id) {
        let Some(rect) = self.measure(id) else {
            // Unmounted, or rendered nothing we can measure.
            tracing::trace!("Nothing to highlight for node {}", id);
            self.destroy();
            return;
        };

        self.active.set(Some(id));
        let name = self
            .renderer
            .get_vnode_by_id(id)
            .map(|vnode| self.renderer.get_display_name(&vnode))
            .unwrap_or_default();
        self.overlay.show(rect, &label(&name, &rect));
    }

    pub fn destroy(&self) {
        self.active.set(None);
        self.overlay.hide();
    }

    // Covers everything between the first and last DOM node the vnode rendered.
    fn measure(&self, id: Id) -> Option<Rect> {
        let nodes: Vec<R::Dom> = self
            .renderer
            .find_dom_for_vnode(id)?
            .into_iter()
            .flatten()
            .collect();
        let first = nodes.first()?.bounding_rect()?;
        let last = nodes
            .last()
            .and_then(|node| node.bounding_rect())
            .unwrap_or(first);
        Some(first.union(&last))
    }
}

fn label(name: &str, rect: &Rect) -> String {
    format!(
        "{} | {} × {}",
        name,
        rect.width.round(),
        rect.height.round()
    )
}
