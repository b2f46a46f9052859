use crate::highlight::Highlighter;
use crate::host::Host;
use crate::picker::Picker;
use crate::renderer::Renderer;
use prism_protocol::{Command, Id, PathSegment, UpdateType, events};
use serde::Serialize;
use serde_json::{Value, json};
use std::rc::Rc;

/// Pushes a named event towards the inspector panel.
pub type EmitterFn = Rc<dyn Fn(&str, Value)>;

/// What the panel's commands act on. Missing nodes turn commands into no-ops:
/// the tree keeps changing while commands are in flight.
pub struct Adapter<R: Renderer + 'static, H: Host<R::Dom> + 'static> {
    emit: EmitterFn,
    renderer: Rc<R>,
    host: Rc<H>,
    highlighter: Rc<Highlighter<R, H>>,
    picker: Picker<R, H>,
}

impl<R: Renderer + 'static, H: Host<R::Dom> + 'static> Adapter<R, H> {
    pub fn new(emit: EmitterFn, renderer: Rc<R>, host: Rc<H>) -> Self {
        let highlighter = Rc::new(Highlighter::new(renderer.clone(), host.clone()));

        let picker = {
            let on_hover = {
                let highlighter = highlighter.clone();
                let emit = emit.clone();
                move |id: Id| {
                    highlighter.highlight(id);
                    emit(events::SELECT_NODE, json!(id));
                }
            };
            let on_cancel = {
                let highlighter = highlighter.clone();
                let emit = emit.clone();
                move || {
                    emit(events::STOP_PICKER, Value::Null);
                    highlighter.destroy();
                }
            };
            Picker::new(host.clone(), renderer.clone(), on_hover, on_cancel)
        };

        Self {
            emit,
            renderer,
            host,
            highlighter,
            picker,
        }
    }

    pub fn inspect(&self, id: Id) {
        if !self.renderer.has(id) {
            return;
        }
        if let Some(data) = self.renderer.inspect(id) {
            match serde_json::to_value(&data) {
                Ok(payload) => (self.emit)(events::INSPECT_RESULT, payload),
                Err(err) => tracing::warn!("Failed to encode inspect result for {}: {}", id, err),
            }
        }
    }

    pub fn log(&self, id: Id, children: &[Id]) {
        if self.renderer.has(id) {
            self.renderer.log(id, children);
        }
    }

    /// Reserved command; nothing selects through here yet.
    pub fn select(&self, _id: Id) {}

    pub fn highlight(&self, id: Option<Id>) {
        match id {
            Some(id) => self.highlighter.highlight(id),
            None => self.highlighter.destroy(),
        }
    }

    pub fn start_pick_element(&self) {
        self.picker.start();
    }

    pub fn stop_pick_element(&self) {
        self.picker.stop();
    }

    pub fn update(&self, id: Id, kind: UpdateType, path: &[PathSegment], value: Value) {
        self.renderer.update(id, kind, path, value);
    }

    /// Puts `value` on the clipboard as indented JSON. Panel commands always carry JSON,
    /// so only page-side callers passing their own `Serialize` types (maps with
    /// non-string keys, say) can hit the failure branch, which is logged and dropped.
    pub fn copy<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(text) => self.host.write_text(&text),
            Err(err) => tracing::warn!("Could not copy value: {}", err),
        }
    }

    pub fn dispatch(&self, command: Command) {
        tracing::debug!("Dispatching `{}`", command.name());
        match command {
            Command::Inspect(id) => self.inspect(id),
            Command::Log(req) => self.log(req.id, &req.children),
            Command::Select(id) => self.select(id),
            Command::Highlight(id) => self.highlight(id),
            Command::StartPickElement => self.start_pick_element(),
            Command::StopPickElement => self.stop_pick_element(),
            Command::Update(req) => self.update(req.id, req.kind, &req.path, req.value),
            Command::Copy(value) => self.copy(&value),
        }
    }

    pub fn renderer(&self) -> &Rc<R> {
        &self.renderer
    }

    pub fn highlighted(&self) -> Option<Id> {
        self.highlighter.active()
    }

    pub fn is_picking(&self) -> bool {
        self.picker.is_picking()
    }
}
