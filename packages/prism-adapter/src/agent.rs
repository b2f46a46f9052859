use crate::adapter::{Adapter, EmitterFn};
use crate::host::Host;
use crate::renderer::Renderer;
use prism_protocol::{Command, Message, names};
use serde_json::Value;
use std::cell::Cell;
use std::rc::Rc;

/// Where the page hands finished messages to its port.
pub type Sink = Rc<dyn Fn(Message)>;

/// Outbound side of the page port. Closed until the relay reports that the
/// panel is on the other end; anything emitted while closed is dropped.
pub struct Outbound {
    sink: Sink,
    open: Cell<bool>,
}

impl Outbound {
    pub fn new(sink: Sink) -> Rc<Self> {
        Rc::new(Self {
            sink,
            open: Cell::new(false),
        })
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn send(&self, name: &str, payload: Value) {
        if !self.open.get() {
            tracing::trace!("Dropping `{}`, no panel connected", name);
            return;
        }
        (self.sink)(Message::new(name, payload));
    }

    pub fn emitter(self: &Rc<Self>) -> EmitterFn {
        let outbound = self.clone();
        Rc::new(move |name: &str, payload: Value| outbound.send(name, payload))
    }
}

/// The page end of a connection pair.
pub struct Agent<R: Renderer + 'static, H: Host<R::Dom> + 'static> {
    outbound: Rc<Outbound>,
    adapter: Adapter<R, H>,
}

impl<R: Renderer + 'static, H: Host<R::Dom> + 'static> Agent<R, H> {
    pub fn new(outbound: Rc<Outbound>, renderer: Rc<R>, host: Rc<H>) -> Self {
        let adapter = Adapter::new(outbound.emitter(), renderer, host);
        Self { outbound, adapter }
    }

    pub fn adapter(&self) -> &Adapter<R, H> {
        &self.adapter
    }

    pub fn receive(&self, message: &Message) {
        if message.name == names::INITIALIZED {
            tracing::info!("Panel connected, flushing initial tree");
            self.outbound.open.set(true);
            self.adapter.renderer().flush_initial();
            return;
        }

        match Command::decode(message) {
            Ok(command) => self.adapter.dispatch(command),
            Err(err) => tracing::warn!("Ignoring message: {}", err),
        }
    }

    /// The relay dropped our port. The transport that owns the port calls this from
    /// its close handler; the agent never learns of the disconnect otherwise.
    pub fn disconnected(&self) {
        tracing::info!("Panel disconnected");
        self.outbound.open.set(false);
        self.adapter.stop_pick_element();
        self.adapter.highlight(None);
    }
}
