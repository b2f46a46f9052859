use crate::port::{BrowserHost, Port, RelayOptions};
use prism_protocol::{Message, RuntimeMessage, TabId};
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::sync::Arc;

/// Relay-issued handle for a connected port. Never reused.
pub type PortId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Page,
    Panel,
}

struct Slot {
    id: PortId,
    port: Arc<dyn Port>,
}

// Present while both slots are filled and forwarding is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Wiring {
    page: PortId,
    panel: PortId,
}

#[derive(Default)]
pub struct Connection {
    page: Option<Slot>,
    panel: Option<Slot>,
    wiring: Option<Wiring>,
}

impl Connection {
    pub fn has_page(&self) -> bool {
        self.page.is_some()
    }

    pub fn has_panel(&self) -> bool {
        self.panel.is_some()
    }

    pub fn is_active(&self) -> bool {
        self.wiring.is_some()
    }

    fn slot_mut(&mut self, side: Side) -> &mut Option<Slot> {
        match side {
            Side::Page => &mut self.page,
            Side::Panel => &mut self.panel,
        }
    }

    fn holds(&self, side: Side, id: PortId) -> bool {
        let slot = match side {
            Side::Page => &self.page,
            Side::Panel => &self.panel,
        };
        slot.as_ref().is_some_and(|s| s.id == id)
    }

    fn peer(&self, id: PortId) -> Option<(Side, &Arc<dyn Port>)> {
        let wiring = self.wiring?;
        if wiring.page == id {
            self.panel.as_ref().map(|s| (Side::Panel, &s.port))
        } else if wiring.panel == id {
            self.page.as_ref().map(|s| (Side::Page, &s.port))
        } else {
            None
        }
    }

    /// Stops forwarding and drops the page end, returning its id. Running it
    /// twice is harmless.
    fn teardown(&mut self) -> Option<PortId> {
        self.wiring.take()?;
        let page = self.page.take()?;
        page.port.disconnect();
        Some(page.id)
    }

    fn shutdown(&mut self) {
        let _ = self.teardown();
        for slot in [self.page.take(), self.panel.take()].into_iter().flatten() {
            slot.port.disconnect();
        }
    }
}

/// Pairs every inspected page with the panel inspecting it and shuttles
/// messages between the two.
///
/// Synchronous and single-owner: transports serialize calls into it.
pub struct Relay<H: BrowserHost> {
    host: H,
    options: RelayOptions,
    connections: FxHashMap<TabId, Connection>,
    ports: FxHashMap<PortId, (TabId, Side)>,
    next_port: PortId,
}

/// Panels name their port with the tab id: the name must read back as exactly
/// the same integer.
pub fn panel_tab(name: &str) -> Option<TabId> {
    let tab: TabId = name.parse().ok()?;
    (tab.to_string() == name).then_some(tab)
}

impl<H: BrowserHost> Relay<H> {
    pub fn new(host: H, options: RelayOptions) -> Self {
        Self {
            host,
            options,
            connections: FxHashMap::default(),
            ports: FxHashMap::default(),
            next_port: 1,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn options(&self) -> &RelayOptions {
        &self.options
    }

    pub fn connection(&self, tab: TabId) -> Option<&Connection> {
        self.connections.get(&tab)
    }

    pub fn tabs(&self) -> impl Iterator<Item = TabId> + '_ {
        self.connections.keys().copied()
    }

    /// Registers a newly opened port. Returns `None` when the port cannot be
    /// attributed to a tab; such ports are disconnected immediately.
    pub fn connect(&mut self, port: Arc<dyn Port>) -> Option<PortId> {
        let (tab, side) = match panel_tab(port.name()) {
            Some(tab) => (tab, Side::Panel),
            None => match port.sender_tab().filter(|tab| *tab != 0) {
                Some(tab) => (tab, Side::Page),
                None => {
                    tracing::warn!("Refusing port `{}` without a sender tab", port.name());
                    port.disconnect();
                    return None;
                }
            },
        };

        let id = self.next_port;
        self.next_port += 1;
        self.ports.insert(id, (tab, side));
        tracing::debug!("Port {} `{}` connected as {:?} of tab {}", id, port.name(), side, tab);

        if side == Side::Panel {
            if let Some(dropped) = self.connections.get_mut(&tab).and_then(Connection::teardown) {
                self.ports.remove(&dropped);
            }
            self.host.inject_agent(tab, &self.options.agent_script);
        }

        let conn = self.connections.entry(tab).or_default();
        if let Some(old) = conn.slot_mut(side).replace(Slot { id, port }) {
            self.ports.remove(&old.id);
            // The replaced port stops forwarding; the pair is wired afresh below.
            if conn.wiring.is_some_and(|w| w.page == old.id || w.panel == old.id) {
                conn.wiring = None;
            }
        }

        if conn.wiring.is_none() {
            if let (Some(page), Some(panel)) = (&conn.page, &conn.panel) {
                tracing::info!("Establishing connection for tab {}", tab);
                conn.wiring = Some(Wiring {
                    page: page.id,
                    panel: panel.id,
                });
                page.port.post_message(&Message::initialized().to_value());
            }
        }
        Some(id)
    }

    /// Forwards `message` verbatim to the peer of `port`, if the pair is wired.
    pub fn message(&self, port: PortId, message: &Value) {
        let Some((tab, _)) = self.ports.get(&port) else {
            tracing::trace!("Dropping message from unknown port {}", port);
            return;
        };
        let Some(conn) = self.connections.get(tab) else {
            return;
        };
        match conn.peer(port) {
            Some((Side::Panel, peer)) => {
                tracing::debug!("-> panel {} {}", tab, message);
                peer.post_message(message);
            }
            Some((Side::Page, peer)) => {
                tracing::debug!("-> page {} {}", tab, message);
                peer.post_message(message);
            }
            None => tracing::trace!("Dropping message from unwired port {}", port),
        }
    }

    /// The transport lost `port`.
    pub fn disconnect(&mut self, port: PortId) {
        let Some((tab, side)) = self.ports.remove(&port) else {
            return;
        };
        let Some(conn) = self.connections.get_mut(&tab) else {
            return;
        };

        if conn.peer(port).is_some() {
            tracing::info!("Shutting down connection for tab {}", tab);
            conn.shutdown();
            self.ports.retain(|_, (t, _)| *t != tab);
        } else if conn.holds(side, port) {
            tracing::debug!("Port {} left tab {} before pairing", port, tab);
            *conn.slot_mut(side) = None;
        }
    }

    /// One-off runtime message, outside of any port.
    pub fn runtime_message(&mut self, message: &RuntimeMessage, sender_tab: Option<TabId>) {
        let Some(tab) = sender_tab.filter(|tab| *tab != 0) else {
            return;
        };
        if message.has_preact {
            tracing::info!("Framework detected in tab {}", tab);
            self.host
                .activate_popup(tab, &self.options.icons, &self.options.popup);
        }
    }
}
