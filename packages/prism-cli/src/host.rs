use prism_protocol::TabId;
use prism_relay::BrowserHost;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Toolbar and injection state of one tab.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TabState {
    pub injections: u32,
    pub script: Option<String>,
    pub popup: Option<String>,
    pub icons: BTreeMap<String, String>,
}

/// Browser stand-in for the relay server. There is no real browser to poke, so
/// every effect is recorded per tab and exposed over HTTP.
#[derive(Debug, Default)]
pub struct ServerHost {
    tabs: FxHashMap<TabId, TabState>,
}

impl ServerHost {
    pub fn tab(&self, tab: TabId) -> Option<&TabState> {
        self.tabs.get(&tab)
    }
}

impl BrowserHost for ServerHost {
    fn inject_agent(&mut self, tab: TabId, script: &str) {
        let state = self.tabs.entry(tab).or_default();
        state.injections += 1;
        state.script = Some(script.to_string());
        tracing::info!("Injecting {} into tab {} (#{})", script, tab, state.injections);
    }

    fn activate_popup(&mut self, tab: TabId, icons: &BTreeMap<String, String>, popup: &str) {
        let state = self.tabs.entry(tab).or_default();
        state.popup = Some(popup.to_string());
        state.icons = icons.clone();
        tracing::info!("Enabled popup {} for tab {}", popup, tab);
    }
}
