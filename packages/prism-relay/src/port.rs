use prism_protocol::TabId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One end of a long-lived message channel, as the relay sees it.
///
/// Ports are shared with the transport that owns the socket, so every method
/// takes `&self`.
pub trait Port: Send + Sync {
    /// Panels name their port after the tab they inspect; pages use any
    /// non-numeric name.
    fn name(&self) -> &str;
    /// Tab the port was opened from, when the transport knows it.
    fn sender_tab(&self) -> Option<TabId>;
    fn post_message(&self, message: &Value);
    fn disconnect(&self);
}

/// Browser-side effects the relay triggers.
pub trait BrowserHost {
    /// (Re-)inject the page agent script into a tab.
    fn inject_agent(&mut self, tab: TabId, script: &str);
    /// Switch the tab's toolbar icon and popup to the "framework detected" state.
    fn activate_popup(&mut self, tab: TabId, icons: &BTreeMap<String, String>, popup: &str);
}

/// Resources the relay points the browser at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayOptions {
    pub agent_script: String,
    pub popup: String,
    /// Icon path keyed by pixel size.
    pub icons: BTreeMap<String, String>,
}

impl Default for RelayOptions {
    fn default() -> Self {
        let icons = [16, 32, 48, 128, 192]
            .into_iter()
            .map(|size| (size.to_string(), format!("icons/icon-{}.png", size)))
            .collect();
        Self {
            agent_script: "/content-script.js".to_string(),
            popup: "popup/enabled.html".to_string(),
            icons,
        }
    }
}
