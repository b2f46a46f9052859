pub mod port;
pub mod relay;

pub use port::{BrowserHost, Port, RelayOptions};
pub use relay::{Connection, PortId, Relay, Side, panel_tab};
