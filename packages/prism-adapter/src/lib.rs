pub mod adapter;
pub mod agent;
#[cfg(feature = "system-clipboard")]
pub mod clipboard;
pub mod highlight;
pub mod host;
pub mod picker;
pub mod renderer;
pub mod utils;
pub mod value;

pub use adapter::{Adapter, EmitterFn};
pub use agent::{Agent, Outbound, Sink};
pub use highlight::Highlighter;
pub use host::{
    Clipboard, DomEvent, EventKind, EventTarget, Host, Listener, ListenerHandle, Measure, Overlay,
    Rect,
};
pub use picker::Picker;
pub use renderer::{FilterState, RegexFilter, Renderer, TypeFilter};
pub use utils::{clean_context, clean_props, jsonify, jsonify_map, set_in, traverse};
pub use value::{Function, LiveValue};
