//! Arena-backed live component tree that plugs into the Prism adapter.

pub mod filter;
pub mod renderer;
pub mod vdom;

pub use filter::Filters;
pub use renderer::TreeRenderer;
pub use vdom::{ComponentKind, DomNode, NodeKey, NodeKind, Tree, Value, VirtualNode, id_of, key_of};
