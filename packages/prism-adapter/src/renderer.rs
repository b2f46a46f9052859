use crate::host::Measure;
use prism_protocol::{Id, InspectData, PathSegment, UpdateType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Framework-specific access to the live tree.
///
/// Implementations use interior mutability: the adapter, picker and highlighter
/// all hold the same renderer and call into it from event handlers.
pub trait Renderer {
    /// Handle to a live tree node.
    type VNode;
    /// Handle to a DOM node the tree rendered into.
    type Dom: Clone + Measure + 'static;

    fn get_vnode_by_id(&self, id: Id) -> Option<Self::VNode>;
    fn get_display_name(&self, vnode: &Self::VNode) -> String;
    /// DOM nodes rendered by `id`, in document order. Slots may be empty.
    fn find_dom_for_vnode(&self, id: Id) -> Option<Vec<Option<Self::Dom>>>;
    fn find_vnode_id_for_dom(&self, node: &Self::Dom) -> Option<Id>;
    fn apply_filters(&self, filters: &FilterState);
    fn has(&self, id: Id) -> bool;
    fn log(&self, id: Id, children: &[Id]);
    fn inspect(&self, id: Id) -> Option<InspectData>;
    fn on_commit(&self, vnode: &Self::VNode);
    fn on_unmount(&self, vnode: &Self::VNode);
    fn flush_initial(&self);
    fn force_update(&self, id: Id);
    fn update(&self, id: Id, kind: UpdateType, path: &[PathSegment], value: Value);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    Dom,
    Fragment,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexFilter {
    pub value: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

/// Which nodes the panel wants hidden from the tree view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub regex: Vec<RegexFilter>,
    #[serde(rename = "type", default)]
    pub types: HashSet<TypeFilter>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_state_from_panel_json() {
        let state: FilterState = serde_json::from_str(
            r#"{"regex":[{"value":"^Provider"}],"type":["dom","text"]}"#,
        )
        .unwrap();
        assert!(state.regex[0].enabled);
        assert!(state.types.contains(&TypeFilter::Dom));
        assert!(!state.types.contains(&TypeFilter::Fragment));
    }
}
