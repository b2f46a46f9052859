use prism_adapter::{LiveValue, Measure, Rect};
use prism_protocol::{ElementKind, Id};
use rustc_hash::FxHashMap;
use slotmap::{Key, KeyData, SlotMap, new_key_type};
use smallvec::SmallVec;

new_key_type! {
    pub struct NodeKey;
}

/// Wire id for a node. Stable for as long as the node stays mounted.
pub fn id_of(key: NodeKey) -> Id {
    key.data().as_ffi()
}

pub fn key_of(id: Id) -> NodeKey {
    NodeKey::from(KeyData::from_ffi(id))
}

pub type Value = LiveValue<NodeKey>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Class,
    Function,
    ForwardRef,
    Memo,
    Suspense,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element { tag: String },
    Text { text: String },
    Fragment,
    Component { name: String, kind: ComponentKind },
}

pub struct VirtualNode {
    pub kind: NodeKind,
    pub props: Value,
    pub state: Option<Value>,
    pub hooks: Option<Value>,
    pub context: Option<Value>,
    pub children: SmallVec<[Option<NodeKey>; 4]>,
    pub parent: Option<NodeKey>,
    pub dom: Option<u64>,
    pub render_count: u64,
}

impl VirtualNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            props: Value::object(),
            state: None,
            hooks: None,
            context: None,
            children: SmallVec::new(),
            parent: None,
            dom: None,
            render_count: 0,
        }
    }

    pub fn element(tag: &str) -> Self {
        Self::new(NodeKind::Element {
            tag: tag.to_string(),
        })
    }

    pub fn text(text: &str) -> Self {
        let mut node = Self::new(NodeKind::Text {
            text: text.to_string(),
        });
        node.props = Value::String(text.to_string());
        node
    }

    pub fn fragment() -> Self {
        Self::new(NodeKind::Fragment)
    }

    pub fn component(name: &str, kind: ComponentKind) -> Self {
        Self::new(NodeKind::Component {
            name: name.to_string(),
            kind,
        })
    }

    pub fn with_props(mut self, props: Value) -> Self {
        self.props = props;
        self
    }

    pub fn with_state(mut self, state: Value) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_hooks(mut self, hooks: Value) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    pub fn element_kind(&self) -> ElementKind {
        match &self.kind {
            NodeKind::Element { .. } | NodeKind::Text { .. } => ElementKind::HtmlElement,
            NodeKind::Fragment => ElementKind::FunctionComponent,
            NodeKind::Component { kind, .. } => match kind {
                ComponentKind::Class => ElementKind::ClassComponent,
                ComponentKind::Function => ElementKind::FunctionComponent,
                ComponentKind::ForwardRef => ElementKind::ForwardRef,
                ComponentKind::Memo => ElementKind::Memo,
                ComponentKind::Suspense => ElementKind::Suspense,
            },
        }
    }

    pub fn display_name(&self) -> String {
        match &self.kind {
            NodeKind::Element { tag } => tag.clone(),
            NodeKind::Text { .. } => "#text".to_string(),
            NodeKind::Fragment => "Fragment".to_string(),
            NodeKind::Component { name, .. } => name.clone(),
        }
    }

    pub fn is_component(&self) -> bool {
        matches!(self.kind, NodeKind::Component { .. })
    }

    fn renders_dom(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. } | NodeKind::Text { .. })
    }
}

/// A DOM node as handed to the adapter: its handle plus the layout it had
/// when it was looked up.
#[derive(Debug, Clone, PartialEq)]
pub struct DomNode {
    pub id: u64,
    pub rect: Option<Rect>,
}

impl Measure for DomNode {
    fn bounding_rect(&self) -> Option<Rect> {
        self.rect
    }
}

#[derive(Default)]
pub struct Tree {
    nodes: SlotMap<NodeKey, VirtualNode>,
    roots: Vec<NodeKey>,
    dom_index: FxHashMap<u64, NodeKey>,
    layout: FxHashMap<u64, Rect>,
    next_dom: u64,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts `node` as the last child of `parent`, or as a new root.
    pub fn insert(&mut self, mut node: VirtualNode, parent: Option<NodeKey>) -> NodeKey {
        if node.renders_dom() {
            self.next_dom += 1;
            node.dom = Some(self.next_dom);
        }
        node.parent = parent.filter(|p| self.nodes.contains_key(*p));
        let dom = node.dom;
        let attach_to = node.parent;
        let key = self.nodes.insert(node);

        if let Some(dom) = dom {
            self.dom_index.insert(dom, key);
        }
        match attach_to.and_then(|p| self.nodes.get_mut(p)) {
            Some(parent) => parent.children.push(Some(key)),
            None => self.roots.push(key),
        }
        key
    }

    /// Adds an empty child slot, as left behind by conditional rendering.
    pub fn push_empty_slot(&mut self, parent: NodeKey) {
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(None);
        }
    }

    /// Unmounts `key` and its whole subtree. Returns the removed keys, parent first.
    pub fn remove(&mut self, key: NodeKey) -> Vec<NodeKey> {
        let removed = self.subtree(key);
        if removed.is_empty() {
            return removed;
        }

        let parent = self.nodes.get(key).and_then(|n| n.parent);
        match parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(parent) => {
                for slot in parent.children.iter_mut() {
                    if *slot == Some(key) {
                        *slot = None;
                    }
                }
            }
            None => self.roots.retain(|r| *r != key),
        }

        for k in &removed {
            if let Some(node) = self.nodes.remove(*k) {
                if let Some(dom) = node.dom {
                    self.dom_index.remove(&dom);
                    self.layout.remove(&dom);
                }
            }
        }
        removed
    }

    pub fn get(&self, key: NodeKey) -> Option<&VirtualNode> {
        self.nodes.get(key)
    }

    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut VirtualNode> {
        self.nodes.get_mut(key)
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn actual_children(&self, key: NodeKey) -> Vec<Option<NodeKey>> {
        self.nodes
            .get(key)
            .map(|n| n.children.to_vec())
            .unwrap_or_default()
    }

    pub fn display_name(&self, key: NodeKey) -> String {
        self.nodes
            .get(key)
            .map(|n| n.display_name())
            .unwrap_or_default()
    }

    /// Every key below and including `key`, depth first.
    pub fn subtree(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack = vec![key];
        while let Some(k) = stack.pop() {
            let Some(node) = self.nodes.get(k) else {
                continue;
            };
            out.push(k);
            stack.extend(node.children.iter().rev().flatten().copied());
        }
        out
    }

    pub fn set_layout(&mut self, key: NodeKey, rect: Rect) {
        if let Some(dom) = self.nodes.get(key).and_then(|n| n.dom) {
            self.layout.insert(dom, rect);
        }
    }

    pub fn dom_node(&self, key: NodeKey) -> Option<DomNode> {
        let id = self.nodes.get(key)?.dom?;
        Some(DomNode {
            id,
            rect: self.layout.get(&id).copied(),
        })
    }

    pub fn node_for_dom(&self, dom: u64) -> Option<NodeKey> {
        self.dom_index.get(&dom).copied()
    }

    /// Top-level DOM nodes rendered by `key`: itself if it is a host node,
    /// otherwise the nearest host nodes below it.
    pub fn host_nodes(&self, key: NodeKey) -> Vec<Option<DomNode>> {
        let Some(node) = self.nodes.get(key) else {
            return Vec::new();
        };
        if node.renders_dom() {
            return vec![self.dom_node(key)];
        }
        node.children
            .iter()
            .flatten()
            .flat_map(|child| self.host_nodes(*child))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip_through_ffi() {
        let mut tree = Tree::new();
        let key = tree.insert(VirtualNode::element("div"), None);
        assert_eq!(key_of(id_of(key)), key);
    }

    #[test]
    fn test_remove_leaves_empty_slot_and_frees_subtree() {
        let mut tree = Tree::new();
        let root = tree.insert(VirtualNode::component("App", ComponentKind::Function), None);
        let list = tree.insert(VirtualNode::element("ul"), Some(root));
        let item = tree.insert(VirtualNode::element("li"), Some(list));

        let removed = tree.remove(list);
        assert_eq!(removed, vec![list, item]);
        assert_eq!(tree.actual_children(root), vec![None]);
        assert!(!tree.contains(item));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_host_nodes_skip_components() {
        let mut tree = Tree::new();
        let root = tree.insert(VirtualNode::component("App", ComponentKind::Function), None);
        let frag = tree.insert(VirtualNode::fragment(), Some(root));
        let a = tree.insert(VirtualNode::element("a"), Some(frag));
        tree.push_empty_slot(frag);
        let b = tree.insert(VirtualNode::text("hi"), Some(frag));

        let ids: Vec<u64> = tree.host_nodes(root).into_iter().flatten().map(|d| d.id).collect();
        assert_eq!(
            ids,
            vec![
                tree.get(a).unwrap().dom.unwrap(),
                tree.get(b).unwrap().dom.unwrap()
            ]
        );
    }
}
