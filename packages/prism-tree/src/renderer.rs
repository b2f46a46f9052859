use crate::filter::Filters;
use crate::vdom::{ComponentKind, DomNode, NodeKey, NodeKind, Tree, Value, id_of, key_of};
use prism_adapter::{
    EmitterFn, FilterState, Renderer, clean_context, clean_props, jsonify, jsonify_map, set_in,
    traverse,
};
use prism_protocol::{Id, InspectData, PathSegment, SerializedVNode, UpdateType, events};
use serde_json::json;
use std::cell::{Cell, Ref, RefCell, RefMut};

/// A live [`Tree`] exposed to the adapter.
///
/// The application mutates the tree through [`TreeRenderer::tree_mut`] and then
/// reports what changed with `on_commit` / `on_unmount`.
pub struct TreeRenderer {
    tree: RefCell<Tree>,
    filters: RefCell<Filters>,
    emit: EmitterFn,
    flushed: Cell<bool>,
}

impl TreeRenderer {
    pub fn new(emit: EmitterFn) -> Self {
        Self {
            tree: RefCell::new(Tree::new()),
            filters: RefCell::new(Filters::default()),
            emit,
            flushed: Cell::new(false),
        }
    }

    pub fn tree(&self) -> Ref<'_, Tree> {
        self.tree.borrow()
    }

    pub fn tree_mut(&self) -> RefMut<'_, Tree> {
        self.tree.borrow_mut()
    }

    fn placeholder<'a>(tree: &'a Tree) -> impl Fn(&Value) -> Option<SerializedVNode> + 'a {
        move |value: &Value| {
            let key = value.as_node()?;
            Some(SerializedVNode::new(tree.display_name(*key)))
        }
    }

    fn emit_operation(&self, root: NodeKey) {
        let tree = self.tree.borrow();
        if !tree.contains(root) {
            return;
        }
        let filters = self.filters.borrow();
        let parent = nearest_visible_ancestor(&tree, &filters, root);

        let mut nodes = Vec::new();
        collect_visible(&tree, &filters, root, parent, &mut nodes);
        drop(filters);
        drop(tree);

        tracing::debug!("Commit of {} emits {} nodes", id_of(root), nodes.len());
        (self.emit)(
            events::OPERATION,
            json!({ "rootId": id_of(root), "nodes": nodes }),
        );
    }
}

fn nearest_visible_ancestor(tree: &Tree, filters: &Filters, key: NodeKey) -> Option<NodeKey> {
    let mut current = tree.get(key)?.parent;
    while let Some(k) = current {
        let node = tree.get(k)?;
        if !filters.hides(node) {
            return Some(k);
        }
        current = node.parent;
    }
    None
}

// Visible nodes of the subtree at `key`, depth first. Hidden nodes are skipped
// and their children attach to the closest visible ancestor.
fn collect_visible(
    tree: &Tree,
    filters: &Filters,
    key: NodeKey,
    parent: Option<NodeKey>,
    out: &mut Vec<serde_json::Value>,
) {
    let mut child_parent = parent;
    traverse(
        &key,
        |k| tree.actual_children(*k),
        |k| {
            if *k != key {
                collect_visible(tree, filters, *k, child_parent, out);
                return;
            }
            let Some(node) = tree.get(key) else {
                return;
            };
            if !filters.hides(node) {
                out.push(json!({
                    "id": id_of(key),
                    "parentId": parent.map(id_of),
                    "name": node.display_name(),
                    "type": node.element_kind(),
                }));
                child_parent = Some(key);
            }
        },
    );
}

impl Renderer for TreeRenderer {
    type VNode = NodeKey;
    type Dom = DomNode;

    fn get_vnode_by_id(&self, id: Id) -> Option<NodeKey> {
        let key = key_of(id);
        self.tree.borrow().contains(key).then_some(key)
    }

    fn get_display_name(&self, vnode: &NodeKey) -> String {
        self.tree.borrow().display_name(*vnode)
    }

    fn find_dom_for_vnode(&self, id: Id) -> Option<Vec<Option<DomNode>>> {
        let tree = self.tree.borrow();
        let key = key_of(id);
        if !tree.contains(key) {
            return None;
        }
        Some(tree.host_nodes(key))
    }

    fn find_vnode_id_for_dom(&self, node: &DomNode) -> Option<Id> {
        let tree = self.tree.borrow();
        let filters = self.filters.borrow();
        let key = tree.node_for_dom(node.id)?;
        if !filters.hides(tree.get(key)?) {
            return Some(id_of(key));
        }
        nearest_visible_ancestor(&tree, &filters, key).map(id_of)
    }

    fn apply_filters(&self, filters: &FilterState) {
        *self.filters.borrow_mut() = Filters::compile(filters);
        if self.flushed.get() {
            let roots = self.tree.borrow().roots().to_vec();
            for root in roots {
                self.emit_operation(root);
            }
        }
    }

    fn has(&self, id: Id) -> bool {
        self.tree.borrow().contains(key_of(id))
    }

    fn log(&self, id: Id, children: &[Id]) {
        let tree = self.tree.borrow();
        let key = key_of(id);
        let Some(node) = tree.get(key) else {
            return;
        };

        let mut names = Vec::new();
        traverse(
            &key,
            |k| tree.actual_children(*k),
            |k| {
                if *k != key {
                    names.push(tree.display_name(*k));
                }
            },
        );
        let props = jsonify(&node.props, &Self::placeholder(&tree));
        let requested: Vec<String> = children
            .iter()
            .filter_map(|child| tree.get(key_of(*child)).map(|n| n.display_name()))
            .collect();

        tracing::info!(
            "<{}> props={} children={:?} expanded={:?}",
            node.display_name(),
            props,
            names,
            requested
        );
    }

    fn inspect(&self, id: Id) -> Option<InspectData> {
        let tree = self.tree.borrow();
        let node = tree.get(key_of(id))?;
        let get_vnode = Self::placeholder(&tree);

        let is_class = matches!(
            node.kind,
            NodeKind::Component {
                kind: ComponentKind::Class,
                ..
            }
        );

        let props = clean_props(&node.props).map(|p| jsonify_map(&p, &get_vnode));
        let context = node
            .context
            .as_ref()
            .and_then(|c| c.as_object())
            .and_then(clean_context)
            .map(|c| jsonify_map(&c, &get_vnode));
        let hooks = node
            .hooks
            .as_ref()
            .filter(|h| h.is_truthy() && !matches!(h, Value::Array(items) if items.is_empty()))
            .map(|h| jsonify(h, &get_vnode));
        let state = node
            .state
            .as_ref()
            .filter(|_| is_class)
            .and_then(|s| s.as_object())
            .filter(|s| !s.is_empty())
            .map(|s| jsonify_map(s, &get_vnode));

        Some(InspectData {
            id,
            name: node.display_name(),
            kind: node.element_kind(),
            context,
            can_edit_hooks: hooks.is_some(),
            hooks,
            can_edit_props: !matches!(node.kind, NodeKind::Text { .. }),
            props,
            can_edit_state: state.is_some(),
            state,
        })
    }

    fn on_commit(&self, vnode: &NodeKey) {
        if !self.flushed.get() {
            tracing::trace!("Commit of {} held until first flush", id_of(*vnode));
            return;
        }
        self.emit_operation(*vnode);
    }

    fn on_unmount(&self, vnode: &NodeKey) {
        let removed = self.tree.borrow_mut().remove(*vnode);
        if removed.is_empty() || !self.flushed.get() {
            return;
        }
        let ids: Vec<Id> = removed.into_iter().map(id_of).collect();
        (self.emit)(events::UNMOUNT, json!({ "ids": ids }));
    }

    /// Sends the whole current tree. Runs again on every reconnect.
    fn flush_initial(&self) {
        self.flushed.set(true);
        let roots = self.tree.borrow().roots().to_vec();
        tracing::debug!("Flushing {} roots", roots.len());
        for root in roots {
            self.emit_operation(root);
        }
    }

    fn force_update(&self, id: Id) {
        let key = key_of(id);
        {
            let mut tree = self.tree.borrow_mut();
            let Some(node) = tree.get_mut(key) else {
                return;
            };
            node.render_count += 1;
        }
        self.on_commit(&key);
    }

    fn update(&self, id: Id, kind: UpdateType, path: &[PathSegment], value: serde_json::Value) {
        {
            let mut tree = self.tree.borrow_mut();
            let Some(node) = tree.get_mut(key_of(id)) else {
                return;
            };
            let target = match kind {
                UpdateType::Props => Some(&mut node.props),
                UpdateType::State => node.state.as_mut(),
                UpdateType::Hooks => node.hooks.as_mut(),
                UpdateType::Context => node.context.as_mut(),
            };
            let Some(target) = target else {
                tracing::debug!("Node {} has no {:?} to update", id, kind);
                return;
            };
            set_in(target, path, value.into());
        }
        self.force_update(id);
    }
}
