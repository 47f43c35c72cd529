//! Registry - owns every dock node and the label/window lookup tables
//!
//! Nodes refer to each other by [`NodeId`]; the registry is the single owner.
//! Tree surgery is index rewiring on `children`/`parent`/`root`, never moves
//! of node values between owners.

use std::collections::HashMap;

use crate::host::WindowId;

use super::node::{Kind, Node, NodeId};

/// Process-scoped store of dock nodes
#[derive(Debug, Clone, Default)]
pub struct Registry {
    nodes: HashMap<NodeId, Node>,
    labels: HashMap<String, NodeId>,
    windows: HashMap<WindowId, NodeId>,
    /// Windows of destroyed automatic nodes, to be dropped from the z-order
    retired_windows: Vec<WindowId>,
    next_node_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            next_node_id: 1,
            ..Default::default()
        }
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Return the node registered under `label`, creating it with `kind`
    /// defaults on first use. An existing node is returned as is, whatever
    /// its kind.
    pub fn find_or_create(&mut self, label: &str, kind: Kind) -> NodeId {
        if let Some(&id) = self.labels.get(label) {
            return id;
        }
        self.insert(Node::new(self.peek_id(), label, kind))
    }

    /// Whether `find_or_create` would allocate for this label
    pub fn contains_label(&self, label: &str) -> bool {
        self.labels.contains_key(label)
    }

    pub fn find(&self, label: &str) -> Option<NodeId> {
        self.labels.get(label).copied()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn kind(&self, id: NodeId) -> Option<Kind> {
        self.get(id).map(Node::kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Create an engine-owned node named after `root` (`<root>__<n>__`)
    pub fn create_automatic(&mut self, root: NodeId, kind: Kind) -> Option<NodeId> {
        let root_node = self.nodes.get_mut(&root)?;
        let dock_flags = root_node.dock_flags;
        let super::node::NodeData::Root(data) = &mut root_node.data else {
            return None;
        };
        // Skip numbers whose label a caller already took
        let label = loop {
            data.auto_label_counter += 1;
            let candidate = format!("{}__{}__", root_node.label, data.auto_label_counter);
            if !self.labels.contains_key(&candidate) {
                break candidate;
            }
        };

        let mut node = Node::new(self.peek_id(), label, kind);
        node.automatic = true;
        node.dock_flags = dock_flags;
        node.root = Some(root);
        Some(self.insert(node))
    }

    /// Associate a host window with a node
    pub fn bind_window(&mut self, id: NodeId, window: WindowId) {
        if let Some(node) = self.nodes.get_mut(&id) {
            if let Some(old) = node.window.replace(window) {
                if old != window {
                    self.windows.remove(&old);
                }
            }
            self.windows.insert(window, id);
        }
    }

    pub fn node_for_window(&self, window: WindowId) -> Option<NodeId> {
        self.windows.get(&window).copied()
    }

    /// Remove a node from both lookup tables and release it.
    ///
    /// Callers detach the node from its parent first; children are not
    /// touched.
    pub fn destroy(&mut self, id: NodeId) -> Option<Node> {
        let node = self.nodes.remove(&id)?;
        self.labels.remove(&node.label);
        if let Some(window) = node.window {
            if self.windows.get(&window) == Some(&id) {
                self.windows.remove(&window);
            }
            if node.automatic {
                self.retired_windows.push(window);
            }
        }
        tracing::debug!(target: "registry", label = %node.label, "destroyed node");
        Some(node)
    }

    /// Destroy every node. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if !self.nodes.is_empty() {
            tracing::debug!(target: "registry", count = self.nodes.len(), "shutdown");
        }
        self.nodes.clear();
        self.labels.clear();
        self.windows.clear();
        self.retired_windows.clear();
    }

    /// Host windows that lost their node since the last call
    pub fn take_retired_windows(&mut self) -> Vec<WindowId> {
        std::mem::take(&mut self.retired_windows)
    }

    fn peek_id(&self) -> NodeId {
        NodeId(self.next_node_id.max(1))
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.next_node_id = id.0 + 1;
        tracing::debug!(target: "registry", label = %node.label, kind = ?node.kind(), "created node");
        self.labels.insert(node.label.clone(), id);
        self.nodes.insert(id, node);
        id
    }
}

// ============================================================================
// Debug Invariant Validation
// ============================================================================

impl Registry {
    /// Validate the tree invariants in debug builds.
    ///
    /// Checks that:
    /// - labels map 1:1 to nodes
    /// - every child points back at its parent, and appears in one parent only
    /// - splits have at least two children and `children + 1` sorted sliders
    ///   running from 0 to 1
    /// - roots have at most one child
    /// - a container's current tab is one of its children (none iff empty)
    /// - a leaf is docked exactly when some container holds it
    ///
    /// Panics in debug builds if any invariant is violated.
    #[cfg(debug_assertions)]
    pub fn assert_invariants(&self) {
        assert_eq!(
            self.labels.len(),
            self.nodes.len(),
            "label table out of sync with nodes"
        );
        for (label, id) in &self.labels {
            let node = self
                .nodes
                .get(id)
                .unwrap_or_else(|| panic!("label {label:?} maps to missing node {id:?}"));
            assert_eq!(&node.label, label, "label table points at the wrong node");
        }

        let mut seen_children: HashMap<NodeId, NodeId> = HashMap::new();
        for (id, node) in &self.nodes {
            for child in &node.children {
                let child_node = self.nodes.get(child).unwrap_or_else(|| {
                    panic!("{:?} lists missing child {:?}", node.label, child)
                });
                assert_eq!(
                    child_node.parent,
                    Some(*id),
                    "{:?} is a child of {:?} but points at {:?}",
                    child_node.label,
                    node.label,
                    child_node.parent
                );
                if let Some(other) = seen_children.insert(*child, *id) {
                    panic!(
                        "{:?} appears under both {:?} and {:?}",
                        child_node.label, other, id
                    );
                }
            }

            match node.kind() {
                Kind::Root => assert!(
                    node.children.len() <= 1,
                    "root {:?} has {} children",
                    node.label,
                    node.children.len()
                ),
                Kind::HSplit | Kind::VSplit => {
                    assert!(
                        node.children.len() >= 2,
                        "split {:?} has {} children",
                        node.label,
                        node.children.len()
                    );
                    let sliders = node.sliders();
                    assert_eq!(
                        sliders.len(),
                        node.children.len() + 1,
                        "split {:?} slider count",
                        node.label
                    );
                    assert_eq!(sliders[0], 0.0, "split {:?} first slider", node.label);
                    assert_eq!(
                        sliders[sliders.len() - 1],
                        1.0,
                        "split {:?} last slider",
                        node.label
                    );
                    assert!(
                        sliders.windows(2).all(|w| w[0] <= w[1]),
                        "split {:?} sliders not sorted: {:?}",
                        node.label,
                        sliders
                    );
                }
                Kind::Container => match node.current_tab() {
                    Some(tab) => assert!(
                        node.children.contains(&tab),
                        "container {:?} current tab is not a child",
                        node.label
                    ),
                    None => assert!(
                        node.children.is_empty(),
                        "container {:?} has tabs but no current tab",
                        node.label
                    ),
                },
                Kind::Leaf => {}
            }
        }

        for (id, node) in &self.nodes {
            if node.kind() != Kind::Leaf {
                continue;
            }
            let held = seen_children
                .get(id)
                .and_then(|p| self.nodes.get(p))
                .is_some_and(|p| p.is_container());
            assert_eq!(
                node.status == super::node::Status::Docked,
                held,
                "leaf {:?} status {:?} disagrees with container membership",
                node.label,
                node.status
            );
        }
    }

    /// No-op in release builds
    #[cfg(not(debug_assertions))]
    #[inline]
    pub fn assert_invariants(&self) {}
}
