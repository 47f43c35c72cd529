//! Model types for the docking tree
//!
//! The tree lives in a [`Registry`]; [`DockModel`] pairs it with the style
//! metrics every layout and mutation step reads.

pub mod geometry;
pub mod node;
pub mod registry;

pub use geometry::{point_in_convex_poly, Rect, Vec2};
pub use node::{
    ContainerData, Edge, Kind, LeafData, Node, NodeData, NodeId, RootData, SplitAxis, SplitData,
    Status,
};
pub use registry::Registry;

use crate::config::DockStyle;

/// Where a dragged node lands relative to a target container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropZone {
    /// Split the target along one of its sides
    Edge(Edge),
    /// Take over the target (or join its tabs)
    Full,
    /// Join the target's tabs before the tab at this index
    Tab(usize),
}

/// The docking tree plus the style it is laid out with
#[derive(Debug, Clone, Default)]
pub struct DockModel {
    pub registry: Registry,
    pub style: DockStyle,
}

impl DockModel {
    pub fn new(style: DockStyle) -> Self {
        Self {
            registry: Registry::new(),
            style,
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.registry.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.registry.get_mut(id)
    }

    /// Look a node up by label
    pub fn find(&self, label: &str) -> Option<&Node> {
        self.registry.find(label).and_then(|id| self.registry.get(id))
    }

    /// Labels of a node's children, in stack order
    pub fn child_labels(&self, id: NodeId) -> Vec<String> {
        self.registry
            .children(id)
            .iter()
            .filter_map(|&c| self.registry.get(c))
            .map(|n| n.label.clone())
            .collect()
    }
}
