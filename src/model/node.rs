//! Dock tree nodes
//!
//! One node type covers every level of the docking tree. The kind-specific
//! state lives in [`NodeData`] so split sliders, tab geometry and leaf close
//! requests only exist on the kinds that use them.

use crate::host::{DockFlags, WindowFlags, WindowId};

use super::geometry::{Rect, Vec2};

// ============================================================================
// Identifiers and tags
// ============================================================================

/// Unique identifier for a node in the [`Registry`](super::Registry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Flat kind tag, used for filtering and debugging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Root,
    /// Children stacked top to bottom, separated by horizontal bars
    HSplit,
    /// Children laid out left to right, separated by vertical bars
    VSplit,
    Container,
    Leaf,
}

/// Status of a node within the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    /// Never shown yet
    #[default]
    None,
    Open,
    Collapsed,
    Closed,
    Dragged,
    Docked,
}

/// Side of a container a node is dropped on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    /// Axis of the split created by dropping on this edge
    pub fn split_axis(self) -> SplitAxis {
        match self {
            Edge::Top | Edge::Bottom => SplitAxis::Horizontal,
            Edge::Left | Edge::Right => SplitAxis::Vertical,
        }
    }

    /// Top and left place the new node before the target
    pub fn is_leading(self) -> bool {
        matches!(self, Edge::Top | Edge::Left)
    }
}

/// Orientation of a split node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitAxis {
    /// Horizontal bars: children stacked along y
    Horizontal,
    /// Vertical bars: children side by side along x
    Vertical,
}

impl SplitAxis {
    /// Extent of `v` along the axis children are distributed on
    pub fn along(self, v: Vec2) -> f32 {
        match self {
            SplitAxis::Horizontal => v.y,
            SplitAxis::Vertical => v.x,
        }
    }
}

// ============================================================================
// Kind-specific payloads
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct RootData {
    /// Counter for `<label>__<n>__` names of automatic descendants
    pub auto_label_counter: u32,
}

#[derive(Debug, Clone)]
pub struct SplitData {
    pub axis: SplitAxis,
    /// Child boundaries as fractions of the split's extent; `children + 1` long
    pub sliders: Vec<f32>,
}

#[derive(Debug, Clone, Default)]
pub struct ContainerData {
    /// The visible child, always one of `children` when set
    pub current_tab: Option<NodeId>,
    /// Tab bar rectangle from the last layout pass
    pub tab_bar: Rect,
    /// Left edge of every tab plus the right edge of the last one
    pub tab_xs: Vec<f32>,
    /// Distance from the container's top to the bottom of its tab bar
    pub tab_depth: f32,
}

#[derive(Debug, Clone, Default)]
pub struct LeafData {
    /// The tab's close button was pressed; reported back through the
    /// caller's open flag on the next `begin_leaf`
    pub close_requested: bool,
}

#[derive(Debug, Clone)]
pub enum NodeData {
    Root(RootData),
    Split(SplitData),
    Container(ContainerData),
    Leaf(LeafData),
}

impl NodeData {
    /// Default payload for a freshly created node of `kind`
    pub fn for_kind(kind: Kind) -> Self {
        match kind {
            Kind::Root => NodeData::Root(RootData::default()),
            Kind::HSplit => NodeData::Split(SplitData {
                axis: SplitAxis::Horizontal,
                sliders: vec![0.0, 1.0],
            }),
            Kind::VSplit => NodeData::Split(SplitData {
                axis: SplitAxis::Vertical,
                sliders: vec![0.0, 1.0],
            }),
            Kind::Container => NodeData::Container(ContainerData::default()),
            Kind::Leaf => NodeData::Leaf(LeafData::default()),
        }
    }
}

// ============================================================================
// Node
// ============================================================================

/// A node of the docking tree: root, split, container or leaf
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub data: NodeData,
    pub status: Status,

    /// Host window backing this node, if it was ever shown
    pub window: Option<WindowId>,
    pub title_bar_height: f32,
    pub content_size: Vec2,

    pub pos: Vec2,
    pub size: Vec2,
    /// Geometry restored when the node is undocked
    pub pos_saved: Vec2,
    pub size_saved: Vec2,
    pub collapsed_saved: bool,
    pub flags: WindowFlags,
    pub flags_saved: WindowFlags,
    pub dock_flags: DockFlags,

    pub collapsed: bool,
    pub hidden: bool,
    pub hoverable: bool,
    /// The caller passed an open flag (the window has a close button)
    pub closable: bool,

    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub root: Option<NodeId>,

    /// Synthesized by the engine; pruned when empty or redundant
    pub automatic: bool,
    /// Preferred relative size when inserted next to a sibling
    pub split_weight: f32,
    /// Edge of the sibling this node was inserted against
    pub split_hint: Option<Edge>,

    /// Force pos/size/collapsed onto the host window at the next begin
    pub control_this_frame: bool,
}

impl Node {
    pub fn new(id: NodeId, label: impl Into<String>, kind: Kind) -> Self {
        Self {
            id,
            label: label.into(),
            data: NodeData::for_kind(kind),
            status: Status::None,
            window: None,
            title_bar_height: 0.0,
            content_size: Vec2::ZERO,
            pos: Vec2::ZERO,
            size: Vec2::new(-1.0, -1.0),
            pos_saved: Vec2::ZERO,
            size_saved: Vec2::ZERO,
            collapsed_saved: false,
            flags: WindowFlags::empty(),
            flags_saved: WindowFlags::empty(),
            dock_flags: DockFlags::empty(),
            collapsed: false,
            hidden: false,
            hoverable: true,
            closable: false,
            children: Vec::new(),
            parent: None,
            root: None,
            automatic: false,
            split_weight: 1.0,
            split_hint: None,
            control_this_frame: false,
        }
    }

    pub fn kind(&self) -> Kind {
        match &self.data {
            NodeData::Root(_) => Kind::Root,
            NodeData::Split(split) => match split.axis {
                SplitAxis::Horizontal => Kind::HSplit,
                SplitAxis::Vertical => Kind::VSplit,
            },
            NodeData::Container(_) => Kind::Container,
            NodeData::Leaf(_) => Kind::Leaf,
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        matches!(self.data, NodeData::Root(_))
    }

    #[inline]
    pub fn is_split(&self) -> bool {
        matches!(self.data, NodeData::Split(_))
    }

    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self.data, NodeData::Container(_))
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.data, NodeData::Leaf(_))
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn split(&self) -> Option<&SplitData> {
        match &self.data {
            NodeData::Split(split) => Some(split),
            _ => None,
        }
    }

    pub fn split_mut(&mut self) -> Option<&mut SplitData> {
        match &mut self.data {
            NodeData::Split(split) => Some(split),
            _ => None,
        }
    }

    pub fn container(&self) -> Option<&ContainerData> {
        match &self.data {
            NodeData::Container(container) => Some(container),
            _ => None,
        }
    }

    pub fn container_mut(&mut self) -> Option<&mut ContainerData> {
        match &mut self.data {
            NodeData::Container(container) => Some(container),
            _ => None,
        }
    }

    pub fn leaf_mut(&mut self) -> Option<&mut LeafData> {
        match &mut self.data {
            NodeData::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// Slider positions of a split (empty slice for other kinds)
    pub fn sliders(&self) -> &[f32] {
        self.split().map(|s| s.sliders.as_slice()).unwrap_or(&[])
    }

    /// The visible tab of a container
    pub fn current_tab(&self) -> Option<NodeId> {
        self.container().and_then(|c| c.current_tab)
    }

    pub fn set_current_tab(&mut self, tab: Option<NodeId>) {
        if let Some(container) = self.container_mut() {
            container.current_tab = tab;
        }
    }

    /// Copy the live geometry into the saved (undocked) slots
    pub fn save_detached_state(&mut self) {
        self.pos_saved = self.pos;
        if !self.collapsed {
            self.size_saved = self.size;
        }
        self.collapsed_saved = self.collapsed;
        self.flags_saved = self.flags;
    }
}
