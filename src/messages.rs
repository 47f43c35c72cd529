//! Message types for the Elm-style architecture
//!
//! Every structural edit of the docking tree is expressed as a [`TreeMsg`]
//! and applied by [`crate::update::update`].

use crate::model::geometry::Vec2;
use crate::model::{DropZone, Edge, NodeId};

/// Tree edits
#[derive(Debug, Clone, PartialEq)]
pub enum TreeMsg {
    // === Building ===
    /// Give an empty root its automatic container
    FillEmpty(NodeId),
    /// Add a leaf to a container's tabs at `index` (append when `None`)
    Dock {
        container: NodeId,
        leaf: NodeId,
        index: Option<usize>,
    },
    /// Dock a leaf or a container relative to `target`, splitting when the
    /// zone is an edge
    DockAt {
        target: NodeId,
        node: NodeId,
        zone: DropZone,
    },

    /// Show this tab in its container
    SelectTab { container: NodeId, leaf: NodeId },

    // === Tearing down ===
    /// Remove an automatic node if it became empty or redundant
    Prune(NodeId),
    /// Pull a docked container out of its root and start dragging it
    Lift { container: NodeId, pointer: Vec2 },
    /// Take a leaf out of its container and mark it closed
    Close(NodeId),
    /// Take a tab out of its container after a tab bar gesture
    ReleaseTab {
        container: NodeId,
        leaf: NodeId,
        release: TabRelease,
    },
    /// Restore the floating geometry of a node nothing holds
    Undock(NodeId),
    /// Release every tab of a floating container
    ClearContainer(NodeId),
    /// Release everything docked in a root
    ClearRoot(NodeId),

    // === Sliders and sizing ===
    SetSliderPosition {
        node: NodeId,
        edge: Edge,
        position: f32,
    },
    /// Redistribute every split under a root by split weight
    ResetSliders(NodeId),
    SetSplitWeight { node: NodeId, weight: f32 },
    SetDetachedSize { node: NodeId, size: Vec2 },
    SetDetachedPosition { node: NodeId, pos: Vec2 },
}

/// Tab bar gesture that takes a tab out of its container
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TabRelease {
    /// The tab was dragged off the bar; the leaf follows the pointer
    Drag { pointer: Vec2 },
    /// The tab was double-clicked; the leaf floats under the pointer
    Detach { pointer: Vec2 },
    /// The tab's close button was pressed
    Close,
}

impl TreeMsg {
    /// Whether the message can change the tree's shape
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            TreeMsg::SetSplitWeight { .. }
                | TreeMsg::SetDetachedSize { .. }
                | TreeMsg::SetDetachedPosition { .. }
        )
    }
}
