//! Update functions for the Elm-style architecture
//!
//! All structural edits of the docking tree flow through [`update`].

pub mod stack;
pub mod tree;

use crate::commands::Cmd;
use crate::messages::TreeMsg;
use crate::model::DockModel;

#[cfg(debug_assertions)]
use crate::tracing::TreeSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use tree::{
    add_to_hv, clear_container, clear_root_container, close_dock, detach_tab, fill_empty,
    kill_container_maybe, lift_container, new_dock, new_dock_root, release_tab, replace_hv,
    reset_slider_positions, select_tab, set_detached_position, set_detached_size,
    set_slider_position, set_split_weight, undock, undock_floating,
};

/// Main update function
///
/// In debug builds, this wraps with tracing instrumentation and checks the
/// tree invariants after every message.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut DockModel, msg: TreeMsg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut DockModel, msg: TreeMsg) -> Option<Cmd> {
    let cmd = match msg {
        TreeMsg::FillEmpty(root) => {
            tree::fill_empty(model, root);
            Cmd::None
        }
        TreeMsg::Dock {
            container,
            leaf,
            index,
        } => {
            tree::new_dock(model, container, leaf, index);
            Cmd::None
        }
        TreeMsg::DockAt { target, node, zone } => {
            tree::new_dock_root(model, target, node, zone);
            Cmd::None
        }
        TreeMsg::Prune(id) => {
            tree::kill_container_maybe(model, id);
            Cmd::None
        }
        TreeMsg::Lift { container, pointer } => tree::lift_container(model, container, pointer),
        TreeMsg::Close(leaf) => tree::close_dock(model, leaf),
        TreeMsg::ReleaseTab {
            container,
            leaf,
            release,
        } => tree::release_tab(model, container, leaf, release),
        TreeMsg::SelectTab { container, leaf } => {
            tree::select_tab(model, container, leaf);
            Cmd::None
        }
        TreeMsg::Undock(id) => tree::undock_floating(model, id),
        TreeMsg::ClearContainer(id) => tree::clear_container(model, id),
        TreeMsg::ClearRoot(id) => tree::clear_root_container(model, id),
        TreeMsg::SetSliderPosition {
            node,
            edge,
            position,
        } => {
            tree::set_slider_position(model, node, edge, position);
            Cmd::None
        }
        TreeMsg::ResetSliders(id) => {
            tree::reset_slider_positions(model, id);
            Cmd::None
        }
        TreeMsg::SetSplitWeight { node, weight } => {
            tree::set_split_weight(model, node, weight);
            Cmd::None
        }
        TreeMsg::SetDetachedSize { node, size } => {
            tree::set_detached_size(model, node, size);
            Cmd::None
        }
        TreeMsg::SetDetachedPosition { node, pos } => {
            tree::set_detached_position(model, node, pos);
            Cmd::None
        }
    };
    cmd.into_option()
}

/// Traced update wrapper (debug builds only)
///
/// Captures the tree shape before and after structural messages and logs
/// the diff, then validates the registry.
#[cfg(debug_assertions)]
fn update_traced(model: &mut DockModel, msg: TreeMsg) -> Option<Cmd> {
    let structural = msg.is_structural();
    let msg_name = format!("{:?}", msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();

    let before = structural.then(|| TreeSnapshot::of_forest(model));
    debug!(target: "message", msg = %msg_name, "processing");

    let result = update_inner(model, msg);

    if let Some(before) = before {
        let after = TreeSnapshot::of_forest(model);
        if let Some(diff) = before.diff(&after) {
            debug!(target: "tree", %diff, "shape changed");
        }
    }
    model.registry.assert_invariants();

    result
}
