//! Tree mutation engine
//!
//! Docking, splitting, pruning and releasing nodes. Every operation is
//! total: a missing or ill-kinded node aborts that operation with a log line
//! and leaves the tree as it was.

use tracing::{debug, warn};

use crate::commands::Cmd;
use crate::model::geometry::Vec2;
use crate::messages::TabRelease;
use crate::model::{DockModel, DropZone, Edge, Kind, NodeData, NodeId, SplitAxis, Status};

use super::stack;

// ============================================================================
// Building
// ============================================================================

/// Give an empty root one automatic container to protect from pruning
pub fn fill_empty(model: &mut DockModel, root: NodeId) {
    let Some(node) = model.registry.get_mut(root) else {
        return;
    };
    if !node.is_root() {
        return;
    }
    node.root = Some(root);
    if !node.children.is_empty() {
        return;
    }

    let Some(container) = create_docked(model, root, Kind::Container) else {
        return;
    };
    stack::insert(&mut model.registry, root, container, None);
    debug!(target: "tree", root = %label(model, root), container = %label(model, container), "filled empty root");
}

/// Add `leaf` to `container`'s tabs at `index` (appended when `None` or out
/// of range) and make it the current tab
pub fn new_dock(model: &mut DockModel, container: NodeId, leaf: NodeId, index: Option<usize>) {
    if model.registry.kind(container) != Some(Kind::Container) {
        warn!(target: "tree", ?container, "dock target is not a container");
        return;
    }
    let Some(node) = model.registry.get(leaf) else {
        return;
    };
    if !node.is_leaf() {
        warn!(target: "tree", leaf = %node.label, "only leaves can be docked as tabs");
        return;
    }
    if node.status == Status::Docked {
        warn!(target: "tree", leaf = %node.label, "leaf is already docked");
        return;
    }

    stack::insert(&mut model.registry, container, leaf, index);
    if let Some(node) = model.registry.get_mut(leaf) {
        node.status = Status::Docked;
        node.hoverable = false;
    }
    if let Some(node) = model.registry.get_mut(container) {
        node.set_current_tab(Some(leaf));
    }
    debug!(target: "tree", leaf = %label(model, leaf), container = %label(model, container), ?index, "docked");
}

/// Dock `node` (a leaf or a container) relative to the container `target`.
///
/// Roots and splits forward to their last child. Edge zones split the
/// target; full and tab zones join its tabs, or, for a container dropped on
/// an empty automatic pane directly under a root, take that pane's place.
/// Returns the container that ends up holding `node` (or `node` itself when
/// it is a container).
pub fn new_dock_root(
    model: &mut DockModel,
    target: NodeId,
    node: NodeId,
    zone: DropZone,
) -> Option<NodeId> {
    let target_node = model.registry.get(target)?;
    match target_node.kind() {
        Kind::Root | Kind::HSplit | Kind::VSplit => {
            let Some(&last) = target_node.children.last() else {
                warn!(target: "tree", target = %target_node.label, "nothing to dock against");
                return None;
            };
            return new_dock_root(model, last, node, zone);
        }
        Kind::Leaf => {
            warn!(target: "tree", target = %target_node.label, "cannot dock against a leaf");
            return None;
        }
        Kind::Container => {}
    }
    if target == node {
        return None;
    }
    if still_docked(model, node) {
        warn!(target: "tree", node = %label(model, node), "node is still docked; undock it first");
        return None;
    }

    let target_automatic = target_node.automatic;
    let target_empty = target_node.children.is_empty();
    let Some(parent) = target_node.parent else {
        warn!(target: "tree", target = %target_node.label, "edge drop on a container that is not docked");
        return None;
    };
    let parent_kind = model.registry.kind(parent)?;
    let node_kind = model.registry.kind(node)?;
    let given = match node_kind {
        Kind::Container => Some(node),
        Kind::Leaf => None,
        _ => {
            warn!(target: "tree", node = %label(model, node), "only leaves and containers can be docked");
            return None;
        }
    };

    let holder = match (parent_kind, zone) {
        (Kind::Root, DropZone::Edge(edge)) => replace_hv(model, target, edge, given)?,
        (Kind::Root, _) => {
            if !target_automatic {
                debug!(target: "tree", target = %label(model, target), "full drop needs an automatic pane");
                return None;
            }
            match given {
                Some(container) => {
                    if !target_empty {
                        debug!(target: "tree", target = %label(model, target), "pane still holds tabs");
                        return None;
                    }
                    stack::replace(&mut model.registry, parent, target, container);
                    model.registry.destroy(target);
                    container
                }
                None => target,
            }
        }
        (Kind::HSplit | Kind::VSplit, DropZone::Edge(edge)) => {
            let axis = model.registry.get(parent).and_then(|n| n.split()).map(|s| s.axis)?;
            if edge.split_axis() == axis {
                add_to_hv(model, target, edge, given)?
            } else {
                replace_hv(model, target, edge, given)?
            }
        }
        (Kind::HSplit | Kind::VSplit, _) => {
            if given.is_some() {
                debug!(target: "tree", "containers cannot join another container's tabs");
                return None;
            }
            target
        }
        _ => {
            warn!(target: "tree", target = %label(model, target), "container has an unexpected parent");
            return None;
        }
    };

    if node_kind == Kind::Leaf {
        let index = match zone {
            DropZone::Tab(i) => Some(i),
            _ => None,
        };
        new_dock(model, holder, node, index);
    }
    // The layout pass makes docked containers hoverable again; leaves never are
    if let Some(n) = model.registry.get_mut(node) {
        n.status = Status::Docked;
        n.hoverable = false;
    }
    debug!(target: "tree", node = %label(model, node), holder = %label(model, holder), ?zone, "docked at zone");
    Some(holder)
}

/// Wrap `target` in a new two-child split with a container on the `edge`
/// side. Uses `container` when given, otherwise a new automatic one.
pub fn replace_hv(
    model: &mut DockModel,
    target: NodeId,
    edge: Edge,
    container: Option<NodeId>,
) -> Option<NodeId> {
    let parent = model.registry.parent(target)?;
    let root = model.registry.get(parent)?.root?;

    let container = match container {
        Some(c) if still_docked(model, c) => {
            warn!(target: "tree", container = %label(model, c), "container is still docked; undock it first");
            return None;
        }
        Some(c) => c,
        None => create_docked(model, root, Kind::Container)?,
    };
    let split_kind = match edge.split_axis() {
        SplitAxis::Horizontal => Kind::HSplit,
        SplitAxis::Vertical => Kind::VSplit,
    };
    let split = create_docked(model, root, split_kind)?;
    if let Some(n) = model.registry.get_mut(split) {
        n.hoverable = false;
    }

    // The split takes over the target's slot, including its hint
    stack::replace(&mut model.registry, parent, target, split);
    let hint = model.registry.get_mut(target).and_then(|n| n.split_hint.take());
    if let Some(n) = model.registry.get_mut(split) {
        n.split_hint = hint;
    }

    let (first, second) = if edge.is_leading() {
        (container, target)
    } else {
        (target, container)
    };
    stack::insert(&mut model.registry, split, first, None);
    stack::insert(&mut model.registry, split, second, None);

    let w_first = model.registry.get(first).map_or(1.0, |n| n.split_weight);
    let w_second = model.registry.get(second).map_or(1.0, |n| n.split_weight);
    if let Some(data) = model.registry.get_mut(split).and_then(|n| n.split_mut()) {
        data.sliders = vec![0.0, stack::weight_fraction(w_first, w_second), 1.0];
    }
    if let Some(n) = model.registry.get_mut(container) {
        n.split_hint = Some(edge);
        n.status = Status::Docked;
    }
    debug!(target: "tree", target = %label(model, target), split = %label(model, split), ?edge, "wrapped in split");
    Some(container)
}

/// Add a container next to `target` inside its (matching) parent split
pub fn add_to_hv(
    model: &mut DockModel,
    target: NodeId,
    edge: Edge,
    container: Option<NodeId>,
) -> Option<NodeId> {
    let parent = model.registry.parent(target)?;
    let root = model.registry.get(parent)?.root?;

    let container = match container {
        Some(c) if still_docked(model, c) => {
            warn!(target: "tree", container = %label(model, c), "container is still docked; undock it first");
            return None;
        }
        Some(c) => c,
        None => create_docked(model, root, Kind::Container)?,
    };
    if !stack::insert_beside(&mut model.registry, parent, target, container, edge) {
        return None;
    }
    if let Some(n) = model.registry.get_mut(container) {
        n.status = Status::Docked;
    }
    debug!(target: "tree", target = %label(model, target), split = %label(model, parent), ?edge, "added to split");
    Some(container)
}

// ============================================================================
// Tearing down
// ============================================================================

/// Remove `id` if it is an automatic node that became empty or redundant,
/// then try its parent.
///
/// Empty containers go away unless they are the last pane of a root. Empty
/// splits turn into containers and are tried again. A split with one child
/// is replaced by that child.
pub fn kill_container_maybe(model: &mut DockModel, id: NodeId) {
    let mut current = Some(id);
    while let Some(id) = current.take() {
        let Some(node) = model.registry.get(id) else {
            return;
        };
        if !node.automatic || node.root.is_none() {
            return;
        }
        let Some(parent) = node.parent else {
            return;
        };
        let empty = node.children.is_empty();

        match node.kind() {
            Kind::Container if empty => {
                let parent_node = model.registry.get(parent);
                let last_pane = parent_node.is_some_and(|p| p.is_root() && p.children.len() <= 1);
                if last_pane {
                    return;
                }
                stack::remove(&mut model.registry, parent, id);
                model.registry.destroy(id);
                debug!(target: "tree", node = ?id, "pruned empty container");
                current = Some(parent);
            }
            Kind::HSplit | Kind::VSplit if empty => {
                if let Some(n) = model.registry.get_mut(id) {
                    n.data = NodeData::for_kind(Kind::Container);
                }
                current = Some(id);
            }
            Kind::HSplit | Kind::VSplit if node.children.len() == 1 => {
                let child = node.children[0];
                let hint = node.split_hint;
                stack::replace(&mut model.registry, parent, id, child);
                if let Some(n) = model.registry.get_mut(child) {
                    n.split_hint = hint;
                }
                if let Some(n) = model.registry.get_mut(id) {
                    n.children.clear();
                }
                model.registry.destroy(id);
                debug!(target: "tree", node = ?id, child = %label(model, child), "collapsed one-child split");
                current = Some(parent);
            }
            _ => return,
        }
    }
}

/// Pull a docked container out of its root and hand it to the pointer
pub fn lift_container(model: &mut DockModel, container: NodeId, pointer: Vec2) -> Cmd {
    let Some(node) = model.registry.get(container) else {
        return Cmd::None;
    };
    if !node.is_container() {
        warn!(target: "tree", node = %node.label, "only containers can be lifted");
        return Cmd::None;
    }
    let Some(parent) = node.parent else {
        warn!(target: "tree", node = %node.label, "container is not docked");
        return Cmd::None;
    };

    stack::remove(&mut model.registry, parent, container);
    kill_container_maybe(model, parent);
    let raise = undock(model, container);

    let tab_height = model.style.tab_height;
    if let Some(n) = model.registry.get_mut(container) {
        n.status = Status::Dragged;
        n.hoverable = false;
        n.pos = pointer - Vec2::new(0.5 * n.size.x, tab_height.min(0.2 * n.size.y));
    }
    debug!(target: "tree", container = %label(model, container), "lifted");
    Cmd::batch(vec![raise, Cmd::BeginDrag(container)])
}

/// Take a leaf out of its container (if docked) and mark it closed
pub fn close_dock(model: &mut DockModel, leaf: NodeId) -> Cmd {
    let Some(node) = model.registry.get(leaf) else {
        return Cmd::None;
    };
    if !node.is_leaf() {
        warn!(target: "tree", node = %node.label, "only leaves can be closed");
        return Cmd::None;
    }

    let mut cmd = Cmd::None;
    if node.status == Status::Docked {
        let container = node.parent;
        if let Some(container) = container {
            detach_tab(model, container, leaf);
        }
        cmd = undock(model, leaf);
        if let Some(n) = model.registry.get_mut(leaf) {
            n.parent = None;
        }
        if let Some(container) = container {
            kill_container_maybe(model, container);
        }
    }

    if let Some(n) = model.registry.get_mut(leaf) {
        n.status = Status::Closed;
        n.hoverable = false;
    }
    debug!(target: "tree", leaf = %label(model, leaf), "closed");
    cmd
}

/// Remove a tab from its container, moving the current tab to the preceding
/// sibling (or the new front) when it was the removed one
pub fn detach_tab(model: &mut DockModel, container: NodeId, leaf: NodeId) {
    let Some(i) = stack::find(&model.registry, container, leaf) else {
        return;
    };
    let was_current = model.registry.get(container).and_then(|n| n.current_tab()) == Some(leaf);
    let previous = i
        .checked_sub(1)
        .and_then(|p| model.registry.children(container).get(p).copied());

    stack::remove(&mut model.registry, container, leaf);
    if let Some(n) = model.registry.get_mut(container) {
        if was_current {
            let next = previous.or_else(|| n.children.first().copied());
            n.set_current_tab(next);
        }
    }
}

/// Make `leaf` the visible tab of `container`
pub fn select_tab(model: &mut DockModel, container: NodeId, leaf: NodeId) {
    if stack::find(&model.registry, container, leaf).is_none() {
        warn!(target: "tree", ?container, ?leaf, "selected tab is not in the container");
        return;
    }
    if let Some(n) = model.registry.get_mut(container) {
        n.set_current_tab(Some(leaf));
    }
}

/// Take a tab out of its container in response to a tab bar gesture.
///
/// The container is not pruned here; the layout pass prunes it once the
/// whole tab bar has been handled. Dragged and detached tabs keep their
/// parent link so the leaf's own begin can prune it too.
pub fn release_tab(
    model: &mut DockModel,
    container: NodeId,
    leaf: NodeId,
    release: TabRelease,
) -> Cmd {
    if model.registry.kind(leaf) != Some(Kind::Leaf) {
        return Cmd::None;
    }
    if stack::find(&model.registry, container, leaf).is_none() {
        warn!(target: "tree", ?container, ?leaf, "released tab is not in the container");
        return Cmd::None;
    }
    detach_tab(model, container, leaf);
    let raise = undock(model, leaf);

    let Some(n) = model.registry.get_mut(leaf) else {
        return raise;
    };
    let cmd = match release {
        TabRelease::Drag { pointer } => {
            n.status = Status::Dragged;
            n.hoverable = false;
            n.pos = pointer - Vec2::new(0.5 * n.size.x, 0.0);
            n.parent = Some(container);
            Cmd::batch(vec![raise, Cmd::BeginDrag(leaf)])
        }
        TabRelease::Detach { pointer } => {
            n.pos = pointer - Vec2::new(0.5 * n.size.x, 0.0);
            n.parent = Some(container);
            Cmd::batch(vec![raise, Cmd::Focus(leaf), Cmd::ConsumeDoubleClick])
        }
        TabRelease::Close => {
            n.status = Status::Closed;
            n.hoverable = false;
            n.parent = None;
            if let Some(data) = n.leaf_mut() {
                data.close_requested = true;
            }
            Cmd::None
        }
    };
    debug!(target: "tree", leaf = %label(model, leaf), container = %label(model, container), ?release, "released tab");
    cmd
}

/// Restore a node's floating geometry and flags
///
/// The parent link is kept so the former container can be pruned once the
/// node is begun again.
pub fn undock(model: &mut DockModel, id: NodeId) -> Cmd {
    let Some(node) = model.registry.get_mut(id) else {
        return Cmd::None;
    };
    node.status = Status::Open;
    node.hoverable = true;
    node.hidden = false;
    node.control_this_frame = true;
    node.size = node.size_saved;
    node.collapsed = node.collapsed_saved;
    node.flags = node.flags_saved;
    node.pos = node.pos_saved;
    node.root = None;
    debug!(target: "tree", node = %node.label, "undocked");
    Cmd::RaiseOrSink(id)
}

/// [`undock`] for a node nothing holds any more; a node still docked is
/// left alone
pub fn undock_floating(model: &mut DockModel, id: NodeId) -> Cmd {
    if still_docked(model, id) {
        warn!(target: "tree", node = %label(model, id), "node is still docked; close or lift it first");
        return Cmd::None;
    }
    undock(model, id)
}

/// Release every tab of a (floating) container, cascading their positions
/// from the container's
pub fn clear_container(model: &mut DockModel, container: NodeId) -> Cmd {
    let Some(node) = model.registry.get(container) else {
        return Cmd::None;
    };
    let children = node.children.clone();
    let mut pos = node.pos;
    let step = Vec2::new(model.style.cascade_increment, model.style.cascade_increment);

    let mut cmds = Vec::with_capacity(children.len());
    for child in children {
        cmds.push(undock(model, child));
        if let Some(n) = model.registry.get_mut(child) {
            n.pos = pos;
            n.parent = None;
        }
        pos = pos + step;
    }
    if let Some(n) = model.registry.get_mut(container) {
        n.children.clear();
        n.set_current_tab(None);
    }
    debug!(target: "tree", container = %label(model, container), "cleared container");
    Cmd::batch(cmds)
}

/// Release everything docked in a root: automatic panes hand their tabs
/// back as floating windows and disappear, splits disappear, caller-owned
/// containers float with their tabs. Released windows cascade from the
/// root's position.
pub fn clear_root_container(model: &mut DockModel, root: NodeId) -> Cmd {
    let Some(node) = model.registry.get(root) else {
        return Cmd::None;
    };
    if !node.is_root() {
        return Cmd::None;
    }
    let origin = node.pos;
    let children = node.children.clone();

    let mut counter = 0u32;
    let mut cmds = Vec::new();
    for child in children {
        clear_subtree(model, child, origin, &mut counter, &mut cmds);
    }
    if let Some(n) = model.registry.get_mut(root) {
        n.children.clear();
    }
    debug!(target: "tree", root = %label(model, root), released = counter, "cleared root");
    Cmd::batch(cmds)
}

fn clear_subtree(
    model: &mut DockModel,
    id: NodeId,
    origin: Vec2,
    counter: &mut u32,
    cmds: &mut Vec<Cmd>,
) {
    let Some(node) = model.registry.get(id) else {
        return;
    };
    let step = model.style.cascade_increment;
    let children = node.children.clone();
    let automatic = node.automatic;

    match node.kind() {
        Kind::HSplit | Kind::VSplit => {
            for child in children {
                clear_subtree(model, child, origin, counter, cmds);
            }
            if let Some(n) = model.registry.get_mut(id) {
                n.children.clear();
            }
            model.registry.destroy(id);
        }
        Kind::Container if automatic => {
            for child in children {
                cmds.push(undock(model, child));
                let offset = *counter as f32 * step;
                if let Some(n) = model.registry.get_mut(child) {
                    n.pos = origin + Vec2::new(offset, offset);
                    n.parent = None;
                }
                *counter += 1;
            }
            if let Some(n) = model.registry.get_mut(id) {
                n.children.clear();
                n.set_current_tab(None);
            }
            model.registry.destroy(id);
        }
        Kind::Container => {
            cmds.push(undock(model, id));
            let offset = *counter as f32 * step;
            if let Some(n) = model.registry.get_mut(id) {
                n.pos = origin + Vec2::new(offset, offset);
                n.parent = None;
            }
            *counter += 1;
        }
        Kind::Root | Kind::Leaf => {}
    }
}

// ============================================================================
// Sliders and sizing
// ============================================================================

/// Move the boundary on `edge` of `node` inside its parent split to the
/// fraction `position`, kept between the neighboring boundaries.
///
/// Ignored when the edge does not run across the parent's axis, when the
/// position is outside `[0, 1]`, or when the edge is an outer one.
pub fn set_slider_position(model: &mut DockModel, node: NodeId, edge: Edge, position: f32) {
    let Some(parent) = model.registry.parent(node) else {
        warn!(target: "tree", ?node, "slider request on a node without a parent");
        return;
    };
    let Some(axis) = model.registry.get(parent).and_then(|p| p.split()).map(|s| s.axis) else {
        warn!(target: "tree", ?node, "slider request outside a split");
        return;
    };
    if edge.split_axis() != axis || !(0.0..=1.0).contains(&position) {
        warn!(target: "tree", ?node, ?edge, position, "slider request dropped");
        return;
    }
    let Some(i) = stack::find(&model.registry, parent, node) else {
        return;
    };
    let count = model.registry.children(parent).len();
    let k = if edge.is_leading() { i } else { i + 1 };
    if k == 0 || k >= count {
        warn!(target: "tree", ?node, ?edge, "outer edge has no slider");
        return;
    }

    if let Some(data) = model.registry.get_mut(parent).and_then(|p| p.split_mut()) {
        if data.sliders.len() == count + 1 {
            let (lo, hi) = (data.sliders[k - 1], data.sliders[k + 1]);
            data.sliders[k] = position.clamp(lo, hi);
        }
    }
}

/// Redistribute every split in the subtree by its children's split weights
pub fn reset_slider_positions(model: &mut DockModel, id: NodeId) {
    let mut pending = vec![id];
    while let Some(id) = pending.pop() {
        let Some(node) = model.registry.get(id) else {
            continue;
        };
        let children = node.children.clone();
        if node.is_split() {
            let weights: Vec<f32> = children
                .iter()
                .map(|&c| model.registry.get(c).map_or(1.0, |n| n.split_weight))
                .collect();
            if let Some(data) = model.registry.get_mut(id).and_then(|n| n.split_mut()) {
                data.sliders = stack::weighted_sliders(&weights);
            }
        }
        if !matches!(model.registry.kind(id), Some(Kind::Container | Kind::Leaf)) {
            pending.extend(children);
        }
    }
}

pub fn set_split_weight(model: &mut DockModel, node: NodeId, weight: f32) {
    if !(weight > 0.0 && weight.is_finite()) {
        warn!(target: "tree", ?node, weight, "split weight must be positive");
        return;
    }
    if let Some(n) = model.registry.get_mut(node) {
        n.split_weight = weight;
    }
}

/// Size the node gets when it next floats. A node that was never shown
/// starts with it.
pub fn set_detached_size(model: &mut DockModel, node: NodeId, size: Vec2) {
    if let Some(n) = model.registry.get_mut(node) {
        n.size_saved = size;
        if n.status == Status::None {
            n.size = size;
            n.control_this_frame = true;
        }
    }
}

/// Position the node gets when it next floats. A node that was never shown
/// starts there.
pub fn set_detached_position(model: &mut DockModel, node: NodeId, pos: Vec2) {
    if let Some(n) = model.registry.get_mut(node) {
        n.pos_saved = pos;
        if n.status == Status::None {
            n.pos = pos;
            n.control_this_frame = true;
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Docked, or still listed by its parent; docking it again would give it
/// two parents
fn still_docked(model: &DockModel, node: NodeId) -> bool {
    model.registry.get(node).is_some_and(|n| {
        n.status == Status::Docked
            || n.parent
                .is_some_and(|p| model.registry.children(p).contains(&node))
    })
}

fn create_docked(model: &mut DockModel, root: NodeId, kind: Kind) -> Option<NodeId> {
    let id = model.registry.create_automatic(root, kind)?;
    if let Some(n) = model.registry.get_mut(id) {
        n.status = Status::Docked;
        n.hoverable = kind == Kind::Container;
    }
    Some(id)
}

fn label(model: &DockModel, id: NodeId) -> String {
    model
        .registry
        .get(id)
        .map(|n| n.label.clone())
        .unwrap_or_else(|| format!("{id:?}"))
}
