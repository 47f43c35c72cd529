//! Per-frame layout of docked windows
//!
//! A root is laid out in two passes each frame:
//! 1. the bar pass turns split sliders into splitters the user can drag,
//!    inside the root's own window
//! 2. the geometry pass hands every child its rectangle and shows the
//!    docked containers with their tab bars
//!
//! Both passes only read the tree shape. Lifting a container or pruning one
//! that lost tabs is reported back to the caller and applied after the
//! traversal.

pub mod geometry;
pub mod tab_bar;

pub use geometry::{min_size, subtree_sizes};
pub use hit_test::{
    edge_zone, full_zone, hovered_node, hovering_tab_bar, nearest_tab_boundary, resolve_drop,
    DropGeometry, DropPlan,
};
pub use tab_bar::tab_id;

use tracing::trace;

use crate::commands;
use crate::host::{self, DockFlags, FrameContext, WindowFlags, WindowId, WindowSpec};
use crate::messages::TreeMsg;
use crate::model::geometry::Vec2;
use crate::model::{DockModel, Kind, NodeId, Status};
use crate::update::update;

/// Flags of a container window docked in a root
pub const DOCKED_CONTAINER_FLAGS: WindowFlags = WindowFlags::NO_TITLE_BAR
    .union(WindowFlags::NO_MOVE)
    .union(WindowFlags::NO_SCROLLBAR)
    .union(WindowFlags::NO_COLLAPSE)
    .union(WindowFlags::NO_SAVED_SETTINGS)
    .union(WindowFlags::NO_BRING_TO_FRONT_ON_FOCUS)
    .union(WindowFlags::NO_RESIZE);

/// Flags of the visible tab of a container
pub const SHOWN_TAB_FLAGS: WindowFlags = WindowFlags::NO_TITLE_BAR
    .union(WindowFlags::NO_MOVE)
    .union(WindowFlags::NO_COLLAPSE)
    .union(WindowFlags::NO_SAVED_SETTINGS)
    .union(WindowFlags::NO_BRING_TO_FRONT_ON_FOCUS)
    .union(WindowFlags::HORIZONTAL_SCROLLBAR);

/// Flags of the tabs kept out of sight behind the visible one
pub const HIDDEN_TAB_FLAGS: WindowFlags = WindowFlags::NO_TITLE_BAR
    .union(WindowFlags::NO_SCROLLBAR)
    .union(WindowFlags::NO_SCROLL_WITH_MOUSE)
    .union(WindowFlags::NO_COLLAPSE)
    .union(WindowFlags::NO_SAVED_SETTINGS)
    .union(WindowFlags::NO_INPUTS);

/// Follow-up work found by the geometry pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutOutcome {
    /// Container whose lift grip was pulled
    pub lift: Option<NodeId>,
    /// Containers that lost a tab and may need pruning
    pub erased: Vec<NodeId>,
}

fn run_msg(model: &mut DockModel, ctx: &mut FrameContext<'_>, msg: TreeMsg) {
    if let Some(cmd) = update(model, msg) {
        commands::run(model, ctx, cmd);
    }
}

// ============================================================================
// Bar pass
// ============================================================================

/// Draw the splitters of every split under `root` and store where the user
/// moved them
pub fn draw_root_bars(model: &mut DockModel, ctx: &mut FrameContext<'_>, root: NodeId) {
    #[cfg(feature = "profile-tracing")]
    let _span = tracing::trace_span!("bar_pass").entered();

    let Some(window) = model.node(root).and_then(|n| n.window) else {
        return;
    };
    let mut pending = vec![root];
    while let Some(id) = pending.pop() {
        let Some(node) = model.node_mut(id) else {
            continue;
        };
        node.root = Some(root);
        let children = node.children.clone();
        match node.kind() {
            Kind::Root => pending.extend(children.last().copied()),
            Kind::HSplit | Kind::VSplit => {
                draw_split_bars(model, ctx, id, window);
                // Reverse so children are visited in stack order
                pending.extend(children.iter().rev().copied());
            }
            Kind::Container | Kind::Leaf => {}
        }
    }
}

fn draw_split_bars(model: &mut DockModel, ctx: &mut FrameContext<'_>, split: NodeId, window: WindowId) {
    let bar = model.style.sliding_bar_width;
    let Some(node) = model.node(split) else {
        return;
    };
    let Some(data) = node.split() else {
        return;
    };
    let (axis, rect, label) = (data.axis, node.rect(), node.label.clone());
    let children = node.children.clone();
    let mut sliders = data.sliders.clone();
    if sliders.len() != children.len() + 1 {
        sliders = (0..=children.len())
            .map(|i| i as f32 / children.len().max(1) as f32)
            .collect();
    }
    let minimums: Vec<Vec2> = children.iter().map(|&c| min_size(model, c)).collect();

    if axis.along(rect.size()) > 0.0 {
        for n in 1..children.len() {
            let Some(placement) =
                geometry::bar_placement(rect, axis, &sliders, n, minimums[n - 1], minimums[n], bar)
            else {
                continue;
            };
            let id = format!("{label}__s{n}__");
            let pos = ctx
                .host
                .sliding_bar(&id, window, placement.rect, placement.min, placement.max, axis);
            sliders[n] = geometry::slider_from_bar(rect, axis, &sliders, n, pos, bar);
        }
    }

    if let Some(data) = model.node_mut(split).and_then(|n| n.split_mut()) {
        data.sliders = sliders;
    }
}

// ============================================================================
// Geometry pass
// ============================================================================

/// Position every node under `root` and show its docked containers
pub fn draw_root_container(
    model: &mut DockModel,
    ctx: &mut FrameContext<'_>,
    root: NodeId,
) -> LayoutOutcome {
    #[cfg(feature = "profile-tracing")]
    let _span = tracing::trace_span!("geometry_pass").entered();

    let mut outcome = LayoutOutcome::default();
    let Some(node) = model.node(root) else {
        return outcome;
    };
    let Some(&child) = node.children.last() else {
        return outcome;
    };
    let (pos, size) = (node.pos, node.size);
    let total = count_panes(model, child);

    if let Some(n) = model.node_mut(child) {
        n.pos = pos;
        n.size = size;
    }
    let mut count = 0;
    layout_node(model, ctx, child, root, &mut count, total, &mut outcome);
    trace!(target: "frame", root = ?root, panes = total, "laid out root");
    outcome
}

/// Splits and containers in the subtree
fn count_panes(model: &DockModel, id: NodeId) -> usize {
    let Some(node) = model.node(id) else {
        return 0;
    };
    match node.kind() {
        Kind::HSplit | Kind::VSplit => {
            1 + node
                .children
                .iter()
                .map(|&c| count_panes(model, c))
                .sum::<usize>()
        }
        Kind::Container => 1,
        Kind::Root | Kind::Leaf => 0,
    }
}

fn layout_node(
    model: &mut DockModel,
    ctx: &mut FrameContext<'_>,
    id: NodeId,
    root: NodeId,
    count: &mut usize,
    total: usize,
    outcome: &mut LayoutOutcome,
) {
    let Some(node) = model.node_mut(id) else {
        return;
    };
    node.root = Some(root);
    match node.kind() {
        Kind::HSplit | Kind::VSplit => {
            *count += 1;
            let bar = model.style.sliding_bar_width;
            let Some(node) = model.node(id) else {
                return;
            };
            let rect = node.rect();
            let axis = node.split().map(|s| s.axis);
            let sliders = node.sliders().to_vec();
            let children = node.children.clone();
            let Some(axis) = axis else {
                return;
            };
            for (i, &child) in children.iter().enumerate() {
                let child_rect = geometry::split_child_rect(rect, axis, &sliders, i, bar);
                if let Some(n) = model.node_mut(child) {
                    n.pos = child_rect.min();
                    n.size = child_rect.size();
                }
                layout_node(model, ctx, child, root, count, total, outcome);
            }
        }
        Kind::Container => {
            *count += 1;
            layout_docked_container(model, ctx, id, root, *count == total, outcome);
        }
        Kind::Root | Kind::Leaf => {}
    }
}

fn layout_docked_container(
    model: &mut DockModel,
    ctx: &mut FrameContext<'_>,
    id: NodeId,
    root: NodeId,
    bottom_right: bool,
    outcome: &mut LayoutOutcome,
) {
    let Some(root_node) = model.node(root) else {
        return;
    };
    let root_collapsed = root_node.collapsed;
    let root_window = root_node.window;
    let root_resizable = !root_node.flags.contains(WindowFlags::NO_RESIZE);

    let Some(node) = model.node_mut(id) else {
        return;
    };
    node.status = Status::Docked;
    node.hoverable = true;
    node.collapsed = root_collapsed;
    node.flags = DOCKED_CONTAINER_FLAGS;
    let current = node.current_tab();

    let noresize = root_collapsed || !bottom_right;
    if let Some(tab) = current.and_then(|t| model.node_mut(t)) {
        tab.hidden = root_collapsed;
        tab.flags.set(WindowFlags::NO_RESIZE, noresize);
    }
    if root_collapsed {
        return;
    }

    let Some(node) = model.node_mut(id) else {
        return;
    };
    node.hidden = false;
    let automatic = node.automatic;
    let dock_flags = node.dock_flags;
    let tab_depth = node.container().map_or(0.0, |c| c.tab_depth);
    let (label, pos, size, collapsed) = (node.label.clone(), node.pos, node.size, node.collapsed);
    let tab_content = current.and_then(|t| model.node(t)).map(|t| t.content_size);
    if let Some(tab) = current.and_then(|t| model.node_mut(t)) {
        tab.hidden = false;
    }

    let state = ctx.host.begin_window(&WindowSpec {
        label: &label,
        pos: Some(pos),
        size: Some(size),
        collapsed: Some(collapsed),
        content_size: tab_content.map(|c| c + Vec2::new(0.0, tab_depth)),
        flags: DOCKED_CONTAINER_FLAGS,
        transparent: current.is_some() || dock_flags.contains(DockFlags::TRANSPARENT),
        ..Default::default()
    });
    let window = state.id;
    model.registry.bind_window(id, window);
    if let Some(n) = model.node_mut(id) {
        n.title_bar_height = state.title_bar_height;
    }

    // The bottom-right pane resizes the whole root; others may be lifted out
    if current.is_none() {
        if let Some(root_window) = root_window {
            if bottom_right && root_resizable {
                let grip = ctx.host.resize_grip(&label, window, root_window);
                if grip.double_clicked {
                    run_msg(model, ctx, TreeMsg::ResetSliders(root));
                }
            }
        }
        if !automatic
            && !dock_flags.contains(DockFlags::NO_LIFT_CONTAINER)
            && ctx.host.lift_grip(&label, window)
        {
            outcome.lift = Some(id);
        }
    }

    if draw_container(model, ctx, id, noresize) {
        outcome.erased.push(id);
    }
    ctx.host.end_window();

    if ctx.input.mouse_clicked && ctx.hovered_window() == Some(window) {
        focus_container(model, ctx, id, true);
    }

    // root -> container -> current tab
    let tab_window = model
        .node(id)
        .and_then(|n| n.current_tab())
        .and_then(|t| model.node(t))
        .and_then(|t| t.window);
    let stack = ctx.host.z_order_mut();
    if let Some(root_window) = root_window {
        host::place_window(stack, root_window, window, 1);
    }
    if let Some(tab_window) = tab_window {
        host::place_window(stack, window, tab_window, 1);
    }
}

// ============================================================================
// Containers and tabs
// ============================================================================

/// Draw a container's tab bar and show its current tab over the content
/// area, hiding the rest. Returns whether a tab left the container.
pub fn draw_container(
    model: &mut DockModel,
    ctx: &mut FrameContext<'_>,
    id: NodeId,
    noresize: bool,
) -> bool {
    let Some(node) = model.node(id) else {
        return false;
    };
    if !node.is_container() || node.children.is_empty() {
        return false;
    }

    let erased = tab_bar::draw_tab_bar(model, ctx, id);

    let Some(node) = model.node_mut(id) else {
        return erased;
    };
    let top_y = node.pos.y;
    let bar_bottom = node.container().map_or(top_y, |c| c.tab_bar.max().y);
    if let Some(data) = node.container_mut() {
        data.tab_depth = (bar_bottom - top_y).max(0.0);
    }
    let children = node.children.clone();
    let visible = !node.hidden && !node.collapsed;
    let current = node.current_tab();

    for child in children {
        hide_tab_window(model, child);
    }
    if let Some(tab) = current.filter(|_| visible) {
        show_tab_window(model, tab, id, noresize);
    }
    erased
}

/// Put `tab` over the content area of `container`
pub fn show_tab_window(model: &mut DockModel, tab: NodeId, container: NodeId, noresize: bool) {
    let Some(holder) = model.node(container) else {
        return;
    };
    let top = holder.container().map_or(0.0, |c| c.tab_depth);
    let (pos, size) = (holder.pos, holder.size);

    let Some(node) = model.node_mut(tab) else {
        return;
    };
    node.pos = Vec2::new(pos.x, pos.y + top);
    node.size = Vec2::new(size.x, size.y - top);
    node.hidden = false;
    node.flags = SHOWN_TAB_FLAGS;
    node.flags.set(WindowFlags::NO_RESIZE, noresize);
}

/// Keep `tab` in the window stack without showing it
pub fn hide_tab_window(model: &mut DockModel, tab: NodeId) {
    if let Some(node) = model.node_mut(tab) {
        node.flags = HIDDEN_TAB_FLAGS;
        node.pos = Vec2::ZERO;
        node.size = Vec2::ZERO;
        node.hidden = true;
    }
}

/// Bring a clicked container to the front and give it the pointer.
///
/// Raises the root, the container and its current tab (unless the root, or
/// a floating container itself, refuses bring-to-front), focuses the current
/// tab, and with `start_move` on a fresh click with no widget active starts
/// moving the root (or the floating container).
pub fn focus_container(model: &DockModel, ctx: &mut FrameContext<'_>, id: NodeId, start_move: bool) {
    let Some(node) = model.node(id) else {
        return;
    };
    let root = node.root.and_then(|r| model.node(r)).filter(|r| r.is_root());
    let raise = !root
        .map_or(node.flags, |r| r.flags)
        .contains(WindowFlags::NO_BRING_TO_FRONT_ON_FOCUS);
    let tab_window = node
        .current_tab()
        .and_then(|t| model.node(t))
        .and_then(|t| t.window);

    if raise {
        let stack = ctx.host.z_order_mut();
        for window in [root.and_then(|r| r.window), node.window, tab_window]
            .into_iter()
            .flatten()
        {
            host::raise(stack, window);
        }
    }

    if let Some(window) = tab_window.or(node.window) {
        ctx.requests.focus_window = Some(window);
    }
    if start_move && !ctx.input.any_item_active && ctx.input.mouse_clicked {
        if let Some(window) = root.and_then(|r| r.window).or(node.window) {
            ctx.requests.move_window = Some(window);
        }
    }
}
