//! Public frame API
//!
//! The calls a host render loop makes every frame: one [`Docking::open_root`]
//! per root, one [`Docking::open_container`] per caller-owned container and a
//! [`Docking::begin_leaf`] / [`Docking::end_leaf`] pair around the content of
//! every dockable window. Each call takes the frame's [`FrameContext`] and
//! leaves its requests (window to move, window to focus) in it.

use tracing::{debug, trace};

use crate::commands;
use crate::config::DockStyle;
use crate::host::{self, DockFlags, FrameContext, WindowFlags, WindowId, WindowSpec, WindowState};
use crate::messages::TreeMsg;
use crate::model::geometry::Vec2;
use crate::model::{DockModel, DropZone, Edge, Kind, Node, NodeId, Status};
use crate::tracing::TreeSnapshot;
use crate::update::update;
use crate::view;

/// Docking state shared by every window of one GUI context
#[derive(Debug, Default)]
pub struct Docking {
    model: DockModel,
    current_leaf: Option<NodeId>,
}

impl Docking {
    pub fn new(style: DockStyle) -> Self {
        Self {
            model: DockModel::new(style),
            current_leaf: None,
        }
    }

    pub fn model(&self) -> &DockModel {
        &self.model
    }

    pub fn style(&self) -> &DockStyle {
        &self.model.style
    }

    pub fn set_style(&mut self, style: DockStyle) {
        self.model.style = style;
    }

    /// Node registered under `label`
    pub fn find(&self, label: &str) -> Option<NodeId> {
        self.model.registry.find(label)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.model.node(id)
    }

    /// Leaf between the last `begin_leaf` and its `end_leaf`
    pub fn current_leaf(&self) -> Option<NodeId> {
        self.current_leaf
    }

    /// One line per node of the tree under `root`
    pub fn describe(&self, root: NodeId) -> String {
        TreeSnapshot::of_root(&self.model, root).to_string()
    }

    /// Forget every node. Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.model.registry.shutdown();
        self.current_leaf = None;
    }

    // ========================================================================
    // Roots and containers
    // ========================================================================

    /// Show the root `label` and everything docked in it.
    ///
    /// An empty root is given an automatic container first. When the open
    /// flag turns false the whole tree is released back to floating windows.
    pub fn open_root(
        &mut self,
        ctx: &mut FrameContext<'_>,
        label: &str,
        mut open: Option<&mut bool>,
        flags: WindowFlags,
        dock_flags: DockFlags,
    ) -> NodeId {
        let id = self.model.registry.find_or_create(label, Kind::Root);
        if let Some(node) = self.model.node_mut(id) {
            node.dock_flags = dock_flags;
        }
        if is_open(&open) {
            self.dispatch(ctx, TreeMsg::FillEmpty(id));
        }

        let (min, auto) = view::subtree_sizes(&self.model, id);
        let state = ctx.host.begin_window(&WindowSpec {
            label,
            min_size: min,
            content_size: Some(auto),
            flags: flags | WindowFlags::NO_RESIZE,
            closable: open.is_some(),
            transparent: true,
            ..Default::default()
        });
        if !state.open {
            close_flag(&mut open);
        }
        self.model.registry.bind_window(id, state.id);
        let moving = ctx.is_moving(state.id);

        let status = if moving {
            Status::Dragged
        } else if !is_open(&open) {
            Status::Closed
        } else if state.collapsed {
            Status::Collapsed
        } else {
            Status::Open
        };
        if let Some(node) = self.model.node_mut(id) {
            let title = Vec2::new(0.0, state.title_bar_height);
            node.pos = state.pos + title;
            node.size = state.size - title;
            node.title_bar_height = state.title_bar_height;
            node.flags = flags;
            node.root = Some(id);
            node.collapsed = state.collapsed;
            node.closable = open.is_some();
            node.hoverable = false;
            node.status = status;
        }

        if status == Status::Closed {
            self.dispatch(ctx, TreeMsg::ClearRoot(id));
        } else if !state.collapsed {
            view::draw_root_bars(&mut self.model, ctx, id);
        }
        ctx.host.end_window();

        if status != Status::Closed {
            let outcome = view::draw_root_container(&mut self.model, ctx, id);
            if let Some(container) = outcome.lift {
                let pointer = ctx.input.pointer;
                self.dispatch(ctx, TreeMsg::Lift { container, pointer });
            }
            for container in outcome.erased {
                self.dispatch(ctx, TreeMsg::Prune(container));
            }
        }
        trace!(target: "frame", root = label, ?status, "root done");
        self.drain_retired(ctx);
        id
    }

    /// Show the caller-owned container `label`.
    ///
    /// A docked container is laid out by its root, so this only keeps its
    /// registration alive. A floating one is shown as its own window, can be
    /// dragged onto a root, and releases its tabs when closed.
    pub fn open_container(
        &mut self,
        ctx: &mut FrameContext<'_>,
        label: &str,
        mut open: Option<&mut bool>,
        flags: WindowFlags,
        dock_flags: DockFlags,
    ) -> NodeId {
        let id = self.model.registry.find_or_create(label, Kind::Container);
        let Some(node) = self.model.node_mut(id) else {
            return id;
        };
        node.dock_flags = dock_flags;
        if node.status == Status::Docked {
            return id;
        }

        let forced = std::mem::take(&mut node.control_this_frame);
        let has_tab = node.current_tab().is_some();
        let (pos, size, collapsed) = (node.pos, node.size, node.collapsed);
        let (min, auto) = view::subtree_sizes(&self.model, id);
        let mut window_flags = flags;
        if has_tab {
            window_flags |= WindowFlags::NO_RESIZE;
        }

        let state = ctx.host.begin_window(&WindowSpec {
            label,
            pos: forced.then_some(pos),
            size: forced.then_some(size),
            collapsed: forced.then_some(collapsed),
            min_size: min,
            content_size: Some(auto),
            flags: window_flags,
            closable: open.is_some(),
            transparent: has_tab || dock_flags.contains(DockFlags::TRANSPARENT),
            ..Default::default()
        });
        if !state.open {
            close_flag(&mut open);
        }
        let window = state.id;
        self.model.registry.bind_window(id, window);
        let moving = ctx.is_moving(window);

        let mut was_dragged = false;
        if let Some(node) = self.model.node_mut(id) {
            node.pos = state.pos;
            node.size = state.size;
            node.title_bar_height = state.title_bar_height;
            node.flags = flags;
            node.collapsed = state.collapsed;
            node.closable = open.is_some();
            node.parent = None;
            node.root = None;
            node.save_detached_state();
            was_dragged = node.status == Status::Dragged;
        }

        let drop = if !moving && was_dragged {
            self.drop_plan(ctx, Kind::Container)
        } else {
            None
        };
        if moving {
            self.mark_dragged(id);
            self.show_drop_feedback(ctx, Kind::Container);
        } else if let Some((target, plan)) = drop {
            debug!(target: "frame", container = label, zone = ?plan.zone, "dropped container");
            self.dispatch(
                ctx,
                TreeMsg::DockAt {
                    target,
                    node: id,
                    zone: plan.zone,
                },
            );
        } else {
            self.settle(id, &open, state.collapsed);
        }

        let Some(node) = self.model.node(id) else {
            ctx.host.end_window();
            return id;
        };
        let status = node.status;
        if status == Status::Closed && !node.children.is_empty() {
            self.dispatch(ctx, TreeMsg::ClearContainer(id));
        }

        if status != Status::Docked {
            view::draw_container(&mut self.model, ctx, id, flags.contains(WindowFlags::NO_RESIZE));
            let tab_window = self
                .model
                .node(id)
                .and_then(|n| n.current_tab())
                .and_then(|t| self.model.node(t))
                .and_then(|t| t.window);
            if let Some(tab_window) = tab_window {
                if ctx.input.mouse_clicked && ctx.hovered_window() == Some(window) {
                    view::focus_container(&self.model, ctx, id, true);
                }
                host::place_window(ctx.host.z_order_mut(), window, tab_window, 1);
            }
        }
        ctx.host.end_window();
        trace!(target: "frame", container = label, ?status, "container done");

        self.drain_retired(ctx);
        id
    }

    // ========================================================================
    // Leaves
    // ========================================================================

    /// Begin the dockable window `label`. Always pair with [`end_leaf`].
    ///
    /// `once_container` docks the leaf into that container the first time
    /// the label is seen. Returns whether the caller should draw content.
    ///
    /// [`end_leaf`]: Docking::end_leaf
    pub fn begin_leaf(
        &mut self,
        ctx: &mut FrameContext<'_>,
        label: &str,
        mut open: Option<&mut bool>,
        flags: WindowFlags,
        dock_flags: DockFlags,
        once_container: Option<NodeId>,
    ) -> bool {
        let is_new = !self.model.registry.contains_label(label);
        let id = self.model.registry.find_or_create(label, Kind::Leaf);
        self.current_leaf = Some(id);
        if is_new {
            if let Some(container) = once_container {
                self.dispatch(
                    ctx,
                    TreeMsg::Dock {
                        container,
                        leaf: id,
                        index: None,
                    },
                );
                view::show_tab_window(
                    &mut self.model,
                    id,
                    container,
                    flags.contains(WindowFlags::NO_RESIZE),
                );
            }
        }

        let mut close_requested = false;
        let mut docked = false;
        if let Some(node) = self.model.node_mut(id) {
            node.dock_flags = dock_flags;
            node.closable = open.is_some();
            if let Some(data) = node.leaf_mut() {
                close_requested = std::mem::take(&mut data.close_requested);
            }
            docked = node.status == Status::Docked;
        }
        if close_requested {
            close_flag(&mut open);
        }
        if !is_open(&open) && docked {
            self.dispatch(ctx, TreeMsg::Close(id));
        }

        let state = self.begin_leaf_window(ctx, id, label, &open, flags);
        if !state.open {
            close_flag(&mut open);
        }
        let window = state.id;
        let moving = ctx.is_moving(window);
        let status = self.model.node(id).map_or(Status::None, |n| n.status);

        let drop = if !moving && status == Status::Dragged {
            self.drop_plan(ctx, Kind::Leaf)
        } else {
            None
        };
        if moving {
            self.mark_dragged(id);
            self.show_drop_feedback(ctx, Kind::Leaf);
        } else if let Some((target, plan)) = drop {
            debug!(target: "frame", leaf = label, zone = ?plan.zone, "dropped leaf");
            let msg = match plan.zone {
                DropZone::Full => TreeMsg::Dock {
                    container: target,
                    leaf: id,
                    index: None,
                },
                DropZone::Tab(i) => TreeMsg::Dock {
                    container: target,
                    leaf: id,
                    index: Some(i),
                },
                zone @ DropZone::Edge(_) => TreeMsg::DockAt {
                    target,
                    node: id,
                    zone,
                },
            };
            self.dispatch(ctx, msg);
        } else if status != Status::Docked {
            self.settle(id, &open, state.collapsed);
        }

        // Docked content: a click focuses the container, and the leaf stays
        // right above it in the window stack
        let parent = self
            .model
            .node(id)
            .filter(|n| n.status == Status::Docked && !n.hidden)
            .and_then(|n| n.parent);
        if let Some(parent) = parent {
            if ctx.input.mouse_clicked && ctx.hovered_window() == Some(window) {
                view::focus_container(&self.model, ctx, parent, true);
            }
            self.stack_over_container(ctx, id, parent, flags);
        }

        self.drain_retired(ctx);
        self.model
            .node(id)
            .is_some_and(|n| !n.collapsed && n.status != Status::Closed)
    }

    /// Close the window opened by the last [`begin_leaf`].
    ///
    /// [`begin_leaf`]: Docking::begin_leaf
    pub fn end_leaf(&mut self, ctx: &mut FrameContext<'_>) {
        ctx.host.end_window();
        self.current_leaf = None;
    }

    /// Begin the host window of a leaf according to its docking state and
    /// copy the resulting geometry back
    fn begin_leaf_window(
        &mut self,
        ctx: &mut FrameContext<'_>,
        id: NodeId,
        label: &str,
        open: &Option<&mut bool>,
        flags: WindowFlags,
    ) -> WindowState {
        let mut spec = WindowSpec {
            label,
            flags,
            closable: open.is_some(),
            hidden: !is_open(open),
            ..Default::default()
        };
        let Some(node) = self.model.node_mut(id) else {
            return ctx.host.begin_window(&spec);
        };
        spec.transparent = node.dock_flags.contains(DockFlags::TRANSPARENT);
        let status = node.status;
        let forced = status == Status::Docked || std::mem::take(&mut node.control_this_frame);
        if forced {
            spec.pos = Some(node.pos);
            spec.size = Some(node.size);
            spec.collapsed = Some(node.collapsed);
        }

        if status == Status::Docked {
            // The container decides flags and visibility
            spec.flags = node.flags | WindowFlags::NO_RESIZE;
            spec.hidden = node.hidden;
            spec.closable = false;
            let hidden = node.hidden;
            let state = ctx.host.begin_window(&spec);
            self.model.registry.bind_window(id, state.id);
            self.fill_leaf(id, &state, None);
            if !hidden {
                self.leaf_grips(ctx, id, state.id);
            }
            return state;
        }

        // A forced floating leaf was just taken out of a container, which
        // may have lost its last tab
        let released_from = node.parent.take().filter(|_| forced);
        node.root = None;
        let state = ctx.host.begin_window(&spec);
        self.model.registry.bind_window(id, state.id);

        if let Some(container) = released_from {
            self.dispatch(ctx, TreeMsg::Prune(container));
        }
        if forced && status == Status::Dragged {
            ctx.requests.move_window = Some(state.id);
        }
        self.fill_leaf(id, &state, Some(flags));
        if !forced {
            if let Some(node) = self.model.node_mut(id) {
                node.save_detached_state();
            }
        }
        state
    }

    /// Copy window geometry into the leaf. `flags` is `None` for a docked
    /// leaf, whose flags belong to its container.
    fn fill_leaf(&mut self, id: NodeId, state: &WindowState, flags: Option<WindowFlags>) {
        let parent_root = self
            .model
            .node(id)
            .filter(|n| n.status == Status::Docked)
            .and_then(|n| n.parent)
            .and_then(|p| self.model.node(p))
            .and_then(|p| p.root);
        let Some(node) = self.model.node_mut(id) else {
            return;
        };
        node.pos = state.pos;
        node.size = state.size;
        node.collapsed = state.collapsed;
        node.title_bar_height = state.title_bar_height;
        node.content_size = state.content_size;
        match flags {
            Some(flags) => node.flags = flags,
            None => node.root = parent_root,
        }
    }

    /// Resize and lift grips drawn inside a visible docked leaf
    fn leaf_grips(&mut self, ctx: &mut FrameContext<'_>, id: NodeId, window: WindowId) {
        let Some(node) = self.model.node(id) else {
            return;
        };
        let label = node.label.clone();
        let resizable = !node.flags.contains(WindowFlags::NO_RESIZE);
        let Some(parent) = node.parent.and_then(|p| self.model.node(p)) else {
            return;
        };
        let parent_id = parent.id;
        let parent_window = parent.window;
        let parent_resizable = !parent.flags.contains(WindowFlags::NO_RESIZE);
        let lift_allowed =
            !parent.automatic && !parent.dock_flags.contains(DockFlags::NO_LIFT_CONTAINER);
        let root = parent
            .root
            .and_then(|r| self.model.node(r))
            .filter(|r| r.is_root())
            .map(|r| (r.id, r.window, !r.flags.contains(WindowFlags::NO_RESIZE)));

        match root {
            Some((root_id, root_window, root_resizable)) => {
                if let Some(root_window) = root_window.filter(|_| root_resizable && resizable) {
                    let grip = ctx.host.resize_grip(&label, window, root_window);
                    if grip.double_clicked {
                        self.dispatch(ctx, TreeMsg::ResetSliders(root_id));
                    }
                }
                if lift_allowed && ctx.host.lift_grip(&label, window) {
                    let pointer = ctx.input.pointer;
                    self.dispatch(
                        ctx,
                        TreeMsg::Lift {
                            container: parent_id,
                            pointer,
                        },
                    );
                }
            }
            None => {
                // Floating container: the tab resizes its window
                if let Some(parent_window) = parent_window.filter(|_| parent_resizable && resizable) {
                    ctx.host.resize_grip(&label, window, parent_window);
                }
            }
        }
    }

    fn stack_over_container(
        &mut self,
        ctx: &mut FrameContext<'_>,
        leaf: NodeId,
        container: NodeId,
        flags: WindowFlags,
    ) {
        let Some(leaf_window) = self.model.node(leaf).and_then(|n| n.window) else {
            return;
        };
        let Some(holder) = self.model.node(container) else {
            return;
        };
        let Some(container_window) = holder.window else {
            return;
        };
        let holder_flags = holder
            .root
            .and_then(|r| self.model.node(r))
            .filter(|r| r.is_root())
            .map_or(holder.flags, |r| r.flags);
        let stack = ctx.host.z_order_mut();
        if (holder_flags | flags).contains(WindowFlags::NO_BRING_TO_FRONT_ON_FOCUS) {
            host::place_window(stack, container_window, leaf_window, 1);
        } else {
            host::place_window(stack, leaf_window, container_window, -1);
        }
    }

    // ========================================================================
    // Dragging
    // ========================================================================

    fn mark_dragged(&mut self, id: NodeId) {
        if let Some(node) = self.model.node_mut(id) {
            node.status = Status::Dragged;
            node.hoverable = false;
        }
    }

    /// Container under the pointer and where `dragged` would land in it
    fn drop_plan(&self, ctx: &FrameContext<'_>, dragged: Kind) -> Option<(NodeId, view::DropPlan)> {
        let pointer = ctx.input.pointer;
        let target = view::hovered_node(&self.model, &*ctx.host, pointer, Some(Kind::Container))?;
        let plan = view::resolve_drop(&self.model, target, dragged, pointer)?;
        Some((target, plan))
    }

    fn show_drop_feedback(&self, ctx: &mut FrameContext<'_>, dragged: Kind) {
        if let Some((_, plan)) = self.drop_plan(ctx, dragged) {
            ctx.host.draw_drop_target(plan.highlight);
        }
    }

    /// Status of a floating node that is neither dragged nor dropped
    fn settle(&mut self, id: NodeId, open: &Option<&mut bool>, collapsed: bool) {
        let Some(node) = self.model.node_mut(id) else {
            return;
        };
        node.status = if !is_open(open) {
            Status::Closed
        } else if collapsed {
            Status::Collapsed
        } else {
            Status::Open
        };
        node.hoverable = node.status != Status::Closed;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Size a node returns to when it is undocked
    pub fn set_detached_size(&mut self, node: NodeId, size: Vec2) {
        self.apply(TreeMsg::SetDetachedSize { node, size });
    }

    /// Position a node returns to when it is undocked
    pub fn set_detached_position(&mut self, node: NodeId, pos: Vec2) {
        self.apply(TreeMsg::SetDetachedPosition { node, pos });
    }

    /// Relative share of a node inside the split that holds it
    pub fn set_split_weight(&mut self, node: NodeId, weight: f32) {
        self.apply(TreeMsg::SetSplitWeight { node, weight });
    }

    /// Move the splitter on `edge` of a docked node to `position` (0..1)
    pub fn set_slider_position(&mut self, node: NodeId, edge: Edge, position: f32) {
        self.apply(TreeMsg::SetSliderPosition {
            node,
            edge,
            position,
        });
    }

    /// Take a leaf out of its container and mark it closed
    pub fn close(&mut self, ctx: &mut FrameContext<'_>, leaf: NodeId) {
        self.dispatch(ctx, TreeMsg::Close(leaf));
    }

    // ========================================================================
    // Plumbing
    // ========================================================================

    fn dispatch(&mut self, ctx: &mut FrameContext<'_>, msg: TreeMsg) {
        if let Some(cmd) = update(&mut self.model, msg) {
            commands::run(&self.model, ctx, cmd);
        }
    }

    /// Apply a message whose only effect is on the model
    fn apply(&mut self, msg: TreeMsg) {
        if let Some(cmd) = update(&mut self.model, msg) {
            trace!(target: "frame", ?cmd, "command dropped outside a frame");
        }
    }

    /// Take windows of destroyed nodes out of the host's window stack
    fn drain_retired(&mut self, ctx: &mut FrameContext<'_>) {
        for window in self.model.registry.take_retired_windows() {
            host::remove_window(ctx.host.z_order_mut(), window);
        }
    }
}

fn is_open(open: &Option<&mut bool>) -> bool {
    open.as_deref().map_or(true, |o| *o)
}

fn close_flag(open: &mut Option<&mut bool>) {
    if let Some(o) = open.as_deref_mut() {
        *o = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{FrameInput, HeadlessHost};

    #[test]
    fn test_open_flag_helpers() {
        let mut flag = true;
        let mut open = Some(&mut flag);
        assert!(is_open(&open));
        close_flag(&mut open);
        assert!(!is_open(&open));
        assert!(!flag);
        assert!(is_open(&None));
    }

    #[test]
    fn test_empty_root_gets_automatic_container() {
        let mut docking = Docking::default();
        let mut host = HeadlessHost::new();
        let mut ctx = FrameContext::new(&mut host, FrameInput::default());
        let root = docking.open_root(&mut ctx, "R", None, WindowFlags::empty(), DockFlags::empty());

        let node = docking.node(root).unwrap();
        assert_eq!(node.children.len(), 1);
        let child = docking.node(node.children[0]).unwrap();
        assert_eq!(child.label, "R__1__");
        assert_eq!(child.status, Status::Docked);
        assert!(docking.describe(root).contains("Container R__1__ Docked"));
    }

    #[test]
    fn test_shutdown_twice() {
        let mut docking = Docking::default();
        let mut host = HeadlessHost::new();
        let mut ctx = FrameContext::new(&mut host, FrameInput::default());
        docking.open_root(&mut ctx, "R", None, WindowFlags::empty(), DockFlags::empty());
        docking.shutdown();
        docking.shutdown();
        assert!(docking.find("R").is_none());
        assert!(docking.model().registry.is_empty());
    }
}
