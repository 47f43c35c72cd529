//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use dockwork::host::{FrameInput, FrameRequests, HeadlessHost};
use dockwork::model::geometry::Vec2;
use dockwork::model::{DockModel, Kind, NodeId};
use dockwork::update::{fill_empty, new_dock};
use dockwork::{DockFlags, Docking, FrameContext, WindowFlags};

/// A model holding one root `label` with its automatic container
pub fn root_model(label: &str) -> (DockModel, NodeId, NodeId) {
    let mut model = DockModel::default();
    let root = model.registry.find_or_create(label, Kind::Root);
    fill_empty(&mut model, root);
    let pane = model.registry.children(root)[0];
    (model, root, pane)
}

/// Create leaf `label` and dock it as the last tab of `container`
pub fn dock_leaf(model: &mut DockModel, container: NodeId, label: &str) -> NodeId {
    let leaf = model.registry.find_or_create(label, Kind::Leaf);
    new_dock(model, container, leaf, None);
    leaf
}

/// Labels of a node's children, in stack order
pub fn labels(model: &DockModel, id: NodeId) -> Vec<String> {
    model.child_labels(id)
}

pub fn id_of(model: &DockModel, label: &str) -> NodeId {
    model
        .registry
        .find(label)
        .unwrap_or_else(|| panic!("no node labelled {label:?}"))
}

pub fn assert_sliders(model: &DockModel, split: NodeId, expected: &[f32]) {
    let sliders = model.registry.get(split).unwrap().sliders().to_vec();
    assert_eq!(sliders.len(), expected.len(), "sliders {sliders:?}");
    for (got, want) in sliders.iter().zip(expected) {
        assert!((got - want).abs() < 1e-4, "sliders {sliders:?}, expected {expected:?}");
    }
}

// ============================================================================
// Frame harness
// ============================================================================

/// Docking state plus a headless host, driven one frame at a time
pub struct Harness {
    pub docking: Docking,
    pub host: HeadlessHost,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            docking: Docking::default(),
            host: HeadlessHost::new(),
        }
    }

    /// Run one frame with `input` and return what it asked of the host
    pub fn frame(
        &mut self,
        input: FrameInput,
        body: impl FnOnce(&mut Docking, &mut FrameContext<'_>),
    ) -> FrameRequests {
        self.host.next_frame();
        let mut ctx = FrameContext::new(&mut self.host, input);
        body(&mut self.docking, &mut ctx);
        ctx.take_requests()
    }

    pub fn id(&self, label: &str) -> NodeId {
        id_of(self.docking.model(), label)
    }

    pub fn labels(&self, label: &str) -> Vec<String> {
        labels(self.docking.model(), self.id(label))
    }
}

pub fn idle() -> FrameInput {
    FrameInput::default()
}

/// Pointer held down at `pointer`, with the host moving `moving` if any
pub fn held(pointer: Vec2, moving: Option<dockwork::host::WindowId>) -> FrameInput {
    FrameInput {
        pointer,
        mouse_down: true,
        moving_window: moving,
        ..Default::default()
    }
}

/// Pointer released at `pointer`
pub fn released(pointer: Vec2) -> FrameInput {
    FrameInput {
        pointer,
        ..Default::default()
    }
}

pub fn root(docking: &mut Docking, ctx: &mut FrameContext<'_>, label: &str) -> NodeId {
    docking.open_root(ctx, label, None, WindowFlags::empty(), DockFlags::empty())
}

/// Begin and end a leaf; returns what `begin_leaf` returned
pub fn leaf(
    docking: &mut Docking,
    ctx: &mut FrameContext<'_>,
    label: &str,
    once_container: Option<NodeId>,
) -> bool {
    let shown = docking.begin_leaf(
        ctx,
        label,
        None,
        WindowFlags::empty(),
        DockFlags::empty(),
        once_container,
    );
    docking.end_leaf(ctx);
    shown
}

/// Same as [`leaf`] with a caller-owned open flag
pub fn closable_leaf(
    docking: &mut Docking,
    ctx: &mut FrameContext<'_>,
    label: &str,
    open: &mut bool,
    once_container: Option<NodeId>,
) -> bool {
    let shown = docking.begin_leaf(
        ctx,
        label,
        Some(open),
        WindowFlags::empty(),
        DockFlags::empty(),
        once_container,
    );
    docking.end_leaf(ctx);
    shown
}

/// Root "R" holding the leaves `tabs` in its automatic container, after
/// one settling frame so the tab bar has been laid out
pub fn root_with_tabs(tabs: &[&str]) -> Harness {
    let mut h = Harness::new();
    h.frame(idle(), |d, ctx| {
        let r = root(d, ctx, "R");
        let pane = d.node(r).unwrap().children[0];
        for tab in tabs {
            leaf(d, ctx, tab, Some(pane));
        }
    });
    h.frame(idle(), |d, ctx| {
        root(d, ctx, "R");
        for tab in tabs {
            leaf(d, ctx, tab, None);
        }
    });
    h
}
