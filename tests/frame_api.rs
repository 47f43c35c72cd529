//! Tests for the public frame API, driven through the headless host

mod common;

use common::{closable_leaf, held, idle, leaf, released, root, root_with_tabs, Harness};
use dockwork::host::{DropHighlight, TabResponse};
use dockwork::model::geometry::Vec2;
use dockwork::model::{Kind, Status};
use dockwork::view::tab_id;
use dockwork::{DockFlags, Host, WindowFlags};

// Root "R" is the host's first window: (60, 60), 400 x 300, with a 20px
// title bar. Its automatic pane covers (60, 80) .. (460, 360); the tab bar
// starts 8px lower and tabs are 100px wide from x = 68.
const TAB_Y: f32 = 95.0;

// ============================================================================
// Roots
// ============================================================================

#[test]
fn test_root_is_filled_and_laid_out() {
    let mut h = Harness::new();
    h.frame(idle(), |d, ctx| {
        root(d, ctx, "R");
    });

    let pane = h.docking.model().find("R__1__").unwrap();
    assert_eq!(pane.status, Status::Docked);
    assert_eq!(pane.pos, Vec2::new(60.0, 80.0));
    assert_eq!(pane.size, Vec2::new(400.0, 280.0));
    assert!(h.host.shown_this_frame("R__1__"));

    // The pane sits right above its root
    let stack = h.host.z_order();
    let r = stack.iter().position(|&w| Some(w) == h.host.window_id("R"));
    let p = stack.iter().position(|&w| Some(w) == h.host.window_id("R__1__"));
    assert_eq!(p, r.map(|r| r + 1));
}

#[test]
fn test_closing_root_releases_its_leaves() {
    let mut h = root_with_tabs(&["A", "B"]);
    let mut open = true;
    h.host.click_close("R");
    h.frame(idle(), |d, ctx| {
        d.open_root(ctx, "R", Some(&mut open), WindowFlags::empty(), DockFlags::empty());
        leaf(d, ctx, "A", None);
        leaf(d, ctx, "B", None);
    });

    assert!(!open);
    let model = h.docking.model();
    let r = h.id("R");
    assert!(model.registry.children(r).is_empty());
    assert_eq!(model.find("R").unwrap().status, Status::Closed);
    assert!(model.find("R__1__").is_none());
    for label in ["A", "B"] {
        let node = model.find(label).unwrap();
        assert_eq!(node.status, Status::Open);
        assert_eq!(node.parent, None);
    }

    // The destroyed pane's window left the window stack
    let pane_window = h.host.window_id("R__1__").unwrap();
    assert!(!h.host.z_order().contains(&pane_window));
}

#[test]
fn test_collapsed_root_hides_its_leaves() {
    let mut h = root_with_tabs(&["A"]);
    h.host.set_collapsed("R", true);
    let mut shown = true;
    h.frame(idle(), |d, ctx| {
        root(d, ctx, "R");
        shown = leaf(d, ctx, "A", None);
    });

    assert!(!shown);
    assert!(!h.host.shown_this_frame("A"));
    assert_eq!(h.docking.model().find("R").unwrap().status, Status::Collapsed);
    let pointer = Vec2::new(200.0, 200.0);
    let hovered = dockwork::view::hovered_node(
        h.docking.model(),
        &h.host,
        pointer,
        Some(Kind::Container),
    );
    assert_eq!(hovered, None);
}

// ============================================================================
// Leaves
// ============================================================================

#[test]
fn test_once_container_applies_only_to_new_leaves() {
    let mut h = Harness::new();
    h.frame(idle(), |d, ctx| {
        root(d, ctx, "R");
        leaf(d, ctx, "A", None);
    });
    h.frame(idle(), |d, ctx| {
        let r = root(d, ctx, "R");
        let pane = d.node(r).unwrap().children[0];
        leaf(d, ctx, "A", Some(pane));
        leaf(d, ctx, "B", Some(pane));
    });

    assert_eq!(h.labels("R__1__"), vec!["B"]);
    let a = h.docking.model().find("A").unwrap();
    assert_eq!(a.status, Status::Open);
    assert!(a.hoverable);
}

#[test]
fn test_current_leaf_between_begin_and_end() {
    let mut h = Harness::new();
    h.frame(idle(), |d, ctx| {
        assert_eq!(d.current_leaf(), None);
        d.begin_leaf(ctx, "A", None, WindowFlags::empty(), DockFlags::empty(), None);
        assert_eq!(d.current_leaf(), d.find("A"));
        d.end_leaf(ctx);
        assert_eq!(d.current_leaf(), None);
    });
}

#[test]
fn test_only_current_tab_is_shown() {
    let mut h = root_with_tabs(&["A", "B"]);
    h.frame(idle(), |d, ctx| {
        root(d, ctx, "R");
        assert!(!leaf(d, ctx, "A", None));
        assert!(leaf(d, ctx, "B", None));
    });

    assert!(h.host.shown_this_frame("B"));
    assert!(!h.host.shown_this_frame("A"));
    let tabs: Vec<String> = h.host.tabs_drawn.iter().map(|(id, _)| id.clone()).collect();
    assert_eq!(tabs, vec![tab_id("R__1__", "A"), tab_id("R__1__", "B")]);

    // The visible tab sits under the tab bar
    let pane = h.docking.model().find("R__1__").unwrap();
    let b = h.docking.model().find("B").unwrap();
    assert!(b.pos.y > pane.pos.y);
    assert_eq!(b.pos.y + b.size.y, pane.pos.y + pane.size.y);
    let style = &h.docking.model().style;
    let depth = pane.container().unwrap().tab_depth;
    assert_eq!(depth, style.window_padding.y + style.tab_height);
    assert_eq!(b.pos.y, pane.pos.y + depth);
}

#[test]
fn test_clicking_a_tab_selects_it() {
    let mut h = root_with_tabs(&["A", "B"]);
    h.host.script_tab(
        &tab_id("R__1__", "A"),
        TabResponse {
            clicked: true,
            ..Default::default()
        },
    );
    let requests = h.frame(idle(), |d, ctx| {
        root(d, ctx, "R");
        leaf(d, ctx, "A", None);
        leaf(d, ctx, "B", None);
    });

    let a = h.id("A");
    assert_eq!(h.docking.model().find("R__1__").unwrap().current_tab(), Some(a));
    assert_eq!(requests.focus_window, h.host.window_id("A"));
    // A tab click never starts moving the root
    assert_eq!(requests.move_window, None);
}

#[test]
fn test_tab_close_button_closes_leaf() {
    let mut h = Harness::new();
    let mut open_a = true;
    let mut open_b = true;
    h.frame(idle(), |d, ctx| {
        let r = root(d, ctx, "R");
        let pane = d.node(r).unwrap().children[0];
        closable_leaf(d, ctx, "A", &mut open_a, Some(pane));
        closable_leaf(d, ctx, "B", &mut open_b, Some(pane));
    });
    h.host.script_tab(
        &tab_id("R__1__", "A"),
        TabResponse {
            close_clicked: true,
            ..Default::default()
        },
    );
    h.frame(idle(), |d, ctx| {
        root(d, ctx, "R");
        closable_leaf(d, ctx, "A", &mut open_a, None);
        closable_leaf(d, ctx, "B", &mut open_b, None);
    });

    assert!(!open_a);
    assert!(open_b);
    assert_eq!(h.labels("R__1__"), vec!["B"]);
    assert_eq!(h.docking.model().find("A").unwrap().status, Status::Closed);
}

#[test]
fn test_open_flag_closes_docked_leaf() {
    let mut h = root_with_tabs(&["A", "B"]);
    let mut open = false;
    let mut shown = true;
    h.frame(idle(), |d, ctx| {
        root(d, ctx, "R");
        shown = closable_leaf(d, ctx, "A", &mut open, None);
        leaf(d, ctx, "B", None);
    });

    assert!(!shown);
    assert_eq!(h.labels("R__1__"), vec!["B"]);
    let a = h.docking.model().find("A").unwrap();
    assert_eq!(a.status, Status::Closed);
    assert!(!h.host.shown_this_frame("A"));
}

#[test]
fn test_double_clicked_tab_floats() {
    let mut h = root_with_tabs(&["A", "B"]);
    h.host.script_tab(
        &tab_id("R__1__", "A"),
        TabResponse {
            double_clicked: true,
            ..Default::default()
        },
    );
    let input = dockwork::host::FrameInput {
        pointer: Vec2::new(300.0, TAB_Y),
        mouse_double_clicked: true,
        ..Default::default()
    };
    let requests = h.frame(input, |d, ctx| {
        root(d, ctx, "R");
        leaf(d, ctx, "A", None);
        leaf(d, ctx, "B", None);
    });

    assert!(requests.consume_double_click);
    assert_eq!(h.labels("R__1__"), vec!["B"]);
    let a = h.docking.model().find("A").unwrap();
    assert_eq!(a.status, Status::Open);
    assert_eq!(a.parent, None);
    assert!(h.host.shown_this_frame("A"));
}

// ============================================================================
// Dragging and dropping
// ============================================================================

#[test]
fn test_dragging_tab_past_neighbor_reorders() {
    let mut h = root_with_tabs(&["X", "Y"]);
    assert_eq!(h.labels("R__1__"), vec!["X", "Y"]);

    // Pull X's tab off the bar
    h.host.script_tab(
        &tab_id("R__1__", "X"),
        TabResponse {
            dragged: true,
            ..Default::default()
        },
    );
    let requests = h.frame(held(Vec2::new(120.0, TAB_Y), None), |d, ctx| {
        root(d, ctx, "R");
        leaf(d, ctx, "X", None);
        leaf(d, ctx, "Y", None);
    });
    let x_window = h.host.window_id("X");
    assert_eq!(requests.move_window, x_window);
    assert_eq!(h.labels("R__1__"), vec!["Y"]);
    assert_eq!(h.docking.model().find("X").unwrap().status, Status::Dragged);

    // Carry it past Y's tab; the marker shows where it would land
    h.frame(held(Vec2::new(230.0, TAB_Y), x_window), |d, ctx| {
        root(d, ctx, "R");
        leaf(d, ctx, "X", None);
        leaf(d, ctx, "Y", None);
    });
    assert!(matches!(
        h.host.drop_targets.as_slice(),
        [DropHighlight::TabMarker { x, .. }] if *x == 168.0
    ));

    // Release
    h.frame(released(Vec2::new(230.0, TAB_Y)), |d, ctx| {
        root(d, ctx, "R");
        leaf(d, ctx, "X", None);
        leaf(d, ctx, "Y", None);
    });
    assert_eq!(h.labels("R__1__"), vec!["Y", "X"]);
    let x = h.id("X");
    let pane = h.docking.model().find("R__1__").unwrap();
    assert_eq!(pane.current_tab(), Some(x));
    assert_eq!(h.docking.model().find("X").unwrap().status, Status::Docked);
}

#[test]
fn test_leaf_dropped_on_edge_splits_root() {
    let mut h = root_with_tabs(&["A"]);
    h.frame(idle(), |d, ctx| {
        root(d, ctx, "R");
        leaf(d, ctx, "A", None);
        leaf(d, ctx, "B", None);
    });
    let b_window = h.host.window_id("B");

    // Right edge zone of the pane, halfway down
    let pointer = Vec2::new(450.0, 220.0);
    h.frame(held(pointer, b_window), |d, ctx| {
        root(d, ctx, "R");
        leaf(d, ctx, "A", None);
        leaf(d, ctx, "B", None);
    });
    assert!(matches!(
        h.host.drop_targets.as_slice(),
        [DropHighlight::Edge(rect)] if rect.x == 260.0 && rect.width == 200.0
    ));

    h.frame(released(pointer), |d, ctx| {
        root(d, ctx, "R");
        leaf(d, ctx, "A", None);
        leaf(d, ctx, "B", None);
    });

    let r = h.id("R");
    let model = h.docking.model();
    let split = model.registry.children(r)[0];
    assert_eq!(model.registry.kind(split), Some(Kind::VSplit));
    assert_eq!(common::labels(model, split), vec!["R__1__", "R__2__"]);
    assert_eq!(h.labels("R__2__"), vec!["B"]);
}

#[test]
fn test_release_over_nothing_leaves_node_floating() {
    let mut h = root_with_tabs(&["A"]);
    h.frame(idle(), |d, ctx| {
        root(d, ctx, "R");
        leaf(d, ctx, "A", None);
        leaf(d, ctx, "B", None);
    });
    let b_window = h.host.window_id("B");

    let outside = Vec2::new(900.0, 900.0);
    h.frame(held(outside, b_window), |d, ctx| {
        root(d, ctx, "R");
        leaf(d, ctx, "A", None);
        leaf(d, ctx, "B", None);
    });
    assert!(h.host.drop_targets.is_empty());
    h.frame(released(outside), |d, ctx| {
        root(d, ctx, "R");
        leaf(d, ctx, "A", None);
        leaf(d, ctx, "B", None);
    });

    let b = h.docking.model().find("B").unwrap();
    assert_eq!(b.status, Status::Open);
    assert_eq!(b.parent, None);
    assert_eq!(h.labels("R__1__"), vec!["A"]);
}

/// Floating container "Tools" holding leaf "T", next to root "R"
fn root_and_tools() -> Harness {
    let mut h = Harness::new();
    let frame = |d: &mut dockwork::Docking, ctx: &mut dockwork::FrameContext<'_>| {
        root(d, ctx, "R");
        let tools = d.open_container(ctx, "Tools", None, WindowFlags::empty(), DockFlags::empty());
        leaf(d, ctx, "T", Some(tools));
    };
    h.frame(idle(), frame);
    h.frame(idle(), frame);
    h
}

fn tools_frame(d: &mut dockwork::Docking, ctx: &mut dockwork::FrameContext<'_>) {
    root(d, ctx, "R");
    d.open_container(ctx, "Tools", None, WindowFlags::empty(), DockFlags::empty());
    leaf(d, ctx, "T", None);
}

#[test]
fn test_container_dropped_on_empty_pane_replaces_it() {
    let mut h = root_and_tools();
    let tools_window = h.host.window_id("Tools");
    let pane_window = h.host.window_id("R__1__").unwrap();
    assert_eq!(h.labels("Tools"), vec!["T"]);

    let pointer = Vec2::new(120.0, 300.0);
    h.frame(held(pointer, tools_window), tools_frame);
    assert!(matches!(
        h.host.drop_targets.as_slice(),
        [DropHighlight::Full(_)]
    ));
    h.frame(released(pointer), tools_frame);

    assert_eq!(h.labels("R"), vec!["Tools"]);
    assert!(h.docking.model().find("R__1__").is_none());
    assert!(!h.host.z_order().contains(&pane_window));
    assert_eq!(h.docking.model().find("Tools").unwrap().status, Status::Docked);
    assert_eq!(h.docking.model().find("T").unwrap().status, Status::Docked);

    // Next frame the root lays the container out
    h.frame(idle(), tools_frame);
    let tools = h.docking.model().find("Tools").unwrap();
    assert_eq!(tools.pos, Vec2::new(60.0, 80.0));
    assert_eq!(tools.size, Vec2::new(400.0, 280.0));
}

#[test]
fn test_lift_grip_pulls_container_out_of_root() {
    let mut h = root_and_tools();
    let tools_window = h.host.window_id("Tools");
    let pointer = Vec2::new(120.0, 300.0);
    h.frame(held(pointer, tools_window), tools_frame);
    h.frame(released(pointer), tools_frame);
    h.frame(idle(), tools_frame);

    h.host.script_lift("T");
    let requests = h.frame(held(pointer, None), tools_frame);

    assert_eq!(requests.move_window, tools_window);
    assert!(h.labels("R").is_empty());
    let tools = h.docking.model().find("Tools").unwrap();
    assert_eq!(tools.status, Status::Dragged);
    assert_eq!(tools.parent, None);
    assert_eq!(h.labels("Tools"), vec!["T"]);

    // The emptied root gets a fresh pane
    h.frame(held(pointer, tools_window), tools_frame);
    assert_eq!(h.labels("R"), vec!["R__2__"]);
    assert_eq!(
        h.docking.model().find("Tools").unwrap().status,
        Status::Dragged
    );
}

#[test]
fn test_no_lift_flag_hides_lift_grip() {
    let mut h = root_and_tools();
    let tools_window = h.host.window_id("Tools");
    let pointer = Vec2::new(120.0, 300.0);
    let frame = |d: &mut dockwork::Docking, ctx: &mut dockwork::FrameContext<'_>| {
        root(d, ctx, "R");
        d.open_container(
            ctx,
            "Tools",
            None,
            WindowFlags::empty(),
            DockFlags::NO_LIFT_CONTAINER,
        );
        leaf(d, ctx, "T", None);
    };
    h.frame(held(pointer, tools_window), frame);
    h.frame(released(pointer), frame);
    h.frame(idle(), frame);

    h.host.script_lift("T");
    h.frame(held(pointer, None), frame);
    assert_eq!(h.labels("R"), vec!["Tools"]);
}

#[test]
fn test_closing_floating_container_releases_tabs() {
    let mut h = root_and_tools();
    let mut open = true;
    h.host.click_close("Tools");
    h.frame(idle(), |d, ctx| {
        root(d, ctx, "R");
        d.open_container(ctx, "Tools", Some(&mut open), WindowFlags::empty(), DockFlags::empty());
        leaf(d, ctx, "T", None);
    });

    assert!(!open);
    assert!(h.labels("Tools").is_empty());
    assert_eq!(h.docking.model().find("Tools").unwrap().status, Status::Closed);
    assert_eq!(h.docking.model().find("T").unwrap().status, Status::Open);
}
