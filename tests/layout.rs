//! Split geometry, splitters and grips of a laid-out root

mod common;

use common::{held, idle, leaf, released, root, root_with_tabs, Harness};
use dockwork::model::geometry::Vec2;
use dockwork::{DockFlags, WindowFlags};

const SPLIT_BAR: &str = "R__3____s1__";

fn assert_close(got: f32, want: f32) {
    assert!((got - want).abs() < 1e-3, "got {got}, expected {want}");
}

fn frame_ab(h: &mut Harness, input: dockwork::FrameInput) {
    h.frame(input, |d, ctx| {
        root(d, ctx, "R");
        leaf(d, ctx, "A", None);
        leaf(d, ctx, "B", None);
    });
}

/// Root "R" split side by side: A in R__1__ on the left, B in R__2__ on
/// the right, under split R__3__
fn side_by_side() -> Harness {
    let mut h = root_with_tabs(&["A"]);
    frame_ab(&mut h, idle());
    let b_window = h.host.window_id("B");
    let pointer = Vec2::new(450.0, 220.0);
    frame_ab(&mut h, held(pointer, b_window));
    frame_ab(&mut h, released(pointer));
    frame_ab(&mut h, idle());
    h
}

#[test]
fn test_split_children_share_the_root() {
    let h = side_by_side();
    let model = h.docking.model();

    let left = model.find("R__1__").unwrap();
    let right = model.find("R__2__").unwrap();
    assert_close(left.pos.x, 60.0);
    assert_close(left.size.x, 198.0);
    assert_close(right.pos.x, 262.0);
    assert_close(right.size.x, 198.0);
    assert_close(left.size.y, 280.0);
    assert_close(right.size.y, 280.0);

    // The visible tab sits below the tab bar of its pane
    let b = model.find("B").unwrap();
    assert_close(b.pos.x, 262.0);
    assert_close(b.pos.y + b.size.y, 360.0);
}

#[test]
fn test_splitter_is_drawn_between_children() {
    let h = side_by_side();
    let bars: Vec<_> = h.host.bars_drawn.iter().filter(|b| b.0 == SPLIT_BAR).collect();
    assert_eq!(bars.len(), 1);
    let (_, rect, min, max) = bars[0];
    assert_close(rect.x, 258.0);
    assert_close(rect.width, 4.0);
    assert!(min < &rect.x && &rect.x < max);
}

#[test]
fn test_dragging_the_splitter_moves_the_slider() {
    let mut h = side_by_side();
    h.host.script_bar(SPLIT_BAR, 296.0);
    frame_ab(&mut h, idle());

    let model = h.docking.model();
    let split = model.find("R__3__").unwrap();
    assert_close(split.sliders()[1], 0.595);
    // The geometry pass of the same frame already uses it
    assert_close(model.find("R__2__").unwrap().pos.x, 300.0);
}

#[test]
fn test_only_bottom_right_tab_gets_resize_grip() {
    let h = side_by_side();
    assert!(h.host.resize_grips.contains(&"B".to_string()));
    assert!(!h.host.resize_grips.contains(&"A".to_string()));
}

#[test]
fn test_grip_double_click_resets_sliders() {
    let mut h = side_by_side();
    h.host.script_bar(SPLIT_BAR, 296.0);
    frame_ab(&mut h, idle());
    h.host.script_grip_double_click("B");
    frame_ab(&mut h, idle());

    let split = h.docking.model().find("R__3__").unwrap();
    assert_close(split.sliders()[1], 0.5);
}

#[test]
fn test_empty_pane_resizes_its_root() {
    let mut h = Harness::new();
    h.frame(idle(), |d, ctx| {
        root(d, ctx, "R");
    });
    assert_eq!(h.host.resize_grips, vec!["R__1__".to_string()]);

    h.frame(idle(), |d, ctx| {
        d.open_root(ctx, "R", None, WindowFlags::NO_RESIZE, DockFlags::empty());
    });
    assert!(h.host.resize_grips.is_empty());
}

#[test]
fn test_root_window_never_smaller_than_its_content() {
    let mut h = side_by_side();
    h.host.set_window_size("R", Vec2::new(10.0, 10.0));
    frame_ab(&mut h, idle());

    let window = h.host.window("R").unwrap();
    assert!(window.size.x >= 64.0, "size {:?}", window.size);
    assert!(window.size.y >= 32.0, "size {:?}", window.size);
}
