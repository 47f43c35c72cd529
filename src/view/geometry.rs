//! Layout math shared by the bar pass and the geometry pass
//!
//! All functions here are pure (no host calls, no tree edits) and can be
//! tested independently of a frame.

use crate::config::DockStyle;
use crate::model::geometry::{Rect, Vec2};
use crate::model::{DockModel, Kind, NodeId, SplitAxis};

// ============================================================================
// Minimum and automatic sizes
// ============================================================================

/// Minimum size and content ("auto") size of a subtree
///
/// Containers need the host's minimum window size plus their tab bar; splits
/// add up their children along the split axis (plus splitters) and take the
/// largest across it.
pub fn subtree_sizes(model: &DockModel, id: NodeId) -> (Vec2, Vec2) {
    let style = &model.style;
    let Some(node) = model.registry.get(id) else {
        return (Vec2::ZERO, Vec2::ZERO);
    };

    match node.kind() {
        Kind::Root => {
            let Some(&child) = node.children.last() else {
                return (Vec2::ZERO, Vec2::ZERO);
            };
            let (min, mut auto) = subtree_sizes(model, child);
            auto.y += node.title_bar_height;
            (min, auto)
        }
        Kind::HSplit | Kind::VSplit => {
            let axis = node.split().map_or(SplitAxis::Horizontal, |s| s.axis);
            let mut min = Vec2::ZERO;
            let mut auto = Vec2::ZERO;
            for &child in &node.children {
                let (child_min, child_auto) = subtree_sizes(model, child);
                min = stack_sizes(axis, min, child_min);
                auto = stack_sizes(axis, auto, child_auto);
            }
            let bars = style.sliding_bar_width * node.children.len().saturating_sub(1) as f32;
            (grow_along(axis, min, bars), grow_along(axis, auto, bars))
        }
        Kind::Container => {
            let mut min = style.window_min_size;
            let mut auto = style.window_min_size + style.window_padding;
            let tab_depth = node.container().map_or(0.0, |c| c.tab_depth);
            if let Some(tab) = node.current_tab().and_then(|t| model.registry.get(t)) {
                min.y += tab_depth;
                auto.x = auto.x.max(tab.content_size.x);
                auto.y = auto.y.max(tab.content_size.y) + tab_depth;
            }
            (min, auto)
        }
        Kind::Leaf => {
            let min = style.window_min_size;
            let auto = (style.window_min_size + style.window_padding).max(node.content_size);
            (min, auto)
        }
    }
}

pub fn min_size(model: &DockModel, id: NodeId) -> Vec2 {
    subtree_sizes(model, id).0
}

fn stack_sizes(axis: SplitAxis, acc: Vec2, child: Vec2) -> Vec2 {
    match axis {
        SplitAxis::Horizontal => Vec2::new(acc.x.max(child.x), acc.y + child.y),
        SplitAxis::Vertical => Vec2::new(acc.x + child.x, acc.y.max(child.y)),
    }
}

fn grow_along(axis: SplitAxis, v: Vec2, amount: f32) -> Vec2 {
    match axis {
        SplitAxis::Horizontal => Vec2::new(v.x, v.y + amount),
        SplitAxis::Vertical => Vec2::new(v.x + amount, v.y),
    }
}

// ============================================================================
// Split geometry
// ============================================================================

/// Start and length of `rect` along `axis`
fn span(rect: Rect, axis: SplitAxis) -> (f32, f32) {
    match axis {
        SplitAxis::Horizontal => (rect.y, rect.height),
        SplitAxis::Vertical => (rect.x, rect.width),
    }
}

/// Copy of `rect` with its span along `axis` replaced
fn with_span(rect: Rect, axis: SplitAxis, start: f32, len: f32) -> Rect {
    match axis {
        SplitAxis::Horizontal => Rect::new(rect.x, start, rect.width, len),
        SplitAxis::Vertical => Rect::new(start, rect.y, len, rect.height),
    }
}

/// Rectangle of child `i` of a split covering `rect`.
///
/// Internal boundaries leave half a splitter on each side.
pub fn split_child_rect(rect: Rect, axis: SplitAxis, sliders: &[f32], i: usize, bar: f32) -> Rect {
    let count = sliders.len().saturating_sub(1);
    if i >= count {
        return rect;
    }
    let (x0, len) = span(rect, axis);
    let half = 0.5 * bar;
    let start = x0 + sliders[i] * len + if i == 0 { 0.0 } else { half };
    let inset = if i == 0 || i == count - 1 { half } else { bar };
    let size = ((sliders[i + 1] - sliders[i]) * len - inset).max(0.0);
    with_span(rect, axis, start, size)
}

/// Placement of the splitter between children `n - 1` and `n`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarPlacement {
    pub rect: Rect,
    /// Smallest leading coordinate that keeps child `n - 1` at its minimum
    pub min: f32,
    /// Largest leading coordinate that keeps child `n` at its minimum
    pub max: f32,
}

/// Where splitter `n` (1-based, between children `n - 1` and `n`) sits,
/// clamped so both neighbors keep their minimum size
pub fn bar_placement(
    rect: Rect,
    axis: SplitAxis,
    sliders: &[f32],
    n: usize,
    min_prev: Vec2,
    min_next: Vec2,
    bar: f32,
) -> Option<BarPlacement> {
    let count = sliders.len().checked_sub(1)?;
    if n == 0 || n >= count {
        return None;
    }
    let (x0, len) = span(rect, axis);
    let half = 0.5 * bar;

    let min = x0
        + sliders[n - 1] * len
        + if n > 1 { half } else { 0.0 }
        + axis.along(min_prev);
    let max = (x0 + sliders[n + 1] * len
        - if n < count - 1 { half } else { 0.0 }
        - bar
        - axis.along(min_next))
    .max(min);
    let pos = (x0 + sliders[n] * len - half).clamp(min, max);

    Some(BarPlacement {
        rect: with_span(rect, axis, pos, bar),
        min,
        max,
    })
}

/// Slider fraction for a splitter whose leading coordinate is `pos`,
/// kept between its neighbors
pub fn slider_from_bar(rect: Rect, axis: SplitAxis, sliders: &[f32], n: usize, pos: f32, bar: f32) -> f32 {
    let (x0, len) = span(rect, axis);
    if len <= 0.0 || n == 0 || n + 1 >= sliders.len() {
        return sliders.get(n).copied().unwrap_or(0.0);
    }
    let fraction = (pos + 0.5 * bar - x0) / len;
    fraction.clamp(sliders[n - 1], sliders[n + 1])
}

// ============================================================================
// Tabs
// ============================================================================

/// Width of each tab in a container `width` wide holding `count` tabs
pub fn tab_width(style: &DockStyle, width: f32, count: usize) -> f32 {
    if count == 0 {
        return 0.0;
    }
    let available = width - 2.0 * style.window_padding.x;
    if available >= count as f32 * style.tab_max_width {
        style.tab_max_width
    } else {
        available.round().max(0.0) / count as f32
    }
}

/// Tab bar rectangle of a container at `pos` that is `width` wide
pub fn tab_bar_rect(style: &DockStyle, pos: Vec2, width: f32) -> Rect {
    Rect::new(
        pos.x,
        pos.y + style.window_padding.y,
        width,
        style.tab_height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const BAR: f32 = 4.0;

    #[test]
    fn test_child_rects_leave_room_for_bars() {
        let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
        let sliders = [0.0, 0.5, 1.0];
        let left = split_child_rect(rect, SplitAxis::Vertical, &sliders, 0, BAR);
        let right = split_child_rect(rect, SplitAxis::Vertical, &sliders, 1, BAR);
        assert_eq!(left, Rect::new(0.0, 0.0, 98.0, 100.0));
        assert_eq!(right, Rect::new(102.0, 0.0, 98.0, 100.0));
    }

    #[test]
    fn test_middle_child_loses_a_full_bar() {
        let rect = Rect::new(0.0, 0.0, 100.0, 300.0);
        let sliders = [0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0];
        let middle = split_child_rect(rect, SplitAxis::Horizontal, &sliders, 1, BAR);
        assert!((middle.y - 102.0).abs() < 1e-3);
        assert!((middle.height - 96.0).abs() < 1e-3);
        assert_eq!(middle.width, 100.0);
    }

    #[test]
    fn test_bar_clamped_by_minimum_sizes() {
        let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
        let sliders = [0.0, 0.1, 1.0];
        let min = Vec2::new(50.0, 20.0);
        let bar = bar_placement(rect, SplitAxis::Vertical, &sliders, 1, min, min, BAR).unwrap();
        assert_eq!(bar.min, 50.0);
        assert_eq!(bar.max, 146.0);
        assert_eq!(bar.rect.x, 50.0);
        assert_eq!(bar.rect.width, BAR);
    }

    #[test]
    fn test_outer_bars_do_not_exist() {
        let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
        let sliders = [0.0, 0.5, 1.0];
        let min = Vec2::ZERO;
        assert!(bar_placement(rect, SplitAxis::Vertical, &sliders, 0, min, min, BAR).is_none());
        assert!(bar_placement(rect, SplitAxis::Vertical, &sliders, 2, min, min, BAR).is_none());
    }

    #[test]
    fn test_slider_from_bar_stays_between_neighbors() {
        let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
        let sliders = [0.0, 0.25, 0.5, 1.0];
        let s = slider_from_bar(rect, SplitAxis::Vertical, &sliders, 1, 58.0, BAR);
        assert!((s - 0.3).abs() < 1e-6);
        let s = slider_from_bar(rect, SplitAxis::Vertical, &sliders, 1, 180.0, BAR);
        assert_eq!(s, 0.5);
    }

    #[test]
    fn test_tab_width_shares_when_crowded() {
        let style = DockStyle::default();
        assert_eq!(tab_width(&style, 400.0, 3), 100.0);
        // 216 - 16 = 200 available for 4 tabs
        assert_eq!(tab_width(&style, 216.0, 4), 50.0);
        assert_eq!(tab_width(&style, 216.0, 0), 0.0);
    }
}
