//! Window stack placement
//!
//! The host's z-order is a back-to-front list of window ids. These helpers
//! keep docked windows stacked root, container, current tab.

use super::WindowId;

/// Move `moved` so it sits at `index(base) + delta` in the stack.
///
/// No-op when either window is missing or `moved` is already in place.
pub fn place_window(stack: &mut Vec<WindowId>, base: WindowId, moved: WindowId, delta: isize) {
    let Some(mut ibase) = stack.iter().position(|&w| w == base) else {
        return;
    };
    let Some(imoved) = stack.iter().position(|&w| w == moved) else {
        return;
    };
    if imoved as isize == ibase as isize + delta {
        return;
    }

    stack.remove(imoved);
    if imoved < ibase {
        ibase -= 1;
    }
    // Below the base, inserting at the base's index pushes the base up one
    let target = if delta > 0 {
        ibase as isize + delta
    } else {
        ibase as isize + delta + 1
    };
    if target > stack.len() as isize {
        stack.push(moved);
    } else {
        stack.insert(target.max(0) as usize, moved);
    }
}

/// Move `window` to the top of the stack
pub fn raise(stack: &mut Vec<WindowId>, window: WindowId) {
    stack.retain(|&w| w != window);
    stack.push(window);
}

/// Raise `window`, or sink it to the bottom if it refuses bring-to-front
pub fn raise_or_sink(stack: &mut Vec<WindowId>, window: WindowId, no_bring_to_front: bool) {
    stack.retain(|&w| w != window);
    if no_bring_to_front && stack.first() != Some(&window) {
        stack.insert(0, window);
    } else {
        stack.push(window);
    }
}

/// Drop a window from the stack entirely
pub fn remove_window(stack: &mut Vec<WindowId>, window: WindowId) {
    stack.retain(|&w| w != window);
}
