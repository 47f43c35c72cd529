//! In-memory host for tests and benchmarks
//!
//! Keeps a window table and a z-order, and answers widget queries from
//! scripted responses instead of real input.

use std::collections::{HashMap, HashSet};

use crate::model::geometry::{Rect, Vec2};
use crate::model::SplitAxis;

use super::{
    DropHighlight, GripResponse, Host, TabResponse, WindowFlags, WindowId, WindowInfo, WindowSpec,
    WindowState,
};

/// Title bar height of every headless window that has one
pub const TITLE_BAR_HEIGHT: f32 = 20.0;

const DEFAULT_SIZE: Vec2 = Vec2::new(400.0, 300.0);
const FIRST_WINDOW_POS: Vec2 = Vec2::new(60.0, 60.0);

#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    pub id: WindowId,
    pub label: String,
    pub pos: Vec2,
    pub size: Vec2,
    pub collapsed: bool,
    pub hidden: bool,
    pub flags: WindowFlags,
    pub content_size: Vec2,
    last_frame: u64,
}

/// A host that never draws
#[derive(Debug, Default)]
pub struct HeadlessHost {
    windows: HashMap<WindowId, HeadlessWindow>,
    labels: HashMap<String, WindowId>,
    z_order: Vec<WindowId>,
    open_stack: Vec<WindowId>,
    next_window_id: u64,
    frame: u64,

    tab_responses: HashMap<String, TabResponse>,
    bar_positions: HashMap<String, f32>,
    lift_grips: HashSet<String>,
    grip_double_clicks: HashSet<String>,
    close_clicks: HashSet<String>,
    content_sizes: HashMap<String, Vec2>,

    /// Drop feedback drawn during the current frame
    pub drop_targets: Vec<DropHighlight>,
    /// Tab buttons drawn during the current frame, in draw order
    pub tabs_drawn: Vec<(String, Rect)>,
    /// Splitters drawn during the current frame with their bounds
    pub bars_drawn: Vec<(String, Rect, f32, f32)>,
    /// Windows that got a resize grip this frame
    pub resize_grips: Vec<String>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self {
            next_window_id: 1,
            frame: 1,
            ..Default::default()
        }
    }

    /// Start a new frame: forget per-frame output and unused scripts
    pub fn next_frame(&mut self) {
        self.frame += 1;
        self.drop_targets.clear();
        self.tabs_drawn.clear();
        self.bars_drawn.clear();
        self.resize_grips.clear();
        self.open_stack.clear();
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn window_id(&self, label: &str) -> Option<WindowId> {
        self.labels.get(label).copied()
    }

    pub fn window(&self, label: &str) -> Option<&HeadlessWindow> {
        self.window_id(label).and_then(|id| self.windows.get(&id))
    }

    /// Whether the window was begun during the current frame
    pub fn shown_this_frame(&self, label: &str) -> bool {
        self.window(label)
            .is_some_and(|w| w.last_frame == self.frame && !w.hidden)
    }

    /// Move a window as if the user dragged it
    pub fn set_window_pos(&mut self, label: &str, pos: Vec2) {
        if let Some(w) = self.window_mut(label) {
            w.pos = pos;
        }
    }

    pub fn set_window_size(&mut self, label: &str, size: Vec2) {
        if let Some(w) = self.window_mut(label) {
            w.size = size;
        }
    }

    pub fn set_collapsed(&mut self, label: &str, collapsed: bool) {
        if let Some(w) = self.window_mut(label) {
            w.collapsed = collapsed;
        }
    }

    /// Press the window's close button on its next begin
    pub fn click_close(&mut self, label: &str) {
        self.close_clicks.insert(label.to_string());
    }

    /// Report this content size for the window from its next begin on
    pub fn set_content_size(&mut self, label: &str, size: Vec2) {
        self.content_sizes.insert(label.to_string(), size);
    }

    /// Answer the next `tab_button` call for `id` with `response`
    pub fn script_tab(&mut self, id: &str, response: TabResponse) {
        self.tab_responses.insert(id.to_string(), response);
    }

    /// Answer the next `sliding_bar` call for `id` by moving the bar to `pos`
    pub fn script_bar(&mut self, id: &str, pos: f32) {
        self.bar_positions.insert(id.to_string(), pos);
    }

    pub fn script_lift(&mut self, id: &str) {
        self.lift_grips.insert(id.to_string());
    }

    pub fn script_grip_double_click(&mut self, id: &str) {
        self.grip_double_clicks.insert(id.to_string());
    }

    fn window_mut(&mut self, label: &str) -> Option<&mut HeadlessWindow> {
        let id = self.window_id(label)?;
        self.windows.get_mut(&id)
    }

    fn create_window(&mut self, label: &str) -> WindowId {
        let id = WindowId(self.next_window_id);
        self.next_window_id += 1;
        self.labels.insert(label.to_string(), id);
        self.z_order.push(id);
        id
    }
}

impl HeadlessWindow {
    fn new(id: WindowId, label: &str, cascade_index: usize) -> Self {
        let cascade = 20.0 * (cascade_index % 10) as f32;
        Self {
            id,
            label: label.to_string(),
            pos: FIRST_WINDOW_POS + Vec2::new(cascade, cascade),
            size: DEFAULT_SIZE,
            collapsed: false,
            hidden: false,
            flags: WindowFlags::empty(),
            content_size: Vec2::ZERO,
            last_frame: 0,
        }
    }
}

impl Host for HeadlessHost {
    fn begin_window(&mut self, spec: &WindowSpec<'_>) -> WindowState {
        let id = match self.window_id(spec.label) {
            Some(id) => id,
            None => self.create_window(spec.label),
        };
        let cascade_index = self.windows.len();
        let open = !(spec.closable && self.close_clicks.remove(spec.label));
        let content = self.content_sizes.get(spec.label).copied();
        let frame = self.frame;

        let window = self
            .windows
            .entry(id)
            .or_insert_with(|| HeadlessWindow::new(id, spec.label, cascade_index));
        if let Some(pos) = spec.pos {
            window.pos = pos;
        }
        if let Some(size) = spec.size {
            window.size = size;
        }
        if let Some(collapsed) = spec.collapsed {
            window.collapsed = collapsed;
        }
        if spec.flags.contains(WindowFlags::NO_COLLAPSE) {
            window.collapsed = false;
        }
        window.size = window.size.max(spec.min_size);
        window.flags = spec.flags;
        window.hidden = spec.hidden;
        window.last_frame = frame;
        if let Some(content) = content {
            window.content_size = content;
        }

        let title_bar_height = if spec.flags.contains(WindowFlags::NO_TITLE_BAR) {
            0.0
        } else {
            TITLE_BAR_HEIGHT
        };
        let state = WindowState {
            id,
            pos: window.pos,
            size: window.size,
            collapsed: window.collapsed || window.hidden,
            open,
            title_bar_height,
            content_size: window.content_size,
        };
        self.open_stack.push(id);
        state
    }

    fn end_window(&mut self) {
        self.open_stack.pop();
    }

    fn window_info(&self, id: WindowId) -> Option<WindowInfo> {
        let window = self.windows.get(&id)?;
        let size = if window.collapsed {
            let title = if window.flags.contains(WindowFlags::NO_TITLE_BAR) {
                0.0
            } else {
                TITLE_BAR_HEIGHT
            };
            Vec2::new(window.size.x, title)
        } else {
            window.size
        };
        Some(WindowInfo {
            id,
            rect: Rect::from_pos_size(window.pos, size),
            no_inputs: window.flags.contains(WindowFlags::NO_INPUTS),
            child: false,
            active: window.last_frame + 1 >= self.frame,
        })
    }

    fn z_order(&self) -> &[WindowId] {
        &self.z_order
    }

    fn z_order_mut(&mut self) -> &mut Vec<WindowId> {
        &mut self.z_order
    }

    fn tab_button(&mut self, id: &str, rect: Rect, _selected: bool, closable: bool) -> TabResponse {
        self.tabs_drawn.push((id.to_string(), rect));
        let mut response = self.tab_responses.remove(id).unwrap_or_default();
        if !closable {
            response.close_clicked = false;
        }
        response
    }

    fn sliding_bar(
        &mut self,
        id: &str,
        _window: WindowId,
        bar: Rect,
        min: f32,
        max: f32,
        axis: SplitAxis,
    ) -> f32 {
        self.bars_drawn.push((id.to_string(), bar, min, max));
        let current = axis.along(bar.min());
        self.bar_positions
            .remove(id)
            .unwrap_or(current)
            .clamp(min, max.max(min))
    }

    fn resize_grip(&mut self, id: &str, _window: WindowId, _target: WindowId) -> GripResponse {
        self.resize_grips.push(id.to_string());
        GripResponse {
            double_clicked: self.grip_double_clicks.remove(id),
        }
    }

    fn lift_grip(&mut self, id: &str, _window: WindowId) -> bool {
        self.lift_grips.remove(id)
    }

    fn draw_drop_target(&mut self, highlight: DropHighlight) {
        self.drop_targets.push(highlight);
    }
}
