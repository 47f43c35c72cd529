//! Host boundary
//!
//! The docking engine never draws or reads input itself. Everything it needs
//! from the immediate-mode GUI it runs inside goes through the [`Host`]
//! trait, and everything it wants the host to do afterwards is written into
//! [`FrameRequests`].

pub mod headless;
pub mod zorder;

use bitflags::bitflags;

use crate::model::geometry::{Rect, Vec2};
use crate::model::SplitAxis;

pub use headless::HeadlessHost;
pub use zorder::{place_window, raise, raise_or_sink, remove_window};

/// Opaque handle of a host window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

bitflags! {
    /// Window behavior flags passed through to the host
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WindowFlags: u32 {
        const NO_TITLE_BAR = 1 << 0;
        const NO_RESIZE = 1 << 1;
        const NO_MOVE = 1 << 2;
        const NO_SCROLLBAR = 1 << 3;
        const NO_SCROLL_WITH_MOUSE = 1 << 4;
        const NO_COLLAPSE = 1 << 5;
        const NO_SAVED_SETTINGS = 1 << 6;
        const NO_INPUTS = 1 << 7;
        const NO_BRING_TO_FRONT_ON_FOCUS = 1 << 8;
        const HORIZONTAL_SCROLLBAR = 1 << 9;
    }
}

bitflags! {
    /// Docking-specific behavior flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DockFlags: u32 {
        /// A docked container may not be lifted out of its root
        const NO_LIFT_CONTAINER = 1 << 0;
        /// Draw the window background transparent (input is unaffected)
        const TRANSPARENT = 1 << 1;
    }
}

// ============================================================================
// Per-frame input and requests
// ============================================================================

/// Pointer and focus state for the current frame, as reported by the host
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub pointer: Vec2,
    pub mouse_down: bool,
    /// Primary button went down this frame
    pub mouse_clicked: bool,
    pub mouse_double_clicked: bool,
    /// Window the host is currently dragging by its title bar
    pub moving_window: Option<WindowId>,
    pub hovered_window: Option<WindowId>,
    /// Some widget owns the pointer (a slider, a text field, ...)
    pub any_item_active: bool,
}

/// What the engine wants the host to do once the frame's calls are done
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameRequests {
    /// Start (or keep) moving this window with the pointer
    pub move_window: Option<WindowId>,
    /// Treat this window as hovered and focused
    pub focus_window: Option<WindowId>,
    /// A double click was used up; later widgets should not see it
    pub consume_double_click: bool,
}

/// Everything one Public Frame API call needs from the host
pub struct FrameContext<'h> {
    pub host: &'h mut dyn Host,
    pub input: FrameInput,
    pub requests: FrameRequests,
}

impl<'h> FrameContext<'h> {
    pub fn new(host: &'h mut dyn Host, input: FrameInput) -> Self {
        Self {
            host,
            input,
            requests: FrameRequests::default(),
        }
    }

    /// Window being moved this frame, counting moves requested earlier in it
    pub fn moving_window(&self) -> Option<WindowId> {
        self.requests.move_window.or(self.input.moving_window)
    }

    /// Whether `window` is being dragged by the pointer right now
    pub fn is_moving(&self, window: WindowId) -> bool {
        self.input.mouse_down && self.moving_window() == Some(window)
    }

    pub fn hovered_window(&self) -> Option<WindowId> {
        self.requests.focus_window.or(self.input.hovered_window)
    }

    pub fn double_clicked(&self) -> bool {
        self.input.mouse_double_clicked && !self.requests.consume_double_click
    }

    /// Take the requests accumulated so far, leaving the context clean
    pub fn take_requests(&mut self) -> FrameRequests {
        std::mem::take(&mut self.requests)
    }
}

// ============================================================================
// Window begin/end
// ============================================================================

/// Parameters for one `begin_window` call
///
/// `None` fields leave the host's own value alone; `Some` forces it.
#[derive(Debug, Clone, Default)]
pub struct WindowSpec<'a> {
    pub label: &'a str,
    pub pos: Option<Vec2>,
    pub size: Option<Vec2>,
    pub collapsed: Option<bool>,
    pub min_size: Vec2,
    pub content_size: Option<Vec2>,
    pub flags: WindowFlags,
    /// Show a close button; pressing it reports `open == false`
    pub closable: bool,
    pub transparent: bool,
    /// Keep the window in the stack but do not show it
    pub hidden: bool,
}

/// Window state after `begin_window`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowState {
    pub id: WindowId,
    pub pos: Vec2,
    pub size: Vec2,
    /// Collapsed or otherwise not showing content
    pub collapsed: bool,
    /// False when the close button was pressed this frame
    pub open: bool,
    pub title_bar_height: f32,
    pub content_size: Vec2,
}

/// What the resolver needs to know about a window in the z-order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowInfo {
    pub id: WindowId,
    pub rect: Rect,
    pub no_inputs: bool,
    pub child: bool,
    /// Shown this frame or the previous one
    pub active: bool,
}

// ============================================================================
// Widgets
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabResponse {
    pub clicked: bool,
    /// Pressed and dragged away from the tab
    pub dragged: bool,
    pub double_clicked: bool,
    pub close_clicked: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GripResponse {
    pub double_clicked: bool,
}

/// Drop feedback drawn over a container while something is dragged
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropHighlight {
    /// The whole container
    Full(Rect),
    /// Insertion marker at a tab boundary
    TabMarker { x: f32, top: f32, bottom: f32 },
    /// The half of the container the dropped node would take
    Edge(Rect),
}

/// The immediate-mode GUI the docking engine runs inside
pub trait Host {
    fn begin_window(&mut self, spec: &WindowSpec<'_>) -> WindowState;
    fn end_window(&mut self);

    fn window_info(&self, id: WindowId) -> Option<WindowInfo>;

    /// Window stack, back to front
    fn z_order(&self) -> &[WindowId];
    fn z_order_mut(&mut self) -> &mut Vec<WindowId>;

    /// A tab button inside the current window
    fn tab_button(&mut self, id: &str, rect: Rect, selected: bool, closable: bool) -> TabResponse;

    /// A draggable splitter inside `window`. `bar` is the splitter's current
    /// rectangle; returns its new leading coordinate along `axis`, kept
    /// within `[min, max]`.
    fn sliding_bar(
        &mut self,
        id: &str,
        window: WindowId,
        bar: Rect,
        min: f32,
        max: f32,
        axis: SplitAxis,
    ) -> f32;

    /// Bottom-right grip inside `window` that resizes `target`
    fn resize_grip(&mut self, id: &str, window: WindowId, target: WindowId) -> GripResponse;

    /// Grip inside `window` that lifts its container out of the root
    fn lift_grip(&mut self, id: &str, window: WindowId) -> bool;

    fn draw_drop_target(&mut self, highlight: DropHighlight);
}
