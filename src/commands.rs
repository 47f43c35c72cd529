//! Command types for the Elm-style architecture
//!
//! Tree edits stay pure; anything that touches the host (window stack,
//! drag and focus requests) comes back from `update` as a [`Cmd`] and is
//! run against the frame context by [`run`].

use crate::host::{self, FrameContext};
use crate::model::{DockModel, NodeId};

/// Side effects returned by tree updates
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Raise the node's window, or sink it when it refuses bring-to-front
    RaiseOrSink(NodeId),
    /// Ask the host to move the node's window with the pointer
    BeginDrag(NodeId),
    /// Ask the host to treat the node's window as hovered/focused
    Focus(NodeId),
    /// Hide the current double click from later widgets
    ConsumeDoubleClick,
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands, flattening trivial cases
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        let mut cmds: Vec<Cmd> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Cmd::None,
            1 => cmds.remove(0),
            _ => Cmd::Batch(cmds),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }

    /// `None` for an empty command
    pub fn into_option(self) -> Option<Cmd> {
        if self.is_none() {
            None
        } else {
            Some(self)
        }
    }
}

/// Run a command against the host
pub fn run(model: &DockModel, ctx: &mut FrameContext<'_>, cmd: Cmd) {
    match cmd {
        Cmd::None => {}
        Cmd::RaiseOrSink(id) => {
            if let Some(node) = model.node(id) {
                if let Some(window) = node.window {
                    let sink = node
                        .flags
                        .contains(host::WindowFlags::NO_BRING_TO_FRONT_ON_FOCUS);
                    host::raise_or_sink(ctx.host.z_order_mut(), window, sink);
                }
            }
        }
        Cmd::BeginDrag(id) => {
            if let Some(window) = model.node(id).and_then(|n| n.window) {
                ctx.requests.move_window = Some(window);
            }
        }
        Cmd::Focus(id) => {
            if let Some(window) = model.node(id).and_then(|n| n.window) {
                ctx.requests.focus_window = Some(window);
            }
        }
        Cmd::ConsumeDoubleClick => ctx.requests.consume_double_click = true,
        Cmd::Batch(cmds) => {
            for cmd in cmds {
                run(model, ctx, cmd);
            }
        }
    }
}
