//! Container tab bar
//!
//! Lays out one tab per child, records the tab boundaries the drop resolver
//! uses, and turns tab gestures into tree messages. Gestures are collected
//! while walking the tabs and applied afterwards, so the child list is never
//! edited while it is being walked.

use tracing::trace;

use crate::commands;
use crate::host::FrameContext;
use crate::messages::{TabRelease, TreeMsg};
use crate::model::geometry::Rect;
use crate::model::{DockModel, NodeId};
use crate::update::update;

use super::geometry::{tab_bar_rect, tab_width};

/// Host id of the tab button showing `leaf` inside `container`
pub fn tab_id(container: &str, leaf: &str) -> String {
    format!("{container}__tab__{leaf}")
}

#[derive(Debug, Clone, Copy)]
enum TabAction {
    Select(NodeId),
    Release(NodeId, TabRelease),
}

/// Draw the tab bar of `container` and apply the gestures made on it.
///
/// Returns whether any tab left the container.
pub fn draw_tab_bar(model: &mut DockModel, ctx: &mut FrameContext<'_>, container: NodeId) -> bool {
    let Some(node) = model.registry.get(container) else {
        return false;
    };
    let children = node.children.clone();
    let current = node.current_tab();
    let container_label = node.label.clone();
    let (pos, size) = (node.pos, node.size);

    let style = &model.style;
    let width = tab_width(style, size.x, children.len());
    let bar = tab_bar_rect(style, pos, size.x);
    let left = pos.x + style.window_padding.x;

    let mut tab_xs = Vec::with_capacity(children.len() + 1);
    let mut actions = Vec::new();
    let mut double_click_used = !ctx.double_clicked();

    for (i, &leaf) in children.iter().enumerate() {
        let Some(tab) = model.registry.get(leaf) else {
            continue;
        };
        let x = left + i as f32 * width;
        let rect = Rect::new(x, bar.y, width, bar.height);
        let id = tab_id(&container_label, &tab.label);
        let response = ctx
            .host
            .tab_button(&id, rect, current == Some(leaf), tab.closable);
        tab_xs.push(x);

        if response.clicked {
            actions.push(TabAction::Select(leaf));
        }
        let pointer = ctx.input.pointer;
        if response.dragged {
            actions.push(TabAction::Release(leaf, TabRelease::Drag { pointer }));
        } else if response.double_clicked && !double_click_used {
            double_click_used = true;
            actions.push(TabAction::Release(leaf, TabRelease::Detach { pointer }));
        } else if response.close_clicked {
            actions.push(TabAction::Release(leaf, TabRelease::Close));
        }
    }
    tab_xs.push(left + children.len() as f32 * width);

    if let Some(data) = model.registry.get_mut(container).and_then(|n| n.container_mut()) {
        data.tab_bar = bar;
        data.tab_xs = tab_xs;
    }

    let mut erased = false;
    for action in actions {
        match action {
            TabAction::Select(leaf) => {
                let msg = TreeMsg::SelectTab { container, leaf };
                if let Some(cmd) = update(model, msg) {
                    commands::run(model, ctx, cmd);
                }
                // The tab button owns the click, so the root does not start moving
                super::focus_container(model, ctx, container, false);
            }
            TabAction::Release(leaf, release) => {
                trace!(target: "frame", ?leaf, ?release, "tab released");
                let msg = TreeMsg::ReleaseTab {
                    container,
                    leaf,
                    release,
                };
                if let Some(cmd) = update(model, msg) {
                    commands::run(model, ctx, cmd);
                }
                erased = true;
            }
        }
    }
    erased
}
