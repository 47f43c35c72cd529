//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging tree
//! edits and per-frame layout.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=tree=debug,registry=debug` - scoped filtering
//! - `RUST_LOG=frame=trace` - per-frame passes
//!
//! # Log Files
//!
//! Logs are written to `~/.config/dockwork/logs/dockwork.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use std::fmt::Write as _;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::model::{DockModel, NodeId};

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`). File logging writes
/// to `~/.config/dockwork/logs/dockwork.log` with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console layer - respects RUST_LOG
    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "dockwork.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {:#}", e);
            None
        }
    };

    // A host may have installed its own subscriber already
    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

/// Shape of one or more docking trees, one line per node
///
/// Lines carry depth, kind, label, status and (for splits) slider positions
/// rounded to three decimals, so two snapshots compare equal when the trees
/// match up to float noise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSnapshot {
    pub lines: Vec<String>,
}

impl TreeSnapshot {
    /// Snapshot of the subtree under `root`
    pub fn of_root(model: &DockModel, root: NodeId) -> Self {
        let mut lines = Vec::new();
        push_subtree(model, root, 0, &mut lines);
        Self { lines }
    }

    /// Snapshot of every tree in the registry, ordered by top-level label
    pub fn of_forest(model: &DockModel) -> Self {
        let mut tops: Vec<(String, NodeId)> = model
            .registry
            .ids()
            .filter_map(|id| model.registry.get(id))
            .filter(|n| n.parent.is_none() && !n.children.is_empty())
            .map(|n| (n.label.clone(), n.id))
            .collect();
        tops.sort();

        let mut lines = Vec::new();
        for (_, id) in tops {
            push_subtree(model, id, 0, &mut lines);
        }
        Self { lines }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &TreeSnapshot) -> Option<String> {
        if self == other {
            return None;
        }
        let mut changes = Vec::new();
        for line in &self.lines {
            if !other.lines.contains(line) {
                changes.push(format!("-{}", line.trim_start()));
            }
        }
        for line in &other.lines {
            if !self.lines.contains(line) {
                changes.push(format!("+{}", line.trim_start()));
            }
        }
        if changes.is_empty() {
            // Same lines, different order
            changes.push("reordered".to_string());
        }
        Some(changes.join("; "))
    }
}

impl std::fmt::Display for TreeSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

fn push_subtree(model: &DockModel, id: NodeId, depth: usize, lines: &mut Vec<String>) {
    let Some(node) = model.registry.get(id) else {
        return;
    };
    let mut line = format!("{}{:?} {} {:?}", "  ".repeat(depth), node.kind(), node.label, node.status);
    if node.is_split() {
        let sliders: Vec<String> = node.sliders().iter().map(|s| format!("{:.3}", s)).collect();
        let _ = write!(line, " [{}]", sliders.join(" "));
    }
    if let Some(tab) = node.current_tab().and_then(|t| model.registry.get(t)) {
        let _ = write!(line, " current={}", tab.label);
    }
    lines.push(line);
    for &child in &node.children {
        push_subtree(model, child, depth + 1, lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Kind;

    #[test]
    fn test_diff_reports_added_and_removed_lines() {
        let before = TreeSnapshot {
            lines: vec!["Root R Open".into(), "  Container R__1__ Docked".into()],
        };
        let after = TreeSnapshot {
            lines: vec!["Root R Open".into(), "  Container R__2__ Docked".into()],
        };
        let diff = before.diff(&after).unwrap();
        assert!(diff.contains("-Container R__1__"));
        assert!(diff.contains("+Container R__2__"));
        assert_eq!(before.diff(&before), None);
    }

    #[test]
    fn test_snapshot_lists_children_indented() {
        let mut model = DockModel::default();
        let root = model.registry.find_or_create("R", Kind::Root);
        crate::update::fill_empty(&mut model, root);
        let snapshot = TreeSnapshot::of_root(&model, root);
        assert_eq!(snapshot.lines.len(), 2);
        assert!(snapshot.lines[1].starts_with("  Container R__1__"));
    }
}
