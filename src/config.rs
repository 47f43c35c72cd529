//! Docking style configuration
//!
//! Widget metrics live in `~/.config/dockwork/style.yaml`. Every field is
//! optional in the file; missing ones take the defaults below.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::geometry::Vec2;

/// Metrics used by the layout passes, the tab bar and the drop-zone resolver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockStyle {
    /// Height of a container tab
    pub tab_height: f32,
    /// Widest a tab gets when there is room
    pub tab_max_width: f32,
    /// Thickness of the splitters between split children
    pub sliding_bar_width: f32,
    /// Offset between windows released in a cascade
    pub cascade_increment: f32,
    /// Inset of the drop zones from the container's client rectangle
    pub drop_target_looseness: f32,
    pub drop_target_min_edge: f32,
    pub drop_target_max_edge: f32,
    /// Edge zone depth as a fraction of the container's smaller side
    pub drop_target_edge_fraction: f32,
    /// Side of the centered full zone as a fraction of the smaller side
    pub drop_target_full_fraction: f32,
    pub window_min_size: Vec2,
    pub window_padding: Vec2,
    /// Extra hit margin around windows
    pub touch_padding: Vec2,
}

impl Default for DockStyle {
    fn default() -> Self {
        Self {
            tab_height: 19.0,
            tab_max_width: 100.0,
            sliding_bar_width: 4.0,
            cascade_increment: 25.0,
            drop_target_looseness: 4.0,
            drop_target_min_edge: 20.0,
            drop_target_max_edge: 20.0,
            drop_target_edge_fraction: 0.1,
            drop_target_full_fraction: 0.4,
            window_min_size: Vec2::new(32.0, 32.0),
            window_padding: Vec2::new(8.0, 8.0),
            touch_padding: Vec2::ZERO,
        }
    }
}

impl DockStyle {
    /// Load the style from the config directory, or defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::style_file() else {
            tracing::debug!("No config directory available, using default style");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Style file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(style) => {
                tracing::info!("Loaded style from {}", path.display());
                style
            }
            Err(e) => {
                tracing::warn!("{:#}", e);
                Self::default()
            }
        }
    }

    /// Read and parse a style file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read style at {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse style at {}", path.display()))
    }

    /// Save to the config directory, creating it if needed
    pub fn save(&self) -> Result<()> {
        let path = crate::config_paths::style_file().context("No config directory available")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory {}", parent.display())
            })?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize style")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write style to {}", path.display()))?;

        tracing::info!("Saved style to {}", path.display());
        Ok(())
    }
}
