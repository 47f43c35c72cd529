//! Dockwork - Elm-style docking for immediate-mode GUIs
//!
//! This crate keeps a tree of docking nodes (roots, splits, tabbed
//! containers and leaf windows) and lays it out every frame through a
//! host-provided [`host::Host`]. Tree edits are messages applied by
//! [`update::update`]; host side effects come back as [`Cmd`]s.

pub mod commands;
pub mod config;
pub mod config_paths;
pub mod docking;
pub mod host;
pub mod messages;
pub mod model;
pub mod tracing;
pub mod update;
pub mod view;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::DockStyle;
pub use docking::Docking;
pub use host::{DockFlags, FrameContext, FrameInput, FrameRequests, HeadlessHost, Host, WindowFlags};
pub use messages::TreeMsg;
pub use model::{DockModel, DropZone, Edge, Kind, NodeId, Status};
