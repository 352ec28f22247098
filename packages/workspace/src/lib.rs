//! # Templar Workspace
//!
//! Local file-access bridge for the template editor: lists, reads and
//! writes templates under a trusted root and exposes the version store
//! over HTTP.

pub mod files;
pub mod server;
pub mod state;

pub use files::{TemplateFiles, WorkspaceError, WorkspaceResult};
pub use server::{router, ApiError};
pub use state::{AppState, VersionStore, Versions};
