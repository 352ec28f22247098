//! # Templar Editor
//!
//! Version history for template files, kept apart from the files
//! themselves.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ VersionManager                              │
//! │  - create / activate / delete / list        │
//! │  - resolve content, diff two versions       │
//! └─────────────────────────────────────────────┘
//!          ↓                         ↓
//! ┌──────────────────────┐  ┌──────────────────────┐
//! │ ManifestStore        │  │ OriginalSource       │
//! │ ContentStore         │  │ TemplateWriter       │
//! │  (KvStorage over a   │  │  (file service or    │
//! │   KeyValueStore)     │  │   HTTP bridge)       │
//! └──────────────────────┘  └──────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Files are never versioned in place**: snapshots live in the store
//! 2. **"original" is the live file**: it is fetched, never stored
//! 3. **Absence is not an error**: unknown paths and ids give empty results
//! 4. **Whole-manifest writes**: every mutation is load, change, save
//!
//! ## Usage
//!
//! ```rust,ignore
//! use templar_editor::{AppProfile, KvStorage, MemoryKv, NoOriginals, VersionManager, VersionRef};
//!
//! let versions = VersionManager::new(KvStorage::new(MemoryKv::new(), "templar"), NoOriginals);
//!
//! let v = versions.create_version("Includes/Intro.scriban", "Terse", AppProfile::Assistant, "Hi", "")?;
//! versions.set_active_version("Includes/Intro.scriban", VersionRef::Stored(v.id))?;
//! let text = versions.resolve_active("Includes/Intro.scriban")?;
//! ```

mod errors;
mod id;
mod kv;
mod model;
mod ports;
mod store;
mod versions;

pub use errors::{EditorError, EditorResult, StoreError};
pub use id::generate_version_id;
pub use kv::{DirKv, MemoryKv};
pub use model::{AppProfile, Manifest, TemplateEntry, Version, VersionId, VersionRef, ORIGINAL};
pub use ports::{NoOriginals, OriginalSource, TemplateWriter};
pub use store::{ContentStore, KeyValueStore, KvStorage, ManifestStore};
pub use versions::{ApplyOutcome, VersionManager};

// Re-export the diff types returned by VersionManager::diff_versions
pub use templar_diff::{DiffKind, DiffLine, DiffStats};
