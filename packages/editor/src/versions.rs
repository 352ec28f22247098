//! Version lifecycle over the manifest and content store
//!
//! Every mutation is a whole-manifest read-modify-write. Nothing serializes
//! concurrent callers: two overlapping mutations race and the last save wins.

use crate::errors::{EditorError, EditorResult};
use crate::id::generate_version_id;
use crate::model::{AppProfile, Version, VersionId, VersionRef};
use crate::ports::{OriginalSource, TemplateWriter};
use crate::store::{ContentStore, ManifestStore};
use chrono::{DateTime, Utc};
use templar_diff::DiffLine;

/// Result of writing a version back over the live file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Written and now active
    Applied,
    /// The version has no resolvable content
    NotFound,
    /// The writer refused or failed; nothing changed
    WriteFailed,
}

/// Named snapshots per template path and the active selection
pub struct VersionManager<S, O> {
    storage: S,
    originals: O,
}

impl<S, O> VersionManager<S, O>
where
    S: ManifestStore + ContentStore,
    O: OriginalSource,
{
    pub fn new(storage: S, originals: O) -> Self {
        Self { storage, originals }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn originals(&self) -> &O {
        &self.originals
    }

    /// Versions of a path in creation order
    pub fn list_versions(&self, template_path: &str) -> EditorResult<Vec<Version>> {
        let manifest = self.storage.load()?;
        Ok(manifest
            .entry(template_path)
            .map(|entry| entry.versions.clone())
            .unwrap_or_default())
    }

    pub fn get_active_version(&self, template_path: &str) -> EditorResult<VersionRef> {
        let manifest = self.storage.load()?;
        Ok(manifest
            .entry(template_path)
            .map(|entry| entry.active_version_id.clone())
            .unwrap_or_default())
    }

    /// Snapshot `content` as a new version of `template_path`
    ///
    /// The new version is not activated.
    pub fn create_version(
        &self,
        template_path: &str,
        name: &str,
        profile: AppProfile,
        content: &str,
        description: &str,
    ) -> EditorResult<Version> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditorError::EmptyName);
        }

        let mut manifest = self.storage.load()?;
        let entry = manifest.entry_or_default(template_path);

        let mut id = generate_version_id();
        while entry.contains(&id) {
            id = generate_version_id();
        }

        let version = Version {
            id: id.clone(),
            name: name.to_string(),
            profile,
            created_at: Utc::now(),
            description: description.trim().to_string(),
            is_original: false,
        };
        entry.versions.push(version.clone());

        // Blob first so a saved manifest never points at missing content
        self.storage.put(template_path, &id, content)?;
        if let Err(e) = self.storage.save(&manifest) {
            if let Err(cleanup) = self.storage.delete(template_path, &id) {
                tracing::warn!(
                    path = template_path,
                    version = %id,
                    error = %cleanup,
                    "Failed to remove content of unsaved version"
                );
            }
            return Err(e.into());
        }

        tracing::info!(
            path = template_path,
            version = %id,
            name = %version.name,
            profile = %profile,
            "Created version"
        );
        Ok(version)
    }

    /// Select the active version of a known path
    ///
    /// Unknown paths are left alone. The id is not checked against the
    /// path's versions; an unknown id resolves to no content.
    pub fn set_active_version(&self, template_path: &str, active: VersionRef) -> EditorResult<()> {
        let mut manifest = self.storage.load()?;
        let Some(entry) = manifest.entry_mut(template_path) else {
            tracing::debug!(path = template_path, "Ignoring activation for untracked template");
            return Ok(());
        };

        if let VersionRef::Stored(id) = &active {
            if !entry.contains(id) {
                tracing::warn!(path = template_path, version = %id, "Activating unknown version");
            }
        }

        entry.active_version_id = active.clone();
        self.storage.save(&manifest)?;

        tracing::info!(path = template_path, version = %active, "Activated version");
        Ok(())
    }

    /// Remove a version and its content
    ///
    /// The active selection falls back to the original when the deleted
    /// version was active.
    pub fn delete_version(&self, template_path: &str, id: &VersionId) -> EditorResult<()> {
        let mut manifest = self.storage.load()?;
        let Some(entry) = manifest.entry_mut(template_path) else {
            return Ok(());
        };

        let Some(index) = entry.versions.iter().position(|v| &v.id == id) else {
            return Ok(());
        };

        entry.versions.remove(index);
        if entry.active_version_id.is(id) {
            entry.active_version_id = VersionRef::Original;
        }

        // Manifest first so a saved manifest never points at missing content
        self.storage.save(&manifest)?;
        self.storage.delete(template_path, id)?;

        tracing::info!(path = template_path, version = %id, "Deleted version");
        Ok(())
    }

    /// Content of a version, or of the live file for the original
    pub fn resolve_content(
        &self,
        template_path: &str,
        version: &VersionRef,
    ) -> EditorResult<Option<String>> {
        match version {
            VersionRef::Original => {
                let content = self.originals.fetch_original(template_path);
                if content.is_none() {
                    tracing::debug!(path = template_path, "Original content unavailable");
                }
                Ok(content)
            }
            VersionRef::Stored(id) => Ok(self.storage.get(template_path, id)?),
        }
    }

    /// Content of whichever version is currently active
    pub fn resolve_active(&self, template_path: &str) -> EditorResult<Option<String>> {
        let active = self.get_active_version(template_path)?;
        self.resolve_content(template_path, &active)
    }

    /// Line diff between two versions of the same path
    ///
    /// `None` when either side has no content.
    pub fn diff_versions(
        &self,
        template_path: &str,
        from: &VersionRef,
        to: &VersionRef,
    ) -> EditorResult<Option<Vec<DiffLine>>> {
        let Some(old) = self.resolve_content(template_path, from)? else {
            return Ok(None);
        };
        let Some(new) = self.resolve_content(template_path, to)? else {
            return Ok(None);
        };

        Ok(Some(templar_diff::compute(&old, &new)))
    }

    /// Write a version over the live file and activate it
    pub fn apply_version<W>(
        &self,
        template_path: &str,
        version: &VersionRef,
        writer: &W,
    ) -> EditorResult<ApplyOutcome>
    where
        W: TemplateWriter + ?Sized,
    {
        let Some(content) = self.resolve_content(template_path, version)? else {
            return Ok(ApplyOutcome::NotFound);
        };

        if !writer.write_to_disk(template_path, &content) {
            tracing::warn!(path = template_path, version = %version, "Write to disk failed");
            return Ok(ApplyOutcome::WriteFailed);
        }

        self.set_active_version(template_path, version.clone())?;
        Ok(ApplyOutcome::Applied)
    }

    /// Record that the original templates were backed up now
    pub fn mark_original_backup(&self) -> EditorResult<DateTime<Utc>> {
        let mut manifest = self.storage.load()?;
        let now = Utc::now();
        manifest.original_backup_timestamp = Some(now);
        self.storage.save(&manifest)?;

        tracing::info!(timestamp = %now.to_rfc3339(), "Recorded original backup");
        Ok(now)
    }

    pub fn original_backup_timestamp(&self) -> EditorResult<Option<DateTime<Utc>>> {
        Ok(self.storage.load()?.original_backup_timestamp)
    }

    /// Paths with at least one stored version
    pub fn tracked_templates(&self) -> EditorResult<Vec<String>> {
        let manifest = self.storage.load()?;
        Ok(manifest
            .templates
            .into_iter()
            .filter(|(_, entry)| !entry.versions.is_empty())
            .map(|(path, _)| path)
            .collect())
    }
}
