//! Template files under a trusted root

use chrono::{SecondsFormat, Utc};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use templar_common::{Config, FileSystem};
use templar_editor::{EditorError, OriginalSource, TemplateWriter};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Editor(#[from] EditorError),
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

/// List, read and write access to the template tree
#[derive(Clone)]
pub struct TemplateFiles {
    fs: Arc<dyn FileSystem>,
    base_dir: PathBuf,
    template_dirs: Vec<String>,
    extension: String,
    backup_dir: PathBuf,
}

impl TemplateFiles {
    pub fn new(fs: Arc<dyn FileSystem>, base_dir: impl Into<PathBuf>, config: &Config) -> Self {
        let base_dir = base_dir.into();
        Self {
            fs,
            backup_dir: base_dir.join(&config.backup_dir),
            base_dir,
            template_dirs: config.template_dirs.clone(),
            extension: config.template_extension.clone(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Absolute location of a template path, refusing anything outside the base dir
    pub fn resolve(&self, template_path: &str) -> WorkspaceResult<PathBuf> {
        let invalid = || WorkspaceError::InvalidPath(template_path.to_string());

        if template_path.trim().is_empty() || template_path.contains('\0') {
            return Err(invalid());
        }

        let mut resolved = self.base_dir.clone();
        for component in Path::new(template_path).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid())
                }
            }
        }

        // Symlinks inside the tree must not lead out of it. A file that does
        // not exist yet is judged by the closest ancestor that does.
        if let Ok(root) = self.fs.canonicalize(&self.base_dir) {
            if !self.fs.exists(&resolved) && self.fs.is_symlink(&resolved) {
                return Err(invalid());
            }
            let real = resolved
                .ancestors()
                .find_map(|ancestor| self.fs.canonicalize(ancestor).ok());
            match real {
                Some(real) if real.starts_with(&root) => {}
                _ => return Err(invalid()),
            }
        }

        Ok(resolved)
    }

    /// Every template under the configured directories, `/`-separated and
    /// relative to the base dir
    pub fn list(&self) -> Vec<String> {
        let mut templates = Vec::new();
        for dir in &self.template_dirs {
            let dir = self.base_dir.join(dir);
            match self.fs.walk_files(&dir) {
                Ok(files) => templates.extend(
                    files
                        .iter()
                        .filter(|file| self.is_template(file))
                        .filter_map(|file| self.relative(file)),
                ),
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "Skipping template directory");
                }
            }
        }
        templates
    }

    fn is_template(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| name.to_string_lossy().ends_with(&self.extension))
            .unwrap_or(false)
    }

    fn relative(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.base_dir).ok()?;
        let parts: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }

    /// File content, `None` when there is no such file
    pub fn read(&self, template_path: &str) -> WorkspaceResult<Option<String>> {
        let full_path = self.resolve(template_path)?;
        if !self.fs.exists(&full_path) || self.fs.is_dir(&full_path) {
            return Ok(None);
        }
        Ok(Some(self.fs.read_to_string(&full_path)?))
    }

    /// Overwrite a template, copying the previous content to the backup dir first
    ///
    /// Returns the backup location when there was something to back up.
    pub fn write(&self, template_path: &str, content: &str) -> WorkspaceResult<Option<PathBuf>> {
        let full_path = self.resolve(template_path)?;

        let backup = if self.fs.exists(&full_path) {
            self.fs.create_dir_all(&self.backup_dir)?;
            let target = self.backup_dir.join(backup_name(template_path));
            self.fs.copy(&full_path, &target)?;
            tracing::info!(path = template_path, backup = %target.display(), "Backed up template");
            Some(target)
        } else {
            None
        };

        self.fs.write(&full_path, content)?;
        tracing::info!(path = template_path, bytes = content.len(), "Wrote template");
        Ok(backup)
    }
}

/// `Includes/Intro.scriban` → `Includes_Intro.scriban.2024-05-01T10-20-30-000Z.bak`
fn backup_name(template_path: &str) -> String {
    let stamp = Utc::now()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{}.{}.bak", template_path.replace('/', "_"), stamp)
}

impl OriginalSource for TemplateFiles {
    fn fetch_original(&self, template_path: &str) -> Option<String> {
        match self.read(template_path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = template_path, error = %e, "Failed to read original template");
                None
            }
        }
    }
}

impl TemplateWriter for TemplateFiles {
    fn write_to_disk(&self, template_path: &str, content: &str) -> bool {
        match self.write(template_path, content) {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(path = template_path, error = %e, "Failed to write template");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use templar_common::MockFileSystem;

    const INTRO: &str = "Resources/Prompts/Default/en/Includes/Intro.scriban";

    fn files_with(fs: Arc<MockFileSystem>) -> TemplateFiles {
        TemplateFiles::new(fs, "/voxta", &Config::default())
    }

    fn sample_fs() -> Arc<MockFileSystem> {
        let fs = Arc::new(MockFileSystem::new());
        fs.add_file(format!("/voxta/{}", INTRO), "Hello {{ user }}");
        fs.add_file(
            "/voxta/Resources/Prompts/Default/en/TextGen/ChatInstructSystemMessage.scriban",
            "system",
        );
        fs.add_file("/voxta/Resources/Prompts/Default/en/TextGen/notes.txt", "skip");
        fs.add_file(
            "/voxta/Resources/Modules/Continuations/en/ShortContinuationMessage.scriban",
            "more",
        );
        fs
    }

    #[test]
    fn test_resolve_rejects_escapes() {
        let files = files_with(sample_fs());

        for bad in ["../secret.txt", "a/../../b", "/etc/passwd", "", "  "] {
            assert!(
                matches!(files.resolve(bad), Err(WorkspaceError::InvalidPath(_))),
                "{} should be rejected",
                bad
            );
        }
        assert_eq!(
            files.resolve("./Resources/x.scriban").unwrap(),
            PathBuf::from("/voxta/Resources/x.scriban")
        );
    }

    #[test]
    fn test_list_finds_templates_recursively() {
        let files = files_with(sample_fs());

        assert_eq!(
            files.list(),
            vec![
                INTRO.to_string(),
                "Resources/Prompts/Default/en/TextGen/ChatInstructSystemMessage.scriban".to_string(),
                "Resources/Modules/Continuations/en/ShortContinuationMessage.scriban".to_string(),
            ]
        );
    }

    #[test]
    fn test_read_missing_is_none() {
        let files = files_with(sample_fs());

        assert_eq!(files.read(INTRO).unwrap().as_deref(), Some("Hello {{ user }}"));
        assert_eq!(files.read("Resources/None.scriban").unwrap(), None);
        // Directories are not templates
        assert_eq!(files.read("Resources").unwrap(), None);
    }

    #[test]
    fn test_write_backs_up_existing_file() {
        let fs = sample_fs();
        let files = files_with(fs.clone());

        let backup = files.write(INTRO, "Hi {{ char }}").unwrap().unwrap();
        let name = backup.file_name().unwrap().to_string_lossy().to_string();

        assert!(backup.starts_with("/voxta/Data/TemplateBackups"));
        assert!(name.starts_with("Resources_Prompts_Default_en_Includes_Intro.scriban."));
        assert!(name.ends_with("Z.bak"));
        assert!(!name.contains(':'));
        assert_eq!(fs.read_to_string(&backup).unwrap(), "Hello {{ user }}");
        assert_eq!(files.read(INTRO).unwrap().as_deref(), Some("Hi {{ char }}"));
    }

    #[test]
    fn test_new_file_has_no_backup() {
        let fs = sample_fs();
        let files = files_with(fs.clone());

        assert!(files.write("Resources/New.scriban", "x").unwrap().is_none());
        assert!(!fs
            .file_paths()
            .iter()
            .any(|p| p.starts_with("/voxta/Data")));
    }

    #[test]
    fn test_collaborator_traits_swallow_errors() {
        let files = files_with(sample_fs());

        assert_eq!(files.fetch_original("../outside"), None);
        assert!(!files.write_to_disk("../outside", "x"));
        assert!(files.write_to_disk(INTRO, "ok"));
        assert_eq!(files.fetch_original(INTRO).as_deref(), Some("ok"));
    }

    #[test]
    fn test_symlink_escape_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.scriban"), "secret").unwrap();

        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(outside.path(), root.path().join("link")).unwrap();
            let files = TemplateFiles::new(
                Arc::new(templar_common::RealFileSystem),
                root.path(),
                &Config::default(),
            );
            assert!(matches!(
                files.read("link/secret.scriban"),
                Err(WorkspaceError::InvalidPath(_))
            ));

            // New files behind the link are refused too
            assert!(matches!(
                files.write("link/new.scriban", "x"),
                Err(WorkspaceError::InvalidPath(_))
            ));
            assert!(!files.write_to_disk("link/new.scriban", "x"));
            assert!(!outside.path().join("new.scriban").exists());

            // So is a dangling link pointing outside
            std::os::unix::fs::symlink(
                outside.path().join("ghost.scriban"),
                root.path().join("ghost.scriban"),
            )
            .unwrap();
            assert!(files.write("ghost.scriban", "x").is_err());
            assert!(!outside.path().join("ghost.scriban").exists());

            // Plain new files inside the root are still fine
            assert!(files.write("fresh.scriban", "x").unwrap().is_none());
            assert_eq!(files.read("fresh.scriban").unwrap().as_deref(), Some("x"));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_list_skips_symlinked_directories() {
        let root = tempfile::tempdir().unwrap();
        let formatting = root.path().join("Resources/Formatting");
        std::fs::create_dir_all(&formatting).unwrap();
        std::fs::write(formatting.join("A.scriban"), "a").unwrap();
        std::os::unix::fs::symlink(&formatting, formatting.join("loop")).unwrap();

        let config = Config {
            template_dirs: vec!["Resources".to_string()],
            ..Config::default()
        };
        let files = TemplateFiles::new(Arc::new(templar_common::RealFileSystem), root.path(), &config);

        assert_eq!(files.list(), vec!["Resources/Formatting/A.scriban".to_string()]);
    }
}
