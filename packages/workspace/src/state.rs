use crate::files::{TemplateFiles, WorkspaceResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use templar_common::{Config, FileSystem, RealFileSystem};
use templar_editor::{DirKv, KeyValueStore, KvStorage, VersionManager};

/// Version storage over whichever key-value medium the server was given
pub type VersionStore = KvStorage<Box<dyn KeyValueStore + Send + Sync>>;

pub type Versions = VersionManager<VersionStore, TemplateFiles>;

/// Shared state of the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub files: TemplateFiles,
    pub versions: Arc<Versions>,
}

impl AppState {
    pub fn new<K>(files: TemplateFiles, kv: K, prefix: &str) -> Self
    where
        K: KeyValueStore + Send + Sync + 'static,
    {
        let storage: VersionStore = KvStorage::new(Box::new(kv), prefix);
        Self {
            versions: Arc::new(VersionManager::new(storage, files.clone())),
            files,
        }
    }

    /// Real filesystem under `base_dir`, versions kept in the configured store dir
    pub fn open(base_dir: &Path, config: &Config) -> WorkspaceResult<Self> {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let files = TemplateFiles::new(fs, base_dir.to_path_buf(), config);
        let store_dir: PathBuf = base_dir.join(&config.store_dir);
        let kv = DirKv::open(&store_dir).map_err(templar_editor::EditorError::from)?;

        tracing::info!(
            base_dir = %base_dir.display(),
            store = %store_dir.display(),
            "Opened template workspace"
        );
        Ok(Self::new(files, kv, &config.storage_prefix))
    }
}
