use crate::bridge::HttpBridge;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use templar_common::{Config, RealFileSystem};
use templar_editor::{DirKv, KvStorage, OriginalSource, TemplateWriter, VersionManager};
use templar_workspace::TemplateFiles;

/// Where live template content comes from
pub enum Templates {
    Local(TemplateFiles),
    Remote(HttpBridge),
}

impl Templates {
    pub fn list(&self) -> Result<Vec<String>> {
        match self {
            Templates::Local(files) => Ok(files.list()),
            Templates::Remote(bridge) => bridge.list_templates(),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Templates::Local(files) => files.base_dir().display().to_string(),
            Templates::Remote(bridge) => bridge.base_url().to_string(),
        }
    }
}

impl OriginalSource for Templates {
    fn fetch_original(&self, template_path: &str) -> Option<String> {
        match self {
            Templates::Local(files) => files.fetch_original(template_path),
            Templates::Remote(bridge) => bridge.fetch_original(template_path),
        }
    }
}

impl TemplateWriter for Templates {
    fn write_to_disk(&self, template_path: &str, content: &str) -> bool {
        match self {
            Templates::Local(files) => files.write_to_disk(template_path, content),
            Templates::Remote(bridge) => bridge.write_to_disk(template_path, content),
        }
    }
}

pub type Versions = VersionManager<KvStorage<DirKv>, Templates>;

/// Config, template access and the local version store for one invocation
pub struct Session {
    pub config: Config,
    pub versions: Versions,
}

impl Session {
    /// `remote` switches template access to a running bridge; versions stay local
    pub fn open(cwd: &Path, remote: Option<String>) -> Result<Self> {
        let config = Config::load(cwd).context("Failed to load templar.config.json")?;
        let base_dir = config.get_base_dir(cwd);

        let templates = match remote {
            Some(url) => {
                let url = if url.is_empty() {
                    config.server_url.clone()
                } else {
                    url
                };
                let bridge = HttpBridge::new(&url)?;
                // Versions still work offline; only originals and writes need the server
                match bridge.health() {
                    Ok(_) => tracing::debug!(url = %bridge.base_url(), "Bridge is up"),
                    Err(e) => {
                        tracing::warn!(url = %bridge.base_url(), error = %e, "Bridge unreachable")
                    }
                }
                Templates::Remote(bridge)
            }
            None => Templates::Local(TemplateFiles::new(
                Arc::new(RealFileSystem),
                base_dir.clone(),
                &config,
            )),
        };

        let store_dir: PathBuf = config.get_store_dir(cwd);
        let kv = DirKv::open(&store_dir)
            .with_context(|| format!("Failed to open version store at {}", store_dir.display()))?;
        let storage = KvStorage::new(kv, config.storage_prefix.clone());

        tracing::debug!(templates = %templates.describe(), store = %store_dir.display(), "Opened session");

        Ok(Self {
            config,
            versions: VersionManager::new(storage, templates),
        })
    }

    pub fn templates(&self) -> &Templates {
        self.versions.originals()
    }
}
