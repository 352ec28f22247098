use crate::error::{CommonError, CommonResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "templar.config.json";

/// Templar configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Trusted root that template paths are relative to
    #[serde(default = "default_base_dir")]
    pub base_dir: String,

    /// Directories (relative to the base dir) scanned for templates
    #[serde(default = "default_template_dirs")]
    pub template_dirs: Vec<String>,

    #[serde(default = "default_template_extension")]
    pub template_extension: String,

    /// Where overwritten templates are copied before a write
    #[serde(default = "default_backup_dir")]
    pub backup_dir: String,

    /// Directory holding the version manifest and snapshot contents
    #[serde(default = "default_store_dir")]
    pub store_dir: String,

    /// Key prefix used inside the version store
    #[serde(default = "default_storage_prefix")]
    pub storage_prefix: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Bridge URL used by the CLI in remote mode
    #[serde(default = "default_server_url")]
    pub server_url: String,
}

fn default_base_dir() -> String {
    ".".to_string()
}

fn default_template_dirs() -> Vec<String> {
    vec![
        "Resources/Prompts/Default/en".to_string(),
        "Resources/Modules/ChainOfThought/en".to_string(),
        "Resources/Modules/Continuations/en".to_string(),
        "Resources/Formatting".to_string(),
    ]
}

fn default_template_extension() -> String {
    ".scriban".to_string()
}

fn default_backup_dir() -> String {
    "Data/TemplateBackups".to_string()
}

fn default_store_dir() -> String {
    ".templar/store".to_string()
}

fn default_storage_prefix() -> String {
    "templar-editor-state".to_string()
}

fn default_port() -> u16 {
    5385
}

fn default_server_url() -> String {
    format!("http://localhost:{}", default_port())
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> CommonResult<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content).map_err(|source| {
                CommonError::InvalidConfig {
                    path: config_path.clone(),
                    source,
                }
            })?;
            tracing::debug!(path = %config_path.display(), "Loaded config");
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Absolute path to the base directory
    pub fn get_base_dir(&self, cwd: &Path) -> PathBuf {
        // Collecting components drops `.` segments
        cwd.join(&self.base_dir).components().collect()
    }

    pub fn get_store_dir(&self, cwd: &Path) -> PathBuf {
        self.get_base_dir(cwd).join(&self.store_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            template_dirs: default_template_dirs(),
            template_extension: default_template_extension(),
            backup_dir: default_backup_dir(),
            store_dir: default_store_dir(),
            storage_prefix: default_storage_prefix(),
            port: default_port(),
            server_url: default_server_url(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "baseDir": "voxta",
            "templateDirs": ["Resources/Prompts/Default/en"],
            "port": 6000
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.base_dir, "voxta");
        assert_eq!(config.template_dirs, vec!["Resources/Prompts/Default/en"]);
        assert_eq!(config.port, 6000);
        assert_eq!(config.template_extension, ".scriban");
        assert_eq!(config.backup_dir, "Data/TemplateBackups");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_dir, ".");
        assert_eq!(config.template_dirs.len(), 4);
        assert_eq!(config.port, 5385);
        assert_eq!(config.server_url, "http://localhost:5385");
    }

    #[test]
    fn test_load_missing_config_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{ not json").unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(CommonError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_paths_are_resolved_from_base_dir() {
        let config = Config {
            base_dir: "app".to_string(),
            ..Config::default()
        };
        let cwd = Path::new("/work");
        assert_eq!(config.get_base_dir(cwd), PathBuf::from("/work/app"));
        assert_eq!(
            Config::default().get_base_dir(cwd).to_string_lossy(),
            "/work"
        );
        assert_eq!(
            config.get_store_dir(cwd),
            PathBuf::from("/work/app/.templar/store")
        );
    }
}
