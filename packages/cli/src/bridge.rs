//! Client for a running `templar-server`

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use templar_editor::{OriginalSource, TemplateWriter};

const TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct TemplateList {
    templates: Vec<String>,
}

/// Template access through the HTTP bridge
pub struct HttpBridge {
    client: Client,
    base_url: Url,
}

impl HttpBridge {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).with_context(|| format!("Invalid server URL: {}", base_url))?;
        let client = Client::builder()
            .timeout(TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/api/templates/{path}` with each path segment encoded
    fn template_url(&self, template_path: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Server URL cannot take a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(["api", "templates"])
            .extend(template_path.split('/'));
        Ok(url)
    }

    pub fn health(&self) -> Result<serde_json::Value> {
        let url = self.base_url.join("health")?;
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.json()?)
    }

    pub fn list_templates(&self) -> Result<Vec<String>> {
        let url = self.base_url.join("api/templates")?;
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Template server not reachable at {}", self.base_url))?
            .error_for_status()?;

        let list: TemplateList = response.json()?;
        Ok(list.templates)
    }

    pub fn read_template(&self, template_path: &str) -> Result<Option<String>> {
        let response = self.client.get(self.template_url(template_path)?).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(response.error_for_status()?.text()?))
    }

    pub fn write_template(&self, template_path: &str, content: &str) -> Result<()> {
        let response = self
            .client
            .put(self.template_url(template_path)?)
            .json(&serde_json::json!({ "content": content }))
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(anyhow!("Template server error {}: {}", status, body));
        }
        Ok(())
    }
}

impl OriginalSource for HttpBridge {
    fn fetch_original(&self, template_path: &str) -> Option<String> {
        match self.read_template(template_path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = template_path, error = %e, "Failed to fetch original");
                None
            }
        }
    }
}

impl TemplateWriter for HttpBridge {
    fn write_to_disk(&self, template_path: &str, content: &str) -> bool {
        match self.write_template(template_path, content) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(path = template_path, error = %e, "Failed to write through bridge");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use templar_common::{Config, MockFileSystem};
    use templar_editor::MemoryKv;
    use templar_workspace::{router, AppState, TemplateFiles};

    const INTRO: &str = "Resources/Prompts/Default/en/Includes/Intro Text.scriban";

    /// Serve an in-memory tree on an ephemeral port
    fn spawn_server(fs: Arc<MockFileSystem>) -> String {
        let files = TemplateFiles::new(fs, "/voxta", &Config::default());
        let app = router(AppState::new(files, MemoryKv::new(), "test"), None);

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        listener.set_nonblocking(true).unwrap();

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                axum::serve(listener, app).await.unwrap();
            });
        });

        format!("http://{}", addr)
    }

    #[test]
    fn test_template_url_encodes_segments() {
        let bridge = HttpBridge::new("http://localhost:5385").unwrap();
        let url = bridge.template_url("Includes/Intro Text.scriban").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5385/api/templates/Includes/Intro%20Text.scriban"
        );
    }

    #[test]
    fn test_round_trip_through_server() {
        let fs = Arc::new(MockFileSystem::new());
        fs.add_file(format!("/voxta/{}", INTRO), "hello");
        let bridge = HttpBridge::new(&spawn_server(fs)).unwrap();

        assert_eq!(bridge.health().unwrap()["status"], "ok");
        assert_eq!(bridge.list_templates().unwrap(), vec![INTRO.to_string()]);
        assert_eq!(bridge.fetch_original(INTRO).as_deref(), Some("hello"));
        assert_eq!(bridge.fetch_original("Resources/Missing.scriban"), None);

        assert!(bridge.write_to_disk(INTRO, "changed"));
        assert_eq!(bridge.fetch_original(INTRO).as_deref(), Some("changed"));
        // Empty content is refused by the server
        assert!(!bridge.write_to_disk(INTRO, ""));
    }

    #[test]
    fn test_unreachable_server_reads_as_absent() {
        let bridge = HttpBridge::new("http://127.0.0.1:9").unwrap();
        assert_eq!(bridge.fetch_original(INTRO), None);
        assert!(!bridge.write_to_disk(INTRO, "x"));
        assert!(bridge.list_templates().is_err());
    }
}
