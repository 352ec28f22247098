//! # Version Manifest Model
//!
//! Persisted shape of the version index. The JSON form mirrors what the
//! browser editor keeps in local storage:
//!
//! ```text
//! {
//!   "templates": {
//!     "<template path>": {
//!       "activeVersionId": "original" | "<version id>",
//!       "versions": [{ "id", "name", "type", "createdAt", "description", "isOriginal" }]
//!     }
//!   },
//!   "originalBackupTimestamp": null | "<rfc3339>"
//! }
//! ```

use crate::errors::EditorError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Reserved identifier for the live, unmanaged file content
pub const ORIGINAL: &str = "original";

/// Opaque identifier of a stored version
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionId(String);

impl VersionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Either the sentinel "original" or a stored version
///
/// Serialized as the plain string `"original"` or the version id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VersionRef {
    #[default]
    Original,
    Stored(VersionId),
}

impl VersionRef {
    pub fn parse(raw: &str) -> Self {
        if raw == ORIGINAL {
            VersionRef::Original
        } else {
            VersionRef::Stored(VersionId::new(raw))
        }
    }

    pub fn is_original(&self) -> bool {
        matches!(self, VersionRef::Original)
    }

    /// True when this refers to the given stored version
    pub fn is(&self, id: &VersionId) -> bool {
        matches!(self, VersionRef::Stored(stored) if stored == id)
    }
}

impl From<String> for VersionRef {
    fn from(raw: String) -> Self {
        VersionRef::parse(&raw)
    }
}

impl From<VersionRef> for String {
    fn from(version: VersionRef) -> Self {
        match version {
            VersionRef::Original => ORIGINAL.to_string(),
            VersionRef::Stored(id) => id.0,
        }
    }
}

impl From<VersionId> for VersionRef {
    fn from(id: VersionId) -> Self {
        VersionRef::Stored(id)
    }
}

impl fmt::Display for VersionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionRef::Original => f.write_str(ORIGINAL),
            VersionRef::Stored(id) => id.fmt(f),
        }
    }
}

/// Application profile a version was written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppProfile {
    Companion,
    Assistant,
    Roleplay,
    Storytelling,
}

impl AppProfile {
    pub const ALL: [AppProfile; 4] = [
        AppProfile::Companion,
        AppProfile::Assistant,
        AppProfile::Roleplay,
        AppProfile::Storytelling,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AppProfile::Companion => "Companion",
            AppProfile::Assistant => "Assistant",
            AppProfile::Roleplay => "Roleplay",
            AppProfile::Storytelling => "Storytelling",
        }
    }
}

impl fmt::Display for AppProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppProfile {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppProfile::ALL
            .into_iter()
            .find(|profile| profile.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EditorError::UnknownProfile(s.to_string()))
    }
}

/// Metadata of a named content snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub id: VersionId,
    pub name: String,
    #[serde(rename = "type")]
    pub profile: AppProfile,
    #[serde(alias = "created")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_original: bool,
}

/// Version state of one template path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateEntry {
    #[serde(default, alias = "activeVersion")]
    pub active_version_id: VersionRef,
    #[serde(default)]
    pub versions: Vec<Version>,
}

impl TemplateEntry {
    pub fn contains(&self, id: &VersionId) -> bool {
        self.versions.iter().any(|v| &v.id == id)
    }

    pub fn version(&self, id: &VersionId) -> Option<&Version> {
        self.versions.iter().find(|v| &v.id == id)
    }
}

/// Index of every template's versions and active selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub templates: BTreeMap<String, TemplateEntry>,
    #[serde(default, alias = "originalBackup")]
    pub original_backup_timestamp: Option<DateTime<Utc>>,
}

impl Manifest {
    pub fn entry(&self, template_path: &str) -> Option<&TemplateEntry> {
        self.templates.get(template_path)
    }

    pub fn entry_mut(&mut self, template_path: &str) -> Option<&mut TemplateEntry> {
        self.templates.get_mut(template_path)
    }

    /// Entry for a path, created with the original active if missing
    pub fn entry_or_default(&mut self, template_path: &str) -> &mut TemplateEntry {
        self.templates
            .entry(template_path.to_string())
            .or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_ref_serializes_as_plain_string() {
        assert_eq!(
            serde_json::to_string(&VersionRef::Original).unwrap(),
            "\"original\""
        );
        assert_eq!(
            serde_json::to_string(&VersionRef::Stored(VersionId::new("vabc"))).unwrap(),
            "\"vabc\""
        );

        let parsed: VersionRef = serde_json::from_str("\"original\"").unwrap();
        assert!(parsed.is_original());
        let parsed: VersionRef = serde_json::from_str("\"vabc\"").unwrap();
        assert!(parsed.is(&VersionId::new("vabc")));
    }

    #[test]
    fn test_profile_parsing() {
        assert_eq!("companion".parse::<AppProfile>().unwrap(), AppProfile::Companion);
        assert_eq!(" Storytelling ".parse::<AppProfile>().unwrap(), AppProfile::Storytelling);
        assert!(matches!(
            "Narrator".parse::<AppProfile>(),
            Err(EditorError::UnknownProfile(_))
        ));
    }

    #[test]
    fn test_manifest_reads_browser_shape() {
        let json = r#"{
            "templates": {
                "Resources/Prompts/Default/en/Includes/Messages.scriban": {
                    "activeVersion": "vk2l3m4abcde",
                    "versions": [{
                        "id": "vk2l3m4abcde",
                        "name": "Terse",
                        "type": "Roleplay",
                        "created": "2024-05-01T10:20:30.000Z",
                        "description": "",
                        "isOriginal": false
                    }]
                }
            },
            "originalBackup": null
        }"#;

        let manifest: Manifest = serde_json::from_str(json).unwrap();
        let entry = manifest
            .entry("Resources/Prompts/Default/en/Includes/Messages.scriban")
            .unwrap();
        assert!(entry.active_version_id.is(&VersionId::new("vk2l3m4abcde")));
        assert_eq!(entry.versions[0].profile, AppProfile::Roleplay);
        assert!(manifest.original_backup_timestamp.is_none());
    }

    #[test]
    fn test_manifest_writes_camel_case() {
        let mut manifest = Manifest::default();
        manifest.entry_or_default("T");

        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["templates"]["T"]["activeVersionId"], "original");
        assert_eq!(json["templates"]["T"]["versions"], serde_json::json!([]));
        assert!(json["originalBackupTimestamp"].is_null());
    }
}
