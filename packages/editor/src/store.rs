//! Persistence seams for versions
//!
//! Version content and the manifest are kept apart: content blobs are
//! addressed by `(template path, version id)`, the manifest is a single
//! JSON document. [`KvStorage`] implements both over any string key-value
//! medium, using the same key layout as the browser editor:
//!
//! - `{prefix}-manifest`
//! - `{prefix}-content-{template path}-{version id}`

use crate::errors::StoreError;
use crate::model::{Manifest, VersionId};

/// Content blobs keyed by template path and version id
pub trait ContentStore {
    fn get(&self, template_path: &str, version_id: &VersionId) -> Result<Option<String>, StoreError>;

    fn put(&self, template_path: &str, version_id: &VersionId, content: &str)
        -> Result<(), StoreError>;

    /// Removing a missing blob is not an error
    fn delete(&self, template_path: &str, version_id: &VersionId) -> Result<(), StoreError>;
}

/// Load and save of the whole manifest
pub trait ManifestStore {
    /// Missing or unreadable manifests load as empty
    fn load(&self) -> Result<Manifest, StoreError>;

    fn save(&self, manifest: &Manifest) -> Result<(), StoreError>;
}

/// String key-value medium
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Manifest and content storage over a key-value medium
#[derive(Debug)]
pub struct KvStorage<K> {
    kv: K,
    prefix: String,
}

impl<K: KeyValueStore> KvStorage<K> {
    pub fn new(kv: K, prefix: impl Into<String>) -> Self {
        Self {
            kv,
            prefix: prefix.into(),
        }
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub fn manifest_key(&self) -> String {
        format!("{}-manifest", self.prefix)
    }

    pub fn content_key(&self, template_path: &str, version_id: &VersionId) -> String {
        format!("{}-content-{}-{}", self.prefix, template_path, version_id)
    }
}

impl<K: KeyValueStore> ManifestStore for KvStorage<K> {
    fn load(&self) -> Result<Manifest, StoreError> {
        let Some(raw) = self.kv.get(&self.manifest_key())? else {
            return Ok(Manifest::default());
        };

        match serde_json::from_str(&raw) {
            Ok(manifest) => Ok(manifest),
            Err(e) => {
                tracing::warn!(
                    key = %self.manifest_key(),
                    error = %e,
                    "Unreadable version manifest, starting from an empty one"
                );
                Ok(Manifest::default())
            }
        }
    }

    fn save(&self, manifest: &Manifest) -> Result<(), StoreError> {
        let raw = serde_json::to_string(manifest)?;
        self.kv.set(&self.manifest_key(), &raw)
    }
}

impl<K: KeyValueStore> ContentStore for KvStorage<K> {
    fn get(&self, template_path: &str, version_id: &VersionId) -> Result<Option<String>, StoreError> {
        self.kv.get(&self.content_key(template_path, version_id))
    }

    fn put(
        &self,
        template_path: &str,
        version_id: &VersionId,
        content: &str,
    ) -> Result<(), StoreError> {
        self.kv
            .set(&self.content_key(template_path, version_id), content)
    }

    fn delete(&self, template_path: &str, version_id: &VersionId) -> Result<(), StoreError> {
        self.kv.remove(&self.content_key(template_path, version_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKv;

    #[test]
    fn test_key_layout() {
        let storage = KvStorage::new(MemoryKv::new(), "templar-editor-state");
        let id = VersionId::new("vabc");

        assert_eq!(storage.manifest_key(), "templar-editor-state-manifest");
        assert_eq!(
            storage.content_key("Resources/Includes/Messages.scriban", &id),
            "templar-editor-state-content-Resources/Includes/Messages.scriban-vabc"
        );
    }

    #[test]
    fn test_missing_manifest_loads_empty() {
        let storage = KvStorage::new(MemoryKv::new(), "p");
        assert_eq!(storage.load().unwrap(), Manifest::default());
    }

    #[test]
    fn test_corrupt_manifest_loads_empty() {
        let storage = KvStorage::new(MemoryKv::new(), "p");
        storage.kv().set("p-manifest", "{not json").unwrap();

        let manifest = storage.load().unwrap();
        assert!(manifest.templates.is_empty());
    }

    #[test]
    fn test_content_put_get_delete() {
        let storage = KvStorage::new(MemoryKv::new(), "p");
        let id = VersionId::new("v1");

        assert_eq!(ContentStore::get(&storage, "T", &id).unwrap(), None);
        storage.put("T", &id, "hello").unwrap();
        assert_eq!(
            ContentStore::get(&storage, "T", &id).unwrap().as_deref(),
            Some("hello")
        );

        storage.delete("T", &id).unwrap();
        assert_eq!(ContentStore::get(&storage, "T", &id).unwrap(), None);
        // Second delete of the same blob is fine
        storage.delete("T", &id).unwrap();
    }
}
