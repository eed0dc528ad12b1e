//! Directory-backed object store for offline runs and fixtures.
//!
//! Keys map to relative paths under a root directory. Metadata is persisted
//! in a `.meta.json` sidecar next to the object so `put`/`list` round-trip
//! the same shape as the blob backend.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use walkdir::WalkDir;

use crate::error::StorageError;
use crate::models::StoredObject;
use crate::storage::ObjectStore;

const META_SUFFIX: &str = ".meta.json";

pub struct LocalDirStore {
    root: PathBuf,
}

impl LocalDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, key: &str) -> PathBuf {
        let mut path = self.root.clone();
        for segment in key.split('/') {
            path.push(segment);
        }
        path
    }

    fn sidecar_path(&self, key: &str) -> PathBuf {
        self.object_path(&format!("{}{}", key, META_SUFFIX))
    }

    fn key_for(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let segments: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(segments.join("/"))
    }

    fn load_metadata(&self, key: &str) -> HashMap<String, String> {
        std::fs::read_to_string(self.sidecar_path(key))
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ObjectStore for LocalDirStore {
    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>, StorageError> {
        if !self.root.exists() {
            return Err(StorageError::ConnectionError(format!(
                "root directory does not exist: {}",
                self.root.display()
            )));
        }

        let mut objects = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| StorageError::ListError(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(key) = self.key_for(entry.path()) else {
                continue;
            };
            if key.ends_with(META_SUFFIX) || !key.starts_with(prefix) {
                continue;
            }
            objects.push(StoredObject::with_metadata(
                key.clone(),
                self.load_metadata(&key),
            ));
        }

        Ok(objects)
    }

    async fn fetch_to_path(&self, key: &str, dest: &Path) -> Result<(), StorageError> {
        let source = self.object_path(key);
        if !source.is_file() {
            return Err(StorageError::NotFound(key.to_string()));
        }
        tokio::fs::copy(&source, dest).await?;
        Ok(())
    }

    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
        metadata: &HashMap<String, String>,
    ) -> Result<(), StorageError> {
        let path = self.object_path(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        if !metadata.is_empty() {
            let content = serde_json::to_string_pretty(metadata)
                .map_err(|e| StorageError::PutError(e.to_string()))?;
            tokio::fs::write(self.sidecar_path(key), content).await?;
        }

        Ok(())
    }

    async fn check_connection(&self) -> Result<bool, StorageError> {
        Ok(self.root.is_dir())
    }

    fn describe(&self) -> String {
        format!("local://{}", self.root.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_list_fetch_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDirStore::new(dir.path());

        let mut metadata = HashMap::new();
        metadata.insert("analyzed".to_string(), "true".to_string());

        store
            .put("c1/a.csv", b"id,name\n1,x\n".to_vec(), "text/csv", &metadata)
            .await
            .unwrap();
        store
            .put("c1/b.csv", b"id\n2\n".to_vec(), "text/csv", &HashMap::new())
            .await
            .unwrap();
        store
            .put("c2/other.csv", b"id\n3\n".to_vec(), "text/csv", &HashMap::new())
            .await
            .unwrap();

        let objects = store.list("c1/").await.unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].key, "c1/a.csv");
        assert_eq!(objects[0].metadata.get("analyzed").unwrap(), "true");
        assert_eq!(objects[1].key, "c1/b.csv");
        assert!(objects[1].metadata.is_empty());

        let dest = dir.path().join("staged.csv");
        store.fetch_to_path("c1/a.csv", &dest).await.unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"id,name\n1,x\n");
    }

    #[tokio::test]
    async fn test_fetch_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDirStore::new(dir.path());
        let dest = dir.path().join("out");

        let err = store.fetch_to_path("c1/missing.csv", &dest).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_empty_prefix_returns_ok_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDirStore::new(dir.path());
        let objects = store.list("nothing/").await.unwrap();
        assert!(objects.is_empty());
    }

    #[tokio::test]
    async fn test_check_connection() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDirStore::new(dir.path());
        assert!(store.check_connection().await.unwrap());

        let missing = LocalDirStore::new(dir.path().join("nope"));
        assert!(!missing.check_connection().await.unwrap());
    }
}
