//! Object store collaborators.
//!
//! The pipeline consumes object storage through the [`ObjectStore`] trait so
//! that service-layer tests run against in-memory fakes. Production runs use
//! the Azure Blob backend; the local backend exists for offline runs and
//! fixtures.

mod azure;
mod local;

pub use azure::AzureBlobStore;
pub use local::LocalDirStore;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{ConfigError, StorageError};
use crate::models::{StorageBackend, StorageConfig, StoredObject};

/// Blob-style object storage scoped to one container.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List every object whose key starts with `prefix`, with its metadata.
    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>, StorageError>;

    /// Download one object to a local path. Fails on not-found.
    async fn fetch_to_path(&self, key: &str, dest: &Path) -> Result<(), StorageError>;

    /// Write one object, replacing any existing content under the key.
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        metadata: &HashMap<String, String>,
    ) -> Result<(), StorageError>;

    /// Cheap reachability probe for the status command.
    async fn check_connection(&self) -> Result<bool, StorageError>;

    /// Human-readable backend description.
    fn describe(&self) -> String;
}

/// Construct the configured object store backend.
///
/// Missing credentials surface here, once, not per call.
pub fn create_object_store(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>, ConfigError> {
    match config.backend {
        StorageBackend::Azure => Ok(Arc::new(AzureBlobStore::new(config)?)),
        StorageBackend::Local => {
            let root = config.local_root.clone().ok_or_else(|| {
                ConfigError::ValidationError(
                    "storage.local_root is required for the local backend".to_string(),
                )
            })?;
            Ok(Arc::new(LocalDirStore::new(root)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_local_requires_root() {
        let config = StorageConfig {
            backend: StorageBackend::Local,
            ..Default::default()
        };
        assert!(create_object_store(&config).is_err());
    }

    #[test]
    fn test_factory_local_with_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            backend: StorageBackend::Local,
            local_root: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let store = create_object_store(&config).unwrap();
        assert!(store.describe().contains("local"));
    }
}
