//! In-memory collaborator fakes for service-layer tests.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use crate::error::{ProviderError, StorageError};
use crate::models::{RemoteFileId, StoredObject, VectorStoreId, VectorStorePage};
use crate::provider::{CreateVectorStore, FilePurpose, FileStoreProvider};
use crate::storage::ObjectStore;

#[derive(Default)]
pub(crate) struct MockObjectStore {
    pub objects: Mutex<Vec<StoredObject>>,
    pub fail_list: bool,
    pub fail_fetch: Mutex<HashSet<String>>,
    pub puts: Mutex<Vec<String>>,
}

impl MockObjectStore {
    pub fn with_keys(keys: &[&str]) -> Self {
        Self {
            objects: Mutex::new(keys.iter().map(|k| StoredObject::new(*k)).collect()),
            ..Default::default()
        }
    }

    pub fn failing_list() -> Self {
        Self {
            fail_list: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>, StorageError> {
        if self.fail_list {
            return Err(StorageError::ConnectionError(
                "storage credentials missing".to_string(),
            ));
        }
        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.key.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn fetch_to_path(&self, key: &str, dest: &Path) -> Result<(), StorageError> {
        if self.fail_fetch.lock().unwrap().contains(key) {
            return Err(StorageError::DownloadError(format!(
                "simulated download failure for {}",
                key
            )));
        }
        let exists = self.objects.lock().unwrap().iter().any(|o| o.key == key);
        if !exists {
            return Err(StorageError::NotFound(key.to_string()));
        }
        std::fs::write(dest, b"mock object content")?;
        Ok(())
    }

    async fn put(
        &self,
        key: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
        _metadata: &HashMap<String, String>,
    ) -> Result<(), StorageError> {
        self.objects.lock().unwrap().push(StoredObject::new(key));
        self.puts.lock().unwrap().push(key.to_string());
        Ok(())
    }

    async fn check_connection(&self) -> Result<bool, StorageError> {
        Ok(!self.fail_list)
    }

    fn describe(&self) -> String {
        "mock://objects".to_string()
    }
}

#[derive(Default)]
pub(crate) struct MockProvider {
    pub upload_calls: AtomicU32,
    pub create_calls: AtomicU32,
    pub list_calls: AtomicU32,
    /// File names whose upload fails.
    pub fail_uploads: Mutex<HashSet<String>>,
    /// Zero-based create-call indexes that fail.
    pub fail_creates: Mutex<HashSet<u32>>,
    /// Every store-creation request, in call order.
    pub created: Mutex<Vec<CreateVectorStore>>,
    /// Listing pages served in order; a default page once exhausted.
    pub pages: Mutex<Vec<VectorStorePage>>,
    id_counter: AtomicU32,
}

impl MockProvider {
    pub fn failing_upload_of(name: &str) -> Self {
        let provider = Self::default();
        provider.fail_uploads.lock().unwrap().insert(name.to_string());
        provider
    }

    pub fn with_pages(pages: Vec<VectorStorePage>) -> Self {
        Self {
            pages: Mutex::new(pages),
            ..Default::default()
        }
    }
}

#[async_trait]
impl FileStoreProvider for MockProvider {
    async fn upload_file(
        &self,
        _path: &Path,
        file_name: &str,
        purpose: FilePurpose,
    ) -> Result<RemoteFileId, ProviderError> {
        assert_eq!(purpose, FilePurpose::Assistants);
        self.upload_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_uploads.lock().unwrap().contains(file_name) {
            return Err(ProviderError::ApiError(format!(
                "simulated upload failure for {}",
                file_name
            )));
        }

        let n = self.id_counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(RemoteFileId(format!("file-{}", n)))
    }

    async fn create_vector_store(
        &self,
        request: CreateVectorStore,
    ) -> Result<VectorStoreId, ProviderError> {
        let index = self.create_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_creates.lock().unwrap().contains(&index) {
            return Err(ProviderError::ApiError(format!(
                "simulated create failure for call {}",
                index
            )));
        }

        self.created.lock().unwrap().push(request);
        Ok(VectorStoreId(format!("vs-{}", index + 1)))
    }

    async fn list_vector_stores(
        &self,
        _limit: u32,
        _after: Option<&str>,
    ) -> Result<VectorStorePage, ProviderError> {
        let index = self.list_calls.fetch_add(1, Ordering::SeqCst) as usize;
        let pages = self.pages.lock().unwrap();
        Ok(pages.get(index).cloned().unwrap_or_default())
    }

    async fn check_connection(&self) -> Result<bool, ProviderError> {
        Ok(true)
    }

    fn describe(&self) -> String {
        "mock://provider".to_string()
    }
}
