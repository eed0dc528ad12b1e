//! Re-uploads one stored object to the provider's file store.

use std::sync::Arc;

use tracing::debug;

use crate::error::{PipelineError, StorageError};
use crate::models::{ConversationId, RemoteFileId};
use crate::provider::{FilePurpose, FileStoreProvider};
use crate::storage::ObjectStore;

pub struct FileUploader {
    store: Arc<dyn ObjectStore>,
    provider: Arc<dyn FileStoreProvider>,
}

impl FileUploader {
    pub fn new(store: Arc<dyn ObjectStore>, provider: Arc<dyn FileStoreProvider>) -> Self {
        Self { store, provider }
    }

    /// Stage `conversation_id/file_name` to a scratch file and upload it with
    /// the `assistants` purpose. Every call mints a fresh provider id; there
    /// is no deduplication against earlier uploads of the same object.
    ///
    /// The scratch file is removed on every exit path: the temp file guard
    /// drops on success, on download failure, and on upload failure alike.
    pub async fn upload(
        &self,
        conversation_id: &ConversationId,
        file_name: &str,
    ) -> Result<RemoteFileId, PipelineError> {
        let key = format!("{}{}", conversation_id.prefix(), file_name);

        let scratch = tempfile::Builder::new()
            .prefix("convector-")
            .tempfile()
            .map_err(StorageError::from)?;

        self.store.fetch_to_path(&key, scratch.path()).await?;

        let file_id = self
            .provider
            .upload_file(scratch.path(), file_name, FilePurpose::Assistants)
            .await?;

        debug!(key = %key, file_id = %file_id, "uploaded object to provider");
        Ok(file_id)
    }
}
