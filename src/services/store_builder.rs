//! Materializes one vector store from already-uploaded file ids.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::PipelineError;
use crate::models::{RemoteFileId, VectorStoreId};
use crate::provider::{CreateVectorStore, FileStoreProvider};

pub struct VectorStoreBuilder {
    provider: Arc<dyn FileStoreProvider>,
}

impl VectorStoreBuilder {
    pub fn new(provider: Arc<dyn FileStoreProvider>) -> Self {
        Self { provider }
    }

    /// One store-creation call carrying all file ids and the metadata map.
    /// An empty id list is rejected locally, before any network call. The
    /// display name is timestamp-derived, not caller-controlled.
    pub async fn create_from_file_ids(
        &self,
        file_ids: &[RemoteFileId],
        metadata: HashMap<String, String>,
    ) -> Result<VectorStoreId, PipelineError> {
        if file_ids.is_empty() {
            return Err(PipelineError::EmptyFileIds);
        }

        let request = CreateVectorStore {
            name: store_name(Utc::now()),
            file_ids: file_ids.to_vec(),
            metadata,
        };

        let store_id = self.provider.create_vector_store(request).await?;
        info!(store_id = %store_id, files = file_ids.len(), "created vector store");
        Ok(store_id)
    }
}

fn store_name(now: DateTime<Utc>) -> String {
    format!("conversation-store-{}", now.format("%Y%m%d-%H%M%S"))
}
