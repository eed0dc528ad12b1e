//! End-to-end orchestration: stage a conversation's objects, upload them,
//! and assemble vector stores.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::error::PipelineError;
use crate::models::{
    ConversationId, META_CONVERSATION_ID, META_CREATED_AT, PipelineConfig, UploadReport,
    VectorStoreId,
};
use crate::provider::FileStoreProvider;
use crate::services::aggregator::ConversationAggregator;
use crate::services::lookup::VectorStoreLookup;
use crate::services::partitioner::BatchedStoreBuilder;
use crate::services::store_builder::VectorStoreBuilder;
use crate::storage::ObjectStore;

pub struct ConversationPipeline {
    aggregator: ConversationAggregator,
    builder: VectorStoreBuilder,
    batched: BatchedStoreBuilder,
    lookup: VectorStoreLookup,
    batch_size: usize,
}

impl ConversationPipeline {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        provider: Arc<dyn FileStoreProvider>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            aggregator: ConversationAggregator::new(store, provider.clone()),
            builder: VectorStoreBuilder::new(provider.clone()),
            batched: BatchedStoreBuilder::new(provider.clone()),
            lookup: VectorStoreLookup::new(provider, config.list_page_size),
            batch_size: config.batch_size,
        }
    }

    /// Upload every object under the conversation prefix without building a
    /// store. Partial failures are reported, not raised.
    pub async fn upload_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<UploadReport, PipelineError> {
        self.aggregator.list_and_upload(conversation_id).await
    }

    /// Upload the conversation's objects and build one vector store over
    /// everything that made it through. A conversation with no uploadable
    /// files is an error here: there is nothing to put in the store.
    pub async fn create_from_conversation(
        &self,
        conversation_id: &ConversationId,
        extra_metadata: HashMap<String, String>,
    ) -> Result<VectorStoreId, PipelineError> {
        let report = self.aggregator.list_and_upload(conversation_id).await?;
        if report.uploaded.is_empty() {
            return Err(PipelineError::NoFilesFound(conversation_id.to_string()));
        }

        let metadata = merged_metadata(conversation_id, extra_metadata);
        let store_id = self
            .builder
            .create_from_file_ids(&report.uploaded, metadata)
            .await?;
        info!(
            conversation = %conversation_id,
            store_id = %store_id,
            files = report.uploaded.len(),
            "built vector store from conversation"
        );
        Ok(store_id)
    }

    /// Batched variant: upload, partition into `batch_size` slices, and build
    /// one store per slice. Unlike [`create_from_conversation`], an empty
    /// conversation yields `Ok(vec![])` since zero files partition into zero
    /// batches. The batch size is still validated up front.
    ///
    /// [`create_from_conversation`]: ConversationPipeline::create_from_conversation
    pub async fn create_batched_from_conversation(
        &self,
        conversation_id: &ConversationId,
        extra_metadata: HashMap<String, String>,
    ) -> Result<Vec<VectorStoreId>, PipelineError> {
        if self.batch_size == 0 {
            return Err(PipelineError::InvalidBatchSize(self.batch_size));
        }

        let report = self.aggregator.list_and_upload(conversation_id).await?;
        if report.uploaded.is_empty() {
            return Ok(Vec::new());
        }

        let metadata = merged_metadata(conversation_id, extra_metadata);
        let store_ids = self
            .batched
            .create_batched(&report.uploaded, self.batch_size, metadata)
            .await?;
        info!(
            conversation = %conversation_id,
            stores = store_ids.len(),
            files = report.uploaded.len(),
            "built batched vector stores from conversation"
        );
        Ok(store_ids)
    }

    /// Find every vector store previously stamped with this conversation id.
    pub async fn stores_for_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<VectorStoreId>, PipelineError> {
        self.lookup.list_for_conversation(conversation_id).await
    }
}

/// Base metadata stamped on every store: the conversation id and a creation
/// timestamp. Caller-supplied entries win on key collision.
fn merged_metadata(
    conversation_id: &ConversationId,
    extra: HashMap<String, String>,
) -> HashMap<String, String> {
    let mut metadata = HashMap::new();
    metadata.insert(
        META_CONVERSATION_ID.to_string(),
        conversation_id.to_string(),
    );
    metadata.insert(META_CREATED_AT.to_string(), Utc::now().to_rfc3339());
    metadata.extend(extra);
    metadata
}
