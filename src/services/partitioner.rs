//! Splits file-id sequences into bounded batches and drives store creation
//! once per batch.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::error::PipelineError;
use crate::models::{
    META_BATCH_NUMBER, META_BATCH_SIZE, META_TOTAL_BATCHES, RemoteFileId, VectorStoreId,
};
use crate::provider::FileStoreProvider;
use crate::services::store_builder::VectorStoreBuilder;

/// Partition `items` into contiguous slices of at most `batch_size`,
/// preserving order. The last slice may be shorter. `batch_size` must be
/// positive; callers validate before reaching this point.
pub fn partition<T>(items: &[T], batch_size: usize) -> Vec<&[T]> {
    items.chunks(batch_size).collect()
}

pub struct BatchedStoreBuilder {
    builder: VectorStoreBuilder,
}

impl BatchedStoreBuilder {
    pub fn new(provider: Arc<dyn FileStoreProvider>) -> Self {
        Self {
            builder: VectorStoreBuilder::new(provider),
        }
    }

    /// Create one vector store per batch, in input order, stamping each with
    /// its 1-based batch number, the total batch count, and the actual slice
    /// length. A failed batch is logged and skipped: the call returns `Ok`
    /// with whatever subset succeeded, which degenerates to `Ok(vec![])`
    /// when every batch fails.
    pub async fn create_batched(
        &self,
        file_ids: &[RemoteFileId],
        batch_size: usize,
        base_metadata: HashMap<String, String>,
    ) -> Result<Vec<VectorStoreId>, PipelineError> {
        if batch_size == 0 {
            return Err(PipelineError::InvalidBatchSize(batch_size));
        }
        if file_ids.is_empty() {
            return Err(PipelineError::EmptyFileIds);
        }

        let batches = partition(file_ids, batch_size);
        let total = batches.len();

        let mut store_ids = Vec::new();
        for (index, batch) in batches.into_iter().enumerate() {
            let mut metadata = base_metadata.clone();
            metadata.insert(META_BATCH_NUMBER.to_string(), (index + 1).to_string());
            metadata.insert(META_TOTAL_BATCHES.to_string(), total.to_string());
            metadata.insert(META_BATCH_SIZE.to_string(), batch.len().to_string());

            match self.builder.create_from_file_ids(batch, metadata).await {
                Ok(store_id) => store_ids.push(store_id),
                Err(e) => {
                    warn!(
                        batch = index + 1,
                        total,
                        error = %e,
                        "vector store creation failed for batch, skipping"
                    );
                }
            }
        }

        Ok(store_ids)
    }
}
