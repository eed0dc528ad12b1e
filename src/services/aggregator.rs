//! Lists a conversation's objects and uploads each one to the provider.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::PipelineError;
use crate::models::{ConversationId, FailedUpload, UploadReport};
use crate::provider::FileStoreProvider;
use crate::services::uploader::FileUploader;
use crate::storage::ObjectStore;

pub struct ConversationAggregator {
    store: Arc<dyn ObjectStore>,
    uploader: FileUploader,
}

impl ConversationAggregator {
    pub fn new(store: Arc<dyn ObjectStore>, provider: Arc<dyn FileStoreProvider>) -> Self {
        let uploader = FileUploader::new(store.clone(), provider);
        Self { store, uploader }
    }

    /// Upload every object under the conversation prefix, sequentially and in
    /// listing order. A failed upload is recorded and the loop continues; only
    /// a failure of the listing itself aborts the call. Zero discovered
    /// objects is an empty success, not an error.
    pub async fn list_and_upload(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<UploadReport, PipelineError> {
        let prefix = conversation_id.prefix();
        let objects = self.store.list(&prefix).await?;
        debug!(conversation = %conversation_id, count = objects.len(), "listed conversation objects");

        let mut report = UploadReport::default();
        for object in objects {
            let name = object.key.strip_prefix(&prefix).unwrap_or(&object.key);
            // Prefix-only directory markers resolve to an empty name
            if name.is_empty() {
                continue;
            }

            match self.uploader.upload(conversation_id, name).await {
                Ok(file_id) => report.uploaded.push(file_id),
                Err(e) => {
                    warn!(
                        conversation = %conversation_id,
                        file = %name,
                        error = %e,
                        "upload failed, continuing with remaining files"
                    );
                    report.failed.push(FailedUpload {
                        name: name.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if !report.failed.is_empty() {
            warn!(
                conversation = %conversation_id,
                uploaded = report.uploaded.len(),
                failed = report.failed.len(),
                "conversation aggregation completed with failures"
            );
        }

        Ok(report)
    }
}
