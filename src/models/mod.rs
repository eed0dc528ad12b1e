mod config;
mod conversation;
mod format;

pub use config::{
    Config, DEFAULT_API_VERSION, DEFAULT_BATCH_SIZE, DEFAULT_CONTAINER, DEFAULT_LIST_PAGE_SIZE,
    DEFAULT_STORAGE_API_VERSION, PipelineConfig, ProviderConfig, StorageBackend, StorageConfig,
};
pub use conversation::{
    ConversationId, FailedUpload, META_BATCH_NUMBER, META_BATCH_SIZE, META_CONVERSATION_ID,
    META_CREATED_AT, META_TOTAL_BATCHES, RemoteFileId, StoredObject, UploadReport, VectorStoreId,
    VectorStorePage, VectorStoreSummary,
};
pub use format::OutputFormat;
