//! LLM provider collaborator: file uploads and vector store assembly.
//!
//! The pipeline consumes the provider through [`FileStoreProvider`] so the
//! service layer tests against an in-memory fake. Identifiers returned here
//! are provider-owned; nothing in this crate deletes them.

mod openai;

pub use openai::OpenAiFileStore;

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::ProviderError;
use crate::models::{RemoteFileId, VectorStoreId, VectorStorePage};

/// Purpose tag attached to uploaded files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilePurpose {
    Assistants,
}

impl FilePurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilePurpose::Assistants => "assistants",
        }
    }
}

/// Store-creation request. The file id set is fixed at creation time; the
/// API offers no mutation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateVectorStore {
    pub name: String,
    pub file_ids: Vec<RemoteFileId>,
    pub metadata: HashMap<String, String>,
}

/// Provider file store and retrieval index surface.
#[async_trait]
pub trait FileStoreProvider: Send + Sync {
    /// Upload one local file, returning the provider-assigned id. Uploading
    /// the same content twice mints two ids; there is no deduplication.
    async fn upload_file(
        &self,
        path: &Path,
        file_name: &str,
        purpose: FilePurpose,
    ) -> Result<RemoteFileId, ProviderError>;

    /// Materialize one vector store from already-uploaded file ids.
    async fn create_vector_store(
        &self,
        request: CreateVectorStore,
    ) -> Result<VectorStoreId, ProviderError>;

    /// One page of the vector store listing. There is no server-side
    /// metadata filter; callers paginate and filter client-side.
    async fn list_vector_stores(
        &self,
        limit: u32,
        after: Option<&str>,
    ) -> Result<VectorStorePage, ProviderError>;

    /// Cheap reachability probe for the status command.
    async fn check_connection(&self) -> Result<bool, ProviderError>;

    /// Human-readable endpoint description.
    fn describe(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purpose_wire_value() {
        assert_eq!(FilePurpose::Assistants.as_str(), "assistants");
        assert_eq!(
            serde_json::to_string(&FilePurpose::Assistants).unwrap(),
            "\"assistants\""
        );
    }
}
