//! Domain types for conversation-scoped file staging.
//!
//! Identifiers minted by the provider (`RemoteFileId`, `VectorStoreId`) are
//! opaque strings owned remotely; this crate never deletes or mutates them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Metadata keys stamped onto vector stores, as they appear on the wire.
pub const META_CONVERSATION_ID: &str = "conversationId";
pub const META_CREATED_AT: &str = "createdAt";
pub const META_BATCH_NUMBER: &str = "batchNumber";
pub const META_TOTAL_BATCHES: &str = "totalBatches";
pub const META_BATCH_SIZE: &str = "batchSize";

/// Grouping key under which a conversation's files live in the object store.
///
/// The only validation is non-emptiness; the id doubles as the key prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Result<Self, PipelineError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(PipelineError::EmptyConversationId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The object-store key prefix for this conversation.
    pub fn prefix(&self) -> String {
        format!("{}/", self.0)
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ConversationId {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// One listing entry from the object store. The key is the full object key;
/// metadata is whatever the storage layer attached and is passed through
/// uninterpreted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredObject {
    pub key: String,

    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl StoredObject {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(key: impl Into<String>, metadata: HashMap<String, String>) -> Self {
        Self {
            key: key.into(),
            metadata,
        }
    }
}

/// Provider-assigned identifier for an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteFileId(pub String);

impl RemoteFileId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RemoteFileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Provider-assigned identifier for a vector store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorStoreId(pub String);

impl VectorStoreId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VectorStoreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row from the provider's vector store listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreSummary {
    pub id: VectorStoreId,

    #[serde(default)]
    pub name: Option<String>,

    // The provider serializes absent metadata as null, not {}
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: HashMap<String, String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One page of the provider's vector store listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorStorePage {
    #[serde(default)]
    pub data: Vec<VectorStoreSummary>,

    #[serde(default)]
    pub has_more: bool,

    #[serde(default)]
    pub last_id: Option<String>,
}

/// A single failed upload inside an aggregation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedUpload {
    /// Object name relative to the conversation prefix.
    pub name: String,
    pub reason: String,
}

/// Outcome of aggregating one conversation: the ids that uploaded, in
/// listing order, plus the objects that did not.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadReport {
    pub uploaded: Vec<RemoteFileId>,
    pub failed: Vec<FailedUpload>,
}

impl UploadReport {
    pub fn is_empty(&self) -> bool {
        self.uploaded.is_empty() && self.failed.is_empty()
    }

    pub fn file_ids(&self) -> &[RemoteFileId] {
        &self.uploaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_id_rejects_empty() {
        assert!(matches!(
            ConversationId::new(""),
            Err(PipelineError::EmptyConversationId)
        ));
        assert!(matches!(
            ConversationId::new("   "),
            Err(PipelineError::EmptyConversationId)
        ));
    }

    #[test]
    fn test_conversation_prefix() {
        let id = ConversationId::new("c1").unwrap();
        assert_eq!(id.prefix(), "c1/");
        assert_eq!(id.as_str(), "c1");
    }

    #[test]
    fn test_upload_report_empty() {
        let report = UploadReport::default();
        assert!(report.is_empty());
        assert!(report.file_ids().is_empty());
    }

    #[test]
    fn test_remote_ids_serialize_transparent() {
        let id = RemoteFileId("file-abc".to_string());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"file-abc\"");

        let store: VectorStoreId = serde_json::from_str("\"vs_1\"").unwrap();
        assert_eq!(store.as_str(), "vs_1");
    }
}
