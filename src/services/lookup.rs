//! Finds a conversation's vector stores by stamped metadata.

use std::sync::Arc;

use tracing::debug;

use crate::error::PipelineError;
use crate::models::{ConversationId, META_CONVERSATION_ID, VectorStoreId};
use crate::provider::FileStoreProvider;

pub struct VectorStoreLookup {
    provider: Arc<dyn FileStoreProvider>,
    page_size: u32,
}

impl VectorStoreLookup {
    pub fn new(provider: Arc<dyn FileStoreProvider>, page_size: u32) -> Self {
        Self {
            provider,
            page_size,
        }
    }

    /// The provider's list API has no server-side metadata filter, so this
    /// drains the listing page by page and filters client-side on the
    /// stamped `conversationId`.
    pub async fn list_for_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<VectorStoreId>, PipelineError> {
        let mut matches = Vec::new();
        let mut after: Option<String> = None;
        let mut pages = 0u32;

        loop {
            let page = self
                .provider
                .list_vector_stores(self.page_size, after.as_deref())
                .await?;
            pages += 1;

            for store in &page.data {
                if store.metadata.get(META_CONVERSATION_ID).map(String::as_str)
                    == Some(conversation_id.as_str())
                {
                    matches.push(store.id.clone());
                }
            }

            match (page.has_more, page.last_id) {
                (true, Some(last_id)) => after = Some(last_id),
                // A has_more page without a cursor cannot be continued
                _ => break,
            }
        }

        debug!(
            conversation = %conversation_id,
            pages,
            matches = matches.len(),
            "vector store lookup complete"
        );
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{VectorStorePage, VectorStoreSummary};
    use crate::services::mock::MockProvider;
    use std::collections::HashMap;
    use std::sync::atomic::Ordering;

    fn summary(id: &str, conversation: Option<&str>) -> VectorStoreSummary {
        let mut metadata = HashMap::new();
        if let Some(c) = conversation {
            metadata.insert(META_CONVERSATION_ID.to_string(), c.to_string());
        }
        VectorStoreSummary {
            id: VectorStoreId(id.to_string()),
            name: None,
            metadata,
        }
    }

    #[tokio::test]
    async fn test_filters_on_conversation_metadata() {
        let page = VectorStorePage {
            data: vec![
                summary("vs-1", Some("x")),
                summary("vs-2", Some("y")),
                summary("vs-3", Some("x")),
                summary("vs-4", None),
            ],
            has_more: false,
            last_id: None,
        };
        let provider = Arc::new(MockProvider::with_pages(vec![page]));
        let lookup = VectorStoreLookup::new(provider, 100);

        let ids = lookup
            .list_for_conversation(&ConversationId::new("x").unwrap())
            .await
            .unwrap();
        let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["vs-1", "vs-3"]);
    }

    #[tokio::test]
    async fn test_drains_every_page_before_filtering() {
        let pages = vec![
            VectorStorePage {
                data: vec![summary("vs-1", Some("x"))],
                has_more: true,
                last_id: Some("vs-1".to_string()),
            },
            VectorStorePage {
                data: vec![summary("vs-2", Some("y")), summary("vs-3", Some("x"))],
                has_more: true,
                last_id: Some("vs-3".to_string()),
            },
            VectorStorePage {
                data: vec![summary("vs-4", Some("x"))],
                has_more: false,
                last_id: None,
            },
        ];
        let provider = Arc::new(MockProvider::with_pages(pages));
        let lookup = VectorStoreLookup::new(provider.clone(), 100);

        let ids = lookup
            .list_for_conversation(&ConversationId::new("x").unwrap())
            .await
            .unwrap();
        let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["vs-1", "vs-3", "vs-4"]);
        assert_eq!(provider.list_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_no_matches_is_empty_success() {
        let provider = Arc::new(MockProvider::default());
        let lookup = VectorStoreLookup::new(provider, 100);

        let ids = lookup
            .list_for_conversation(&ConversationId::new("missing").unwrap())
            .await
            .unwrap();
        assert!(ids.is_empty());
    }
}
