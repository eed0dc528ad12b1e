//! Azure OpenAI client for the files and vector-stores surface.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::error::{ConfigError, ProviderError};
use crate::models::{ProviderConfig, RemoteFileId, VectorStoreId, VectorStorePage};
use crate::provider::{CreateVectorStore, FilePurpose, FileStoreProvider};
use crate::utils::retry::{RetryConfig, with_retry};

/// Response carrying only the minted identifier.
#[derive(Debug, Deserialize)]
struct IdResponse {
    id: String,
}

pub struct OpenAiFileStore {
    client: Client,
    base_url: String,
    api_key: String,
    api_version: String,
    retry: RetryConfig,
}

impl OpenAiFileStore {
    /// Build a client from configuration. Missing endpoint or key is fatal
    /// here, not on first use.
    pub fn new(config: &ProviderConfig) -> Result<Self, ConfigError> {
        let base_url = config
            .endpoint
            .as_deref()
            .ok_or(ConfigError::MissingEnv("AZURE_OPENAI_ENDPOINT"))?
            .trim_end_matches('/')
            .to_string();
        let api_key = config
            .api_key
            .clone()
            .ok_or(ConfigError::MissingEnv("AZURE_OPENAI_API_KEY"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            api_key,
            api_version: config.api_version.clone(),
            retry: RetryConfig::default(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/openai/{}?api-version={}",
            self.base_url, path, self.api_version
        )
    }

    fn map_request_error(e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout
        } else if e.is_connect() {
            ProviderError::ConnectionError(e.to_string())
        } else {
            ProviderError::RequestError(e)
        }
    }

    async fn parse_id(response: Response) -> Result<String, ProviderError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError(format!(
                "status {}: {}",
                status, body
            )));
        }

        let parsed: IdResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        Ok(parsed.id)
    }
}

#[async_trait]
impl FileStoreProvider for OpenAiFileStore {
    async fn upload_file(
        &self,
        path: &Path,
        file_name: &str,
        purpose: FilePurpose,
    ) -> Result<RemoteFileId, ProviderError> {
        // Read once so the multipart form can be rebuilt per retry attempt
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ProviderError::ApiError(format!(
                "failed to read staged file {}: {}",
                path.display(),
                e
            ))
        })?;

        let id = with_retry(&self.retry, || {
            let bytes = bytes.clone();
            async move {
                let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
                let form = multipart::Form::new()
                    .text("purpose", purpose.as_str())
                    .part("file", part);

                let response = self
                    .client
                    .post(self.url("files"))
                    .header("api-key", &self.api_key)
                    .multipart(form)
                    .send()
                    .await
                    .map_err(Self::map_request_error)?;

                Self::parse_id(response).await
            }
        })
        .await
        .into_result()?;

        Ok(RemoteFileId(id))
    }

    async fn create_vector_store(
        &self,
        request: CreateVectorStore,
    ) -> Result<VectorStoreId, ProviderError> {
        let id = with_retry(&self.retry, || async {
            let response = self
                .client
                .post(self.url("vector_stores"))
                .header("api-key", &self.api_key)
                .json(&request)
                .send()
                .await
                .map_err(Self::map_request_error)?;

            Self::parse_id(response).await
        })
        .await
        .into_result()?;

        Ok(VectorStoreId(id))
    }

    async fn list_vector_stores(
        &self,
        limit: u32,
        after: Option<&str>,
    ) -> Result<VectorStorePage, ProviderError> {
        with_retry(&self.retry, || async {
            let mut url = format!("{}&limit={}", self.url("vector_stores"), limit);
            if let Some(after) = after {
                url.push_str("&after=");
                url.push_str(&urlencoding::encode(after));
            }

            let response = self
                .client
                .get(&url)
                .header("api-key", &self.api_key)
                .send()
                .await
                .map_err(Self::map_request_error)?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(ProviderError::ApiError(format!(
                    "status {}: {}",
                    status, body
                )));
            }

            response
                .json::<VectorStorePage>()
                .await
                .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
        })
        .await
        .into_result()
    }

    async fn check_connection(&self) -> Result<bool, ProviderError> {
        let url = format!("{}&limit=1", self.url("vector_stores"));
        let response = self
            .client
            .get(&url)
            .header("api-key", &self.api_key)
            .send()
            .await
            .map_err(Self::map_request_error)?;

        Ok(response.status().is_success())
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ProviderConfig {
        ProviderConfig {
            endpoint: Some("https://res.openai.azure.com/".to_string()),
            api_key: Some("key".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_requires_credentials() {
        let mut missing = config();
        missing.endpoint = None;
        assert!(matches!(
            OpenAiFileStore::new(&missing),
            Err(ConfigError::MissingEnv("AZURE_OPENAI_ENDPOINT"))
        ));

        let mut missing = config();
        missing.api_key = None;
        assert!(matches!(
            OpenAiFileStore::new(&missing),
            Err(ConfigError::MissingEnv("AZURE_OPENAI_API_KEY"))
        ));
    }

    #[test]
    fn test_url_building() {
        let store = OpenAiFileStore::new(&config()).unwrap();
        assert_eq!(
            store.url("files"),
            format!(
                "https://res.openai.azure.com/openai/files?api-version={}",
                crate::models::DEFAULT_API_VERSION
            )
        );
    }

    #[test]
    fn test_page_deserialization() {
        let body = r#"{
            "data": [
                {"id": "vs_1", "name": "conversation-store-1", "metadata": {"conversationId": "c1"}},
                {"id": "vs_2", "metadata": null}
            ],
            "has_more": true,
            "last_id": "vs_2"
        }"#;
        let page: VectorStorePage = serde_json::from_str(body).unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].id.as_str(), "vs_1");
        assert_eq!(
            page.data[0].metadata.get("conversationId").unwrap(),
            "c1"
        );
        assert!(page.has_more);
        assert_eq!(page.last_id.as_deref(), Some("vs_2"));
    }
}
