//! Azure Blob Storage backend over the REST surface.
//!
//! Authentication is a SAS token appended to every request; SharedKey request
//! signing is intentionally not implemented. Listing responses are XML and
//! parsed with a small event loop so arbitrary metadata element names survive
//! as map keys.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::Event;
use reqwest::{Client, StatusCode, header::HeaderName};

use crate::error::{ConfigError, StorageError};
use crate::models::{DEFAULT_STORAGE_API_VERSION, StorageConfig, StoredObject};
use crate::storage::ObjectStore;

pub struct AzureBlobStore {
    client: Client,
    base_url: String,
    container: String,
    sas_token: String,
}

impl AzureBlobStore {
    /// Build a store from configuration. Missing account name or SAS token
    /// is fatal here, per-call operations assume a constructed client.
    pub fn new(config: &StorageConfig) -> Result<Self, ConfigError> {
        let account = config
            .account
            .as_deref()
            .ok_or(ConfigError::MissingEnv("AZURE_STORAGE_ACCOUNT_NAME"))?;
        let sas_token = config
            .sas_token
            .as_deref()
            .ok_or(ConfigError::MissingEnv("AZURE_STORAGE_SAS_TOKEN"))?
            .trim_start_matches('?')
            .to_string();

        let base_url = config
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("https://{}.blob.core.windows.net", account))
            .trim_end_matches('/')
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            container: config.container.clone(),
            sas_token,
        })
    }

    fn container_url(&self) -> String {
        format!("{}/{}", self.base_url, self.container)
    }

    fn blob_url(&self, key: &str) -> String {
        let encoded: Vec<String> = key
            .split('/')
            .map(|seg| urlencoding::encode(seg).into_owned())
            .collect();
        format!(
            "{}/{}?{}",
            self.container_url(),
            encoded.join("/"),
            self.sas_token
        )
    }

    fn list_url(&self, prefix: &str, marker: Option<&str>) -> String {
        let mut url = format!(
            "{}?restype=container&comp=list&include=metadata&prefix={}&{}",
            self.container_url(),
            urlencoding::encode(prefix),
            self.sas_token
        );
        if let Some(marker) = marker {
            url.push_str("&marker=");
            url.push_str(&urlencoding::encode(marker));
        }
        url
    }
}

#[async_trait]
impl ObjectStore for AzureBlobStore {
    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>, StorageError> {
        let mut objects = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let url = self.list_url(prefix, marker.as_deref());
            let response = self
                .client
                .get(&url)
                .header("x-ms-version", DEFAULT_STORAGE_API_VERSION)
                .send()
                .await
                .map_err(|e| StorageError::ConnectionError(e.to_string()))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(StorageError::ListError(format!(
                    "status {}: {}",
                    status, body
                )));
            }

            let body = response.text().await?;
            let (mut page, next_marker) = parse_list_response(&body)?;
            objects.append(&mut page);

            match next_marker {
                Some(m) if !m.is_empty() => marker = Some(m),
                _ => break,
            }
        }

        Ok(objects)
    }

    async fn fetch_to_path(&self, key: &str, dest: &Path) -> Result<(), StorageError> {
        let response = self
            .client
            .get(self.blob_url(key))
            .header("x-ms-version", DEFAULT_STORAGE_API_VERSION)
            .send()
            .await
            .map_err(|e| StorageError::ConnectionError(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(key.to_string()));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::DownloadError(format!(
                "status {}: {}",
                status, body
            )));
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(dest, &bytes).await?;
        Ok(())
    }

    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        metadata: &HashMap<String, String>,
    ) -> Result<(), StorageError> {
        let mut request = self
            .client
            .put(self.blob_url(key))
            .header("x-ms-version", DEFAULT_STORAGE_API_VERSION)
            .header("x-ms-blob-type", "BlockBlob")
            .header("Content-Type", content_type);

        for (name, value) in metadata {
            let header = HeaderName::from_bytes(format!("x-ms-meta-{}", name).as_bytes())
                .map_err(|e| StorageError::PutError(format!("invalid metadata key: {}", e)))?;
            request = request.header(header, value);
        }

        let response = request
            .body(bytes)
            .send()
            .await
            .map_err(|e| StorageError::ConnectionError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::PutError(format!(
                "status {}: {}",
                status, body
            )));
        }

        Ok(())
    }

    async fn check_connection(&self) -> Result<bool, StorageError> {
        let url = format!(
            "{}?restype=container&comp=list&maxresults=1&{}",
            self.container_url(),
            self.sas_token
        );
        let response = self
            .client
            .get(&url)
            .header("x-ms-version", DEFAULT_STORAGE_API_VERSION)
            .send()
            .await
            .map_err(|e| StorageError::ConnectionError(e.to_string()))?;

        Ok(response.status().is_success())
    }

    fn describe(&self) -> String {
        format!("azure://{}/{}", self.base_url, self.container)
    }
}

/// Parse one page of a `List Blobs` response into objects plus the
/// continuation marker, if any.
fn parse_list_response(
    xml: &str,
) -> Result<(Vec<StoredObject>, Option<String>), StorageError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut objects = Vec::new();
    let mut next_marker: Option<String> = None;

    let mut path: Vec<String> = Vec::new();
    let mut name: Option<String> = None;
    let mut metadata: HashMap<String, String> = HashMap::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                path.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Ok(Event::Text(t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| StorageError::InvalidResponse(e.to_string()))?
                    .into_owned();

                match path.as_slice() {
                    [.., blob, tag] if blob == "Blob" && tag == "Name" => {
                        name = Some(text);
                    }
                    [.., meta, key] if meta == "Metadata" => {
                        metadata.insert(key.clone(), text);
                    }
                    [_, tag] if tag == "NextMarker" => {
                        next_marker = Some(text);
                    }
                    _ => {}
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"Blob"
                    && let Some(key) = name.take()
                {
                    objects.push(StoredObject::with_metadata(key, std::mem::take(&mut metadata)));
                }
                path.pop();
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(StorageError::InvalidResponse(e.to_string())),
        }
    }

    Ok((objects, next_marker))
}
