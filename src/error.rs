//! Error types for the conversation vector store tooling.

use thiserror::Error;

use crate::utils::retry::Retryable;

/// Errors related to configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("path error: {0}")]
    PathError(String),

    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Errors related to object store operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to connect to object store: {0}")]
    ConnectionError(String),

    #[error("object not found: {0}")]
    NotFound(String),

    #[error("list error: {0}")]
    ListError(String),

    #[error("download error: {0}")]
    DownloadError(String),

    #[error("upload error: {0}")]
    PutError(String),

    #[error("storage request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("invalid listing response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Retryable for StorageError {
    fn is_retryable(&self) -> bool {
        match self {
            StorageError::ConnectionError(_) => true,
            StorageError::RequestError(e) => e.is_timeout() || e.is_connect(),
            StorageError::ListError(msg)
            | StorageError::DownloadError(msg)
            | StorageError::PutError(msg) => {
                let msg_lower = msg.to_lowercase();
                msg_lower.contains("503")
                    || msg_lower.contains("500")
                    || msg_lower.contains("timeout")
                    || msg_lower.contains("server busy")
                    || msg_lower.contains("operation could not be completed")
            }
            // Missing objects and malformed XML do not recover on retry
            StorageError::NotFound(_)
            | StorageError::InvalidResponse(_)
            | StorageError::IoError(_) => false,
        }
    }
}

/// Errors related to the LLM provider's file and vector store surface.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to connect to provider: {0}")]
    ConnectionError(String),

    #[error("provider request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("provider API error: {0}")]
    ApiError(String),

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("provider timeout")]
    Timeout,
}

impl Retryable for ProviderError {
    fn is_retryable(&self) -> bool {
        match self {
            ProviderError::ConnectionError(_) | ProviderError::Timeout => true,
            ProviderError::ApiError(msg) => {
                msg.contains("503")
                    || msg.contains("502")
                    || msg.contains("504")
                    || msg.contains("429")
                    || msg.to_lowercase().contains("unavailable")
                    || msg.to_lowercase().contains("too many requests")
            }
            ProviderError::RequestError(e) => e.is_timeout() || e.is_connect(),
            ProviderError::InvalidResponse(_) => false,
        }
    }
}

/// Errors from the conversation pipeline (aggregation, batching, assembly).
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("conversation id must be non-empty")]
    EmptyConversationId,

    #[error("file id list must be non-empty")]
    EmptyFileIds,

    #[error("batch size must be a positive integer, got {0}")]
    InvalidBatchSize(usize),

    #[error("no files found for conversation {0}")]
    NoFilesFound(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Application-level errors that wrap domain errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_retryable() {
        assert!(StorageError::ConnectionError("refused".into()).is_retryable());
        assert!(StorageError::ListError("503 Service Unavailable".into()).is_retryable());
        assert!(!StorageError::NotFound("c1/a.csv".into()).is_retryable());
        assert!(!StorageError::InvalidResponse("bad xml".into()).is_retryable());
    }

    #[test]
    fn test_provider_retryable() {
        assert!(ProviderError::Timeout.is_retryable());
        assert!(ProviderError::ApiError("429 Too Many Requests".into()).is_retryable());
        assert!(!ProviderError::ApiError("400 Bad Request".into()).is_retryable());
        assert!(!ProviderError::InvalidResponse("missing id".into()).is_retryable());
    }

    #[test]
    fn test_pipeline_error_messages() {
        let err = PipelineError::NoFilesFound("c2".into());
        assert_eq!(err.to_string(), "no files found for conversation c2");

        let err = PipelineError::InvalidBatchSize(0);
        assert!(err.to_string().contains("positive"));
    }
}
