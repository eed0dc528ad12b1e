mod build;
mod config;
mod objects;
mod status;
mod stores;
mod upload;

pub use build::{BuildArgs, BuildBatchedArgs};
pub use config::ConfigCommand;
pub use objects::ObjectsCommand;
pub use stores::StoresArgs;
pub use upload::UploadArgs;

pub use build::{handle_build, handle_build_batched};
pub use config::handle_config;
pub use objects::handle_objects;
pub use status::handle_status;
pub use stores::handle_stores;
pub use upload::handle_upload;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;

use crate::models::Config;
use crate::provider::{FileStoreProvider, OpenAiFileStore};
use crate::storage::{ObjectStore, create_object_store};

/// Build both remote clients from resolved configuration.
pub(crate) fn connect(
    config: &Config,
) -> Result<(Arc<dyn ObjectStore>, Arc<dyn FileStoreProvider>)> {
    let store = create_object_store(&config.storage)?;
    let provider: Arc<dyn FileStoreProvider> = Arc::new(OpenAiFileStore::new(&config.provider)?);
    Ok((store, provider))
}

/// Parse repeated `--meta key=value` flags into a metadata map.
pub(crate) fn parse_meta(entries: &[String]) -> Result<HashMap<String, String>> {
    let mut metadata = HashMap::new();
    for entry in entries {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("invalid metadata entry '{}', expected key=value", entry))?;
        if key.is_empty() {
            anyhow::bail!("invalid metadata entry '{}', key must not be empty", entry);
        }
        metadata.insert(key.to_string(), value.to_string());
    }
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_meta_accepts_key_value_pairs() {
        let entries = vec!["team=search".to_string(), "env=prod".to_string()];
        let metadata = parse_meta(&entries).unwrap();
        assert_eq!(metadata.get("team").unwrap(), "search");
        assert_eq!(metadata.get("env").unwrap(), "prod");
    }

    #[test]
    fn test_parse_meta_keeps_equals_in_value() {
        let entries = vec!["note=a=b".to_string()];
        let metadata = parse_meta(&entries).unwrap();
        assert_eq!(metadata.get("note").unwrap(), "a=b");
    }

    #[test]
    fn test_parse_meta_rejects_bare_words() {
        assert!(parse_meta(&["plain".to_string()]).is_err());
        assert!(parse_meta(&["=value".to_string()]).is_err());
    }
}
