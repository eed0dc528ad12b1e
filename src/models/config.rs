use serde::{Deserialize, Serialize};

pub const DEFAULT_CONTAINER: &str = "conversations";
pub const DEFAULT_BATCH_SIZE: usize = 20;
pub const DEFAULT_LIST_PAGE_SIZE: u32 = 100;
pub const DEFAULT_API_VERSION: &str = "2024-05-01-preview";
pub const DEFAULT_STORAGE_API_VERSION: &str = "2021-08-06";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Config {
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|p| p.join("convector").join("config.toml"))
    }

    /// Load the config file if present, then overlay environment variables.
    pub fn load() -> Result<Self, crate::error::ConfigError> {
        let mut config = if let Some(path) = Self::config_path()
            && path.exists()
        {
            let content = std::fs::read_to_string(&path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn save(&self) -> Result<(), crate::error::ConfigError> {
        let path = Self::config_path().ok_or_else(|| {
            crate::error::ConfigError::PathError("could not determine config directory".to_string())
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Overlay values from the environment. Secrets (SAS token, API key) are
    /// never read from the config file, only from here.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("AZURE_STORAGE_ACCOUNT_NAME") {
            self.storage.account = Some(v);
        }
        if let Some(v) = lookup("AZURE_STORAGE_CONTAINER_NAME") {
            self.storage.container = v;
        }
        if let Some(v) = lookup("AZURE_STORAGE_ENDPOINT") {
            self.storage.endpoint = Some(v);
        }
        self.storage.sas_token = lookup("AZURE_STORAGE_SAS_TOKEN");
        if let Some(v) = lookup("AZURE_OPENAI_ENDPOINT") {
            self.provider.endpoint = Some(v);
        }
        self.provider.api_key = lookup("AZURE_OPENAI_API_KEY");
        if let Some(v) = lookup("AZURE_OPENAI_API_VERSION") {
            self.provider.api_version = v;
        }
    }
}

/// Which object store backend to construct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Azure,
    Local,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Azure => write!(f, "azure"),
            StorageBackend::Local => write!(f, "local"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Storage account name. Required for the azure backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,

    #[serde(default = "default_container")]
    pub container: String,

    /// Endpoint override (e.g. an Azurite emulator). Derived from the
    /// account name when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// SAS token, environment-only.
    #[serde(skip)]
    pub sas_token: Option<String>,

    /// Root directory for the local backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_root: Option<std::path::PathBuf>,

    #[serde(default = "default_storage_timeout")]
    pub timeout_secs: u64,
}

fn default_container() -> String {
    DEFAULT_CONTAINER.to_string()
}

fn default_storage_timeout() -> u64 {
    120
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            account: None,
            container: default_container(),
            endpoint: None,
            sas_token: None,
            local_root: None,
            timeout_secs: default_storage_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Azure OpenAI resource endpoint, e.g. `https://myres.openai.azure.com`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// API key, environment-only.
    #[serde(skip)]
    pub api_key: Option<String>,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_provider_timeout() -> u64 {
    300
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            api_version: default_api_version(),
            timeout_secs: default_provider_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_list_page_size")]
    pub list_page_size: u32,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_list_page_size() -> u32 {
    DEFAULT_LIST_PAGE_SIZE
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            list_page_size: default_list_page_size(),
        }
    }
}
