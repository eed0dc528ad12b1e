use anyhow::Result;

use crate::cli::commands::connect;
use crate::cli::output::{StatusInfo, get_formatter};
use crate::models::{Config, OutputFormat};

pub async fn handle_status(format: OutputFormat, _verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    let (store, provider) = connect(&config)?;
    let storage_connected = store.check_connection().await.unwrap_or(false);
    let provider_connected = provider.check_connection().await.unwrap_or(false);

    let status = StatusInfo {
        storage_backend: config.storage.backend.to_string(),
        storage_target: store.describe(),
        storage_connected,
        container: config.storage.container.clone(),
        provider_target: provider.describe(),
        provider_connected,
    };

    print!("{}", formatter.format_status(&status));

    if !storage_connected || !provider_connected {
        eprintln!();
        if !storage_connected {
            eprintln!(
                "Warning: object store not reachable. Check AZURE_STORAGE_ACCOUNT_NAME and AZURE_STORAGE_SAS_TOKEN."
            );
        }
        if !provider_connected {
            eprintln!(
                "Warning: file store not reachable. Check AZURE_OPENAI_ENDPOINT and AZURE_OPENAI_API_KEY."
            );
        }
    }

    Ok(())
}
