use anyhow::Result;
use clap::Subcommand;

use crate::models::{Config, OutputFormat};

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    #[command(about = "Show resolved configuration")]
    Show,
    #[command(about = "Show the configuration file path")]
    Path,
    #[command(about = "Write the resolved configuration to disk")]
    Init,
}

pub async fn handle_config(cmd: ConfigCommand, format: OutputFormat, _verbose: bool) -> Result<()> {
    match cmd {
        ConfigCommand::Show => handle_show(format),
        ConfigCommand::Path => handle_path(),
        ConfigCommand::Init => handle_init(),
    }
}

fn handle_show(format: OutputFormat) -> Result<()> {
    let config = Config::load()?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Config file: {}", path.display());
        } else {
            println!("# Config file (not present): {}", path.display());
        }
        println!();
    }

    println!("[storage]");
    println!("backend = \"{}\"", config.storage.backend);
    if let Some(ref account) = config.storage.account {
        println!("account = \"{}\"", account);
    }
    println!("container = \"{}\"", config.storage.container);
    if let Some(ref endpoint) = config.storage.endpoint {
        println!("endpoint = \"{}\"", endpoint);
    }
    if config.storage.sas_token.is_some() {
        println!("sas_token = \"********\"  # from environment");
    }
    if let Some(ref root) = config.storage.local_root {
        println!("local_root = \"{}\"", root.display());
    }
    println!("timeout_secs = {}", config.storage.timeout_secs);
    println!();

    println!("[provider]");
    if let Some(ref endpoint) = config.provider.endpoint {
        println!("endpoint = \"{}\"", endpoint);
    }
    if config.provider.api_key.is_some() {
        println!("api_key = \"********\"  # from environment");
    }
    println!("api_version = \"{}\"", config.provider.api_version);
    println!("timeout_secs = {}", config.provider.timeout_secs);
    println!();

    println!("[pipeline]");
    println!("batch_size = {}", config.pipeline.batch_size);
    println!("list_page_size = {}", config.pipeline.list_page_size);

    Ok(())
}

fn handle_path() -> Result<()> {
    let path = Config::config_path()
        .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?;

    if path.exists() {
        println!("Config file (active): {}", path.display());
    } else {
        println!("Config file (would be): {}", path.display());
    }

    Ok(())
}

fn handle_init() -> Result<()> {
    let config = Config::load()?;
    config.save()?;

    let path = Config::config_path()
        .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?;
    println!("Wrote config to: {}", path.display());

    Ok(())
}
