use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::cli::commands::{connect, parse_meta};
use crate::cli::output::get_formatter;
use crate::models::{Config, ConversationId, OutputFormat};

#[derive(Debug, Subcommand)]
pub enum ObjectsCommand {
    #[command(about = "List a conversation's stored objects")]
    List {
        #[arg(help = "Conversation identifier")]
        conversation: String,
    },
    #[command(about = "Store a local file under a conversation")]
    Put {
        #[arg(help = "Conversation identifier")]
        conversation: String,
        #[arg(help = "Local file to store")]
        file: PathBuf,
        #[arg(long, help = "Object name, defaults to the file name")]
        name: Option<String>,
        #[arg(long, help = "Content type, defaults to a guess from the extension")]
        content_type: Option<String>,
        #[arg(long, value_name = "KEY=VALUE", help = "Object metadata, repeatable")]
        meta: Vec<String>,
    },
}

pub async fn handle_objects(cmd: ObjectsCommand, format: OutputFormat, _verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);
    let (store, _provider) = connect(&config)?;

    match cmd {
        ObjectsCommand::List { conversation } => {
            let conversation_id: ConversationId = conversation.parse()?;
            let objects = store.list(&conversation_id.prefix()).await?;
            print!("{}", formatter.format_objects(&objects));
        }
        ObjectsCommand::Put {
            conversation,
            file,
            name,
            content_type,
            meta,
        } => {
            let conversation_id: ConversationId = conversation.parse()?;
            let metadata = parse_meta(&meta)?;

            let object_name = match name {
                Some(name) => name,
                None => file
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(ToString::to_string)
                    .ok_or_else(|| {
                        anyhow::anyhow!("cannot derive object name from {}", file.display())
                    })?,
            };

            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let content_type = content_type
                .unwrap_or_else(|| content_type_for(&object_name).to_string());

            let key = format!("{}{}", conversation_id.prefix(), object_name);
            store.put(&key, bytes, &content_type, &metadata).await?;

            print!(
                "{}",
                formatter.format_message(&format!("Stored {}", key))
            );
        }
    }

    Ok(())
}

fn content_type_for(name: &str) -> &'static str {
    match name.rsplit_once('.').map(|(_, ext)| ext) {
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("txt") | Some("md") => "text/plain",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_by_extension() {
        assert_eq!(content_type_for("report.csv"), "text/csv");
        assert_eq!(content_type_for("notes.md"), "text/plain");
        assert_eq!(content_type_for("blob"), "application/octet-stream");
        assert_eq!(content_type_for("archive.bin"), "application/octet-stream");
    }
}
