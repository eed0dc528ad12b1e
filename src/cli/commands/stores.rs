use anyhow::Result;
use clap::Args;

use crate::cli::commands::connect;
use crate::cli::output::get_formatter;
use crate::models::{Config, ConversationId, OutputFormat};
use crate::services::ConversationPipeline;

#[derive(Debug, Args)]
pub struct StoresArgs {
    #[arg(help = "Conversation identifier")]
    pub conversation: String,
}

pub async fn handle_stores(args: StoresArgs, format: OutputFormat, _verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    let conversation_id: ConversationId = args.conversation.parse()?;
    let (store, provider) = connect(&config)?;
    let pipeline = ConversationPipeline::new(store, provider, &config.pipeline);

    let store_ids = pipeline.stores_for_conversation(&conversation_id).await?;
    print!("{}", formatter.format_store_ids(&store_ids));

    Ok(())
}
