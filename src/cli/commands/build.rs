use anyhow::Result;
use clap::Args;

use crate::cli::commands::{connect, parse_meta};
use crate::cli::output::get_formatter;
use crate::models::{Config, ConversationId, OutputFormat};
use crate::services::ConversationPipeline;

#[derive(Debug, Args)]
pub struct BuildArgs {
    #[arg(help = "Conversation identifier")]
    pub conversation: String,
    #[arg(long, value_name = "KEY=VALUE", help = "Extra store metadata, repeatable")]
    pub meta: Vec<String>,
}

#[derive(Debug, Args)]
pub struct BuildBatchedArgs {
    #[arg(help = "Conversation identifier")]
    pub conversation: String,
    #[arg(long, short = 'b', help = "Files per store, defaults to the configured batch size")]
    pub batch_size: Option<usize>,
    #[arg(long, value_name = "KEY=VALUE", help = "Extra store metadata, repeatable")]
    pub meta: Vec<String>,
}

pub async fn handle_build(args: BuildArgs, format: OutputFormat, _verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    let conversation_id: ConversationId = args.conversation.parse()?;
    let metadata = parse_meta(&args.meta)?;

    let (store, provider) = connect(&config)?;
    let pipeline = ConversationPipeline::new(store, provider, &config.pipeline);

    let store_id = pipeline
        .create_from_conversation(&conversation_id, metadata)
        .await?;
    print!(
        "{}",
        formatter.format_message(&format!("Created vector store {}", store_id))
    );

    Ok(())
}

pub async fn handle_build_batched(
    args: BuildBatchedArgs,
    format: OutputFormat,
    _verbose: bool,
) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    let conversation_id: ConversationId = args.conversation.parse()?;
    let metadata = parse_meta(&args.meta)?;

    let mut pipeline_config = config.pipeline.clone();
    if let Some(batch_size) = args.batch_size {
        pipeline_config.batch_size = batch_size;
    }

    let (store, provider) = connect(&config)?;
    let pipeline = ConversationPipeline::new(store, provider, &pipeline_config);

    let store_ids = pipeline
        .create_batched_from_conversation(&conversation_id, metadata)
        .await?;
    if store_ids.is_empty() {
        print!(
            "{}",
            formatter.format_message(&format!(
                "No vector stores created for conversation {}",
                conversation_id
            ))
        );
    } else {
        print!("{}", formatter.format_store_ids(&store_ids));
    }

    Ok(())
}
