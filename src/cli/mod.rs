//! Command-line surface for the conversation staging pipeline.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use crate::models::OutputFormat;

/// Stage conversation files from blob storage into Azure OpenAI vector stores.
#[derive(Debug, Parser)]
#[command(name = "convector")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(long, short = 'f', global = true, help = "Output format: text or json")]
    pub format: Option<OutputFormat>,

    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check connectivity to the object store and the file store
    Status,

    /// Inspect or add a conversation's stored objects
    #[command(subcommand)]
    Objects(commands::ObjectsCommand),

    /// Upload a conversation's files without building a store
    Upload(commands::UploadArgs),

    /// Build one vector store from a conversation's files
    Build(commands::BuildArgs),

    /// Build one vector store per batch of a conversation's files
    BuildBatched(commands::BuildBatchedArgs),

    /// List vector stores previously built for a conversation
    Stores(commands::StoresArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::ConfigCommand),
}
