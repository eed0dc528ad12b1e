mod aggregator;
mod lookup;
mod partitioner;
mod pipeline;
mod store_builder;
mod uploader;

#[cfg(test)]
pub(crate) mod mock;

pub use aggregator::ConversationAggregator;
pub use lookup::VectorStoreLookup;
pub use partitioner::{BatchedStoreBuilder, partition};
pub use pipeline::ConversationPipeline;
pub use store_builder::VectorStoreBuilder;
pub use uploader::FileUploader;
