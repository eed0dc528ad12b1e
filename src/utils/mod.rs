//! Utility modules.

pub mod retry;

pub use retry::{RetryConfig, RetryResult, Retryable, with_retry};
