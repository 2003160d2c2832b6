//! Resilience features for Classore API operations

pub mod retry;

pub use retry::{RetryConfig, RetryPolicy, RetryableError};
