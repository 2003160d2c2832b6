//! Classore admin REST API module
//!
//! Thin, typed access to the admin backend: an authenticated JSON client,
//! the response-envelope handling, endpoint builders, generic CRUD/publish
//! operations over named resources, and retry policies for transient
//! failures.

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod models;
pub mod operations;
pub mod resilience;

pub use auth::AuthManager;
pub use client::ClassoreClient;
pub use models::{normalize_message, ApiEnvelope, LoginData, TokenInfo};
pub use operations::{Operation, OperationResult, Operations};
pub use resilience::{RetryConfig, RetryPolicy, RetryableError};
