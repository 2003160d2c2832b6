//! Repositories over the local database

pub mod tokens;
pub mod upload_sessions;

pub use upload_sessions::SqliteSessionStore;
