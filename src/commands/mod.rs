//! Command handlers, one module per command group

pub mod auth;
pub mod chapter;
pub mod quiz;
pub mod resource;
pub mod upload;
