pub mod api;
pub mod authoring;
pub mod cli;
pub mod commands;
pub mod config;
pub mod upload;
