//! Command-line interface definitions

pub mod app;

pub use app::{
    AuthSubcommands, ChapterSubcommands, Cli, Commands, QuizSubcommands, ResourceSubcommands,
    UploadSubcommands,
};
