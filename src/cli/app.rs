use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "classore-admin")]
#[command(about = "A CLI for administering the Classore education platform")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Authentication management
    Auth(AuthCommands),
    /// Generic CRUD over admin resources (examinations, bundles, subjects, ...)
    Resource(ResourceCommands),
    /// Push a chapter/lesson draft to the backend
    Chapter(ChapterCommands),
    /// Validate and submit quiz question drafts
    Quiz(QuizCommands),
    /// Chunked video uploads
    Upload(UploadCommands),
}

#[derive(Args)]
pub struct AuthCommands {
    #[command(subcommand)]
    pub command: AuthSubcommands,
}

#[derive(Subcommand)]
pub enum AuthSubcommands {
    /// Log in with admin credentials and store the session token
    Login {
        /// Admin email; prompted for when omitted
        #[arg(long)]
        email: Option<String>,
    },
    /// Show whether a valid session token is stored
    Status,
    /// Drop the stored session token
    Logout,
}

#[derive(Args)]
pub struct ResourceCommands {
    #[command(subcommand)]
    pub command: ResourceSubcommands,
}

#[derive(Subcommand)]
pub enum ResourceSubcommands {
    /// List records of a resource
    List {
        /// Resource name, e.g. bundles, subjects, roles
        resource: String,
    },
    /// Create a record from a JSON payload
    Create {
        resource: String,
        /// Inline JSON or @path/to/payload.json
        payload: String,
    },
    /// Update a record from a JSON payload
    Update {
        resource: String,
        id: String,
        /// Inline JSON or @path/to/payload.json
        payload: String,
    },
    /// Delete a record
    Delete {
        resource: String,
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Publish a record
    Publish { resource: String, id: String },
}

#[derive(Args)]
pub struct ChapterCommands {
    #[command(subcommand)]
    pub command: ChapterSubcommands,
}

#[derive(Subcommand)]
pub enum ChapterSubcommands {
    /// Create chapters and lessons on the backend from a local draft file
    Push {
        /// Course draft JSON (subject id, chapters, lessons)
        file: PathBuf,
    },
    /// Print the draft as the builder sees it, with assigned sequences
    Show { file: PathBuf },
}

#[derive(Args)]
pub struct QuizCommands {
    #[command(subcommand)]
    pub command: QuizSubcommands,
}

#[derive(Subcommand)]
pub enum QuizSubcommands {
    /// Check a question draft against the validation rules
    Validate {
        /// Quiz draft JSON (chapter id, module id, questions)
        file: PathBuf,
    },
    /// Validate and submit a question draft to its chapter module
    Submit { file: PathBuf },
}

#[derive(Args)]
pub struct UploadCommands {
    #[command(subcommand)]
    pub command: UploadSubcommands,
}

#[derive(Subcommand)]
pub enum UploadSubcommands {
    /// Upload a video to a chapter module in sequential chunks
    Video {
        /// Video file to upload
        file: PathBuf,
        /// Server id of the chapter module (the saved lesson)
        #[arg(long)]
        module_id: String,
        /// Ignore any persisted session and restart from the first chunk
        #[arg(long)]
        restart: bool,
    },
    /// Show the persisted session for a module, if any
    Status {
        #[arg(long)]
        module_id: String,
    },
    /// Drop the persisted session for a module
    Abort {
        #[arg(long)]
        module_id: String,
    },
}
