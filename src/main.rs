use anyhow::Result;
use clap::Parser;
use log::info;

use classore_admin::cli::{
    AuthSubcommands, ChapterSubcommands, Cli, Commands, QuizSubcommands, ResourceSubcommands,
    UploadSubcommands,
};
use classore_admin::commands::{auth, chapter, quiz, resource, upload};
use classore_admin::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Log to a file so command output stays clean (truncate on each run).
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("classore-admin.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let cli = Cli::parse();
    let config = Config::load().await?;
    info!("Starting classore-admin");

    match cli.command {
        Commands::Auth(commands) => match commands.command {
            AuthSubcommands::Login { email } => auth::login_command(&config, email).await,
            AuthSubcommands::Status => auth::status_command(&config).await,
            AuthSubcommands::Logout => auth::logout_command(&config).await,
        },
        Commands::Resource(commands) => match commands.command {
            ResourceSubcommands::List { resource } => {
                resource::list_command(&config, &resource).await
            }
            ResourceSubcommands::Create { resource: name, payload } => {
                resource::create_command(&config, &name, &payload).await
            }
            ResourceSubcommands::Update { resource: name, id, payload } => {
                resource::update_command(&config, &name, &id, &payload).await
            }
            ResourceSubcommands::Delete { resource: name, id, yes } => {
                resource::delete_command(&config, &name, &id, yes).await
            }
            ResourceSubcommands::Publish { resource: name, id } => {
                resource::publish_command(&config, &name, &id).await
            }
        },
        Commands::Chapter(commands) => match commands.command {
            ChapterSubcommands::Push { file } => chapter::push_command(&config, &file).await,
            ChapterSubcommands::Show { file } => chapter::show_command(&file),
        },
        Commands::Quiz(commands) => match commands.command {
            QuizSubcommands::Validate { file } => quiz::validate_command(&file),
            QuizSubcommands::Submit { file } => quiz::submit_command(&config, &file).await,
        },
        Commands::Upload(commands) => match commands.command {
            UploadSubcommands::Video { file, module_id, restart } => {
                upload::video_command(&config, &file, &module_id, restart).await
            }
            UploadSubcommands::Status { module_id } => {
                upload::status_command(&config, &module_id).await
            }
            UploadSubcommands::Abort { module_id } => {
                upload::abort_command(&config, &module_id).await
            }
        },
    }
}
