use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use weaver_core::config::WeaverConfig;

mod commands;

#[derive(Parser)]
#[command(name = "weaver")]
#[command(about = "SiteWeaver - AI website builder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project from a prompt and generate its first design
    New {
        /// Description of the page to design
        prompt: String,
    },
    /// List stored projects and built-in templates
    List,
    /// Ask for changes to a project's design
    Chat {
        project_id: String,
        /// The change to make (e.g. "Make the button blue")
        instruction: String,
    },
    /// Select an element in the live preview and edit it
    Edit {
        project_id: String,
        /// Tag name to select (e.g. h1)
        #[arg(long)]
        select: String,
        /// Zero-based index among elements with that tag
        #[arg(long, default_value_t = 0)]
        nth: usize,
        /// New text content for the element
        #[arg(long)]
        text: Option<String>,
        /// New class attribute for the element
        #[arg(long)]
        classes: Option<String>,
    },
    /// Export a project's document as an HTML file
    Export {
        project_id: String,
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Import an HTML file as the project's document
    Import { project_id: String, file: PathBuf },
    /// Sign in with an email address
    Login { email: String },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = WeaverConfig::from_env()?;

    match cli.command {
        Commands::New { prompt } => commands::project::new_project(&config, &prompt).await,
        Commands::List => commands::project::list(&config).await,
        Commands::Chat {
            project_id,
            instruction,
        } => commands::project::chat(&config, &project_id, &instruction).await,
        Commands::Edit {
            project_id,
            select,
            nth,
            text,
            classes,
        } => commands::edit::edit(&config, &project_id, &select, nth, text, classes).await,
        Commands::Export { project_id, out } => {
            commands::project::export(&config, &project_id, &out).await
        }
        Commands::Import { project_id, file } => {
            commands::project::import(&config, &project_id, &file).await
        }
        Commands::Login { email } => commands::account::login(&config, &email).await,
        Commands::Logout => commands::account::logout(&config).await,
        Commands::Whoami => commands::account::whoami(&config).await,
    }
}
