//! Flat-file CMS CLI - account and document management.
//!
//! # Usage
//!
//! ```bash
//! # List accounts (admins are marked)
//! cms users list
//!
//! # Create an account, subject to the same rules as web registration
//! cms users add alice --password 'correct horse'
//!
//! # Remove an account
//! cms users remove alice
//!
//! # Grant or revoke admin rights
//! cms admins grant alice
//! cms admins revoke alice
//!
//! # List documents
//! cms docs list
//! ```
//!
//! File locations come from the same `CMS_*` environment variables (and
//! `.env` file) as the server.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use flatfile_cms_server::config::CmsConfig;

mod commands;

#[derive(Parser)]
#[command(name = "cms")]
#[command(author, version, about = "Flat-file CMS tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
    /// Manage the admin list
    Admins {
        #[command(subcommand)]
        action: AdminsAction,
    },
    /// Inspect the document store
    Docs {
        #[command(subcommand)]
        action: DocsAction,
    },
}

#[derive(Subcommand)]
enum UsersAction {
    /// List all accounts
    List,
    /// Create an account
    Add {
        /// Username (more than 2 characters)
        username: String,

        /// Password (more than 8 characters)
        #[arg(short, long)]
        password: String,
    },
    /// Remove an account
    Remove {
        /// Username to remove
        username: String,
    },
}

#[derive(Subcommand)]
enum AdminsAction {
    /// List admin usernames
    List,
    /// Give an existing account admin rights
    Grant {
        /// Username to promote
        username: String,
    },
    /// Take admin rights away
    Revoke {
        /// Username to demote
        username: String,
    },
}

#[derive(Subcommand)]
enum DocsAction {
    /// List all documents
    List,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CmsConfig::from_env()?;
    let credentials = commands::credential_store(&config);

    match cli.command {
        Commands::Users { action } => match action {
            UsersAction::List => commands::users::list(&credentials).await?,
            UsersAction::Add { username, password } => {
                commands::users::add(&credentials, &username, password).await?;
            }
            UsersAction::Remove { username } => {
                commands::users::remove(&credentials, &username).await?;
            }
        },
        Commands::Admins { action } => match action {
            AdminsAction::List => commands::admins::list(&credentials).await?,
            AdminsAction::Grant { username } => {
                commands::admins::grant(&credentials, &username).await?;
            }
            AdminsAction::Revoke { username } => {
                commands::admins::revoke(&credentials, &username).await?;
            }
        },
        Commands::Docs { action } => match action {
            DocsAction::List => commands::docs::list(&config).await?,
        },
    }
    Ok(())
}
