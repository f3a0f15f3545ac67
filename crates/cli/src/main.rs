//! Fyay CLI - Schema setup and account management.
//!
//! # Usage
//!
//! ```bash
//! # Create all tables (idempotent)
//! fyay-cli migrate
//!
//! # Create an administrator
//! fyay-cli admin create -e admin@example.com -n "Admin Name" -p secret-password
//!
//! # Promote an existing account to administrator
//! fyay-cli admin promote -e user@example.com
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fyay-cli")]
#[command(author, version, about = "Fyay CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database tables
    Migrate,
    /// Manage administrator accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new administrator account
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin full name
        #[arg(short, long)]
        name: String,

        /// Admin password (at least 6 characters)
        #[arg(short, long)]
        password: String,
    },
    /// Give an existing account the admin role
    Promote {
        /// Email address of the account
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                password,
            } => {
                commands::admin::create_user(&email, &name, &password).await?;
            }
            AdminAction::Promote { email } => commands::admin::promote(&email).await?,
        },
    }
    Ok(())
}
