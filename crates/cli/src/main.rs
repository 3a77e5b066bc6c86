//! Todo CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! todo-cli migrate
//!
//! # Create an account
//! todo-cli user create -u alice -p 'correct horse battery'
//!
//! # Give an account some sample data
//! todo-cli seed demo -u alice
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "todo-cli")]
#[command(author, version, about = "Todo service CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Seed the database with sample data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new password account
    Create {
        /// Login name
        #[arg(short, long)]
        user_name: String,

        /// Password (at least 8 characters)
        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Create a sample list with items for an existing user
    Demo {
        /// Login name of the owner
        #[arg(short, long)]
        user_name: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                user_name,
                password,
            } => {
                commands::user::create(&user_name, &password).await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Demo { user_name } => commands::seed::demo(&user_name).await?,
        },
    }
    Ok(())
}
