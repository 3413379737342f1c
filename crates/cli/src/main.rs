//! Sugar Plum CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply all database migrations
//! sp-cli migrate
//!
//! # Create an admin account
//! sp-cli admin create -e ops@example.com -n "Ops" -p <password> -r super_admin
//!
//! # List admin accounts
//! sp-cli admin list
//!
//! # Seed a demo admin and starter catalog
//! sp-cli seed -e demo@example.com -p <password>
//! ```
//!
//! # Commands
//!
//! - `migrate` - Apply database migrations
//! - `admin create` / `admin list` - Manage admin accounts
//! - `seed` - Seed the database with a demo admin and starter catalog

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sp-cli")]
#[command(author, version, about = "Sugar Plum CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply database migrations
    Migrate,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the database with a demo admin and starter catalog
    Seed {
        /// Email for the demo admin account
        #[arg(short, long, default_value = "demo@sugarplumhq.dev")]
        email: String,

        /// Password for the demo admin account
        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Admin password
        #[arg(short, long)]
        password: String,

        /// Admin role (`super_admin`, `admin`, `viewer`)
        #[arg(short, long, default_value = "admin")]
        role: String,
    },
    /// List admin accounts
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
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                password,
                role,
            } => {
                commands::admin::create_account(&email, &name, &password, &role).await?;
            }
            AdminAction::List => commands::admin::list_accounts().await?,
        },
        Commands::Seed { email, password } => {
            commands::seed::run(&email, &password).await?;
        }
    }
    Ok(())
}
