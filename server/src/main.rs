//! Harvest manager CLI.
//!
//! Usage:
//!   harvest-manager serve [--config path] [--addr addr] [--db path]
//!   harvest-manager users <subcommand> [--config path] [--db path]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use harvest_manager::config::resolve_config;
use harvest_manager::db::{default_database_path, user_repo};
use harvest_manager::logging::init_logging;
use harvest_manager::models::SaveError;
use harvest_manager::{Database, ManagerConfig, User};
use harvest_manager_server::{Server, ServerError};

#[derive(Parser)]
#[command(
    name = "harvest-manager",
    version,
    about = "Parser and harvest job administration"
)]
struct Cli {
    /// Path to a YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Path to SQLite database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Listen address, e.g. 127.0.0.1:3000
        #[arg(long)]
        addr: Option<String>,
    },
    /// Manage users who may sign in
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a user and print their authentication token
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// List users
    List,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ServerError> {
    let mut config = resolve_config(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database.path = Some(db);
    }

    match cli.command {
        Commands::Serve { addr } => {
            if let Some(addr) = addr {
                config.server.addr = addr;
            }
            init_logging(&config.logging)?;
            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                "Starting harvest manager"
            );
            let db = open_database(&config)?;
            Server::new(config, db).run().await
        }
        Commands::Users { action } => {
            let db = open_database(&config)?;
            run_user_action(&db, action)
        }
    }
}

fn open_database(config: &ManagerConfig) -> Result<Database, ServerError> {
    let path = config
        .database
        .path
        .clone()
        .or_else(default_database_path)
        .ok_or(ServerError::NoDatabasePath)?;
    Ok(Database::open(&path)?)
}

fn run_user_action(db: &Database, action: UserAction) -> Result<(), ServerError> {
    match action {
        UserAction::Add { name, email } => {
            let user = User::new(name, email);
            match user_repo::create(db, &user) {
                Ok(()) => {
                    println!("Created user {} <{}>", user.name, user.email);
                    println!("Authentication token: {}", user.authentication_token);
                }
                Err(SaveError::Invalid(errors)) => {
                    return Err(ServerError::InvalidUser(
                        serde_json::to_string(&errors).unwrap_or_default(),
                    ));
                }
                Err(SaveError::Database(e)) => return Err(e.into()),
            }
        }
        UserAction::List => {
            let users = user_repo::all(db)?;
            if users.is_empty() {
                println!("No users.");
            }
            for user in users {
                println!("{}  {} <{}>", user.id, user.name, user.email);
            }
        }
    }
    Ok(())
}
