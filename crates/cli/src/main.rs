//! Shoplark CLI - Database migrations and store inspection.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! shoplark-cli migrate
//!
//! # List published stores
//! shoplark-cli stores list
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "shoplark-cli")]
#[command(author, version, about = "Shoplark CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Inspect stores
    Stores {
        #[command(subcommand)]
        action: StoresAction,
    },
}

#[derive(Subcommand)]
enum StoresAction {
    /// List published stores with their subdomains
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
        Commands::Stores { action } => match action {
            StoresAction::List => commands::stores::list().await?,
        },
    }
    Ok(())
}
