//! `jb-cli` - database tooling for Jabuticaba.
//!
//! ```bash
//! jb-cli migrate   # apply pending schema migrations
//! jb-cli seed      # load the demo catalog into an empty database
//! ```
//!
//! The server never migrates on startup; running `migrate` here is the
//! only supported way to change the schema.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "jb-cli")]
#[command(author, version, about = "Jabuticaba database tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Load the demo catalog into an empty products table
    Seed,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Seed => commands::seed::run().await,
    };

    if let Err(e) = result {
        tracing::error!("command failed: {e}");
        std::process::exit(1);
    }
}
