mod billing;
mod catalog;
mod config;
mod dashboard;
mod db;
mod error;
mod invoice_gen;
mod models;
mod web;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::web::{templates, AppState};

/// Clients, work orders, quotes and invoices for a building-maintenance business
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the web application (default)
    Serve {
        /// Address to listen on, overriding BIND_ADDRESS
        #[arg(long)]
        bind: Option<String>,
    },
    /// Load the built-in service catalog into the database
    SeedServices,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = config::init()?;

    // Initialize database connection
    let db = db::init(&config).await?;
    tracing::info!(database = config.database_url(), "database ready");

    match cli.command.unwrap_or(Command::Serve { bind: None }) {
        Command::Serve { bind } => {
            let address = bind.unwrap_or_else(|| config.bind_address().to_string());
            serve(db, &address).await
        }
        Command::SeedServices => {
            let inserted = db.seed_services(catalog::CATALOG).await?;
            tracing::info!(inserted, "services seeded");
            Ok(())
        }
    }
}

async fn serve(database: db::Database, address: &str) -> Result<()> {
    templates::init();

    let app = web::router(AppState { database });

    let listener = TcpListener::bind(address).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
