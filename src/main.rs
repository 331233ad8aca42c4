//! Card Inventory - trading card collection tracker
//!
//! Serves the web UI on top of a local SQLite database.

use card_inventory::{init_schema, web, Store};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Trading card inventory web app - purchases, sales and stock in SQLite
#[derive(Parser, Debug)]
#[command(name = "card_inventory")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    #[arg(short, long, default_value_t = default_db_path())]
    database: String,

    /// Address to bind the web UI to
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port for the web UI
    #[arg(short, long, default_value_t = 5000)]
    port: u16,
}

/// Returns the default database path: ~/.local/share/card_inventory/inventory.db
fn default_db_path() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("card_inventory")
        .join("inventory.db")
        .to_string_lossy()
        .to_string()
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let db_path = PathBuf::from(&args.database);
    let store = Store::new(&db_path);

    log::info!("Starting card_inventory...");
    log::info!("Database path: {}", store.path().display());

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::error!("Failed to create database directory: {}", e);
                std::process::exit(1);
            }
            log::info!("Created directory: {}", parent.display());
        }
    }

    // Create the table before the first request; the connection closes right after
    let schema = store.connect().and_then(|conn| init_schema(&conn));
    if let Err(e) = schema {
        log::error!("Failed to initialize database schema: {}", e);
        std::process::exit(1);
    }

    let addr = SocketAddr::new(args.host, args.port);
    if let Err(e) = web::serve(store, addr).await {
        log::error!("Web server error: {}", e);
        std::process::exit(1);
    }
}
