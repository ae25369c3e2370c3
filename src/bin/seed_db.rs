use std::{
    error::Error,
    sync::{Arc, Mutex},
    time::Duration,
};

use clap::Parser;
use rusqlite::Connection;

use roxiler_rs::{
    DEFAULT_SEED_URL, SQLiteTransactionStore, SeedClient, initialize_db, seed_database,
};

/// A utility for seeding a database for the REST API server of roxiler_rs
/// without starting the server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database. It is created if it does not exist.
    #[arg(long, short, env = "DATABASE_PATH")]
    db_path: String,

    /// The URL of the JSON dataset to load.
    #[arg(long, env = "SEED_URL", default_value = DEFAULT_SEED_URL)]
    seed_url: String,

    /// How long to wait for the seed dataset before giving up, in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

/// Replace the contents of a database with the seed dataset.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    println!("Opening database at {:#?}", args.db_path);
    let conn = Connection::open(&args.db_path)?;
    initialize_db(&conn)?;

    let connection = Arc::new(Mutex::new(conn));
    let store = SQLiteTransactionStore::new(connection);
    let client = SeedClient::new(&args.seed_url, Duration::from_secs(args.timeout_secs))?;

    println!("Fetching seed data from {}...", client.url());
    let count = seed_database(&client, store).await?;

    println!("Success! Stored {count} transactions.");

    Ok(())
}
