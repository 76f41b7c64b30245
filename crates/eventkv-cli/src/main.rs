//! eventkv CLI - HTTP server and offline inspection of data files.

use clap::{Parser, Subcommand};
use eventkv_server::http::DEFAULT_MAX_BODY_SIZE;
use eventkv_server::server::DEFAULT_ADDR;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{get, history, list, serve};

#[derive(Parser)]
#[command(name = "eventkv")]
#[command(about = "Event-sourced key/value store over HTTP")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Path to the data file (created with `{}` if missing)
        #[arg(long, default_value = "data.json")]
        data: String,
        /// Address to listen on
        #[arg(long, default_value = DEFAULT_ADDR)]
        addr: String,
        /// Sync the data file to disk after every write
        #[arg(long)]
        sync: bool,
        /// Reject request bodies larger than SIZE bytes
        #[arg(long, default_value_t = DEFAULT_MAX_BODY_SIZE)]
        max_body: usize,
    },
    /// List keys in a data file
    List {
        /// Path to the data file
        data: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the current value of a key
    Get {
        /// Path to the data file
        data: String,
        /// Key to read
        key: String,
    },
    /// Print the event history of a key
    History {
        /// Path to the data file
        data: String,
        /// Key to read
        key: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Serve {
            data,
            addr,
            sync,
            max_body,
        } => serve::run(data, addr, sync, max_body),
        Commands::List { data, json } => list::run(data, json),
        Commands::Get { data, key } => get::run(data, key),
        Commands::History { data, key, json } => history::run(data, key, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
