//! quote-me — store, list, import and export quotes from the command line,
//! and browse them in a small read-only web page.

use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;

mod cli;
mod config;
mod controllers;
mod data_dir;
mod server;
mod store;

use cli::args::{Cli, Command};
use cli::commands::dispatch;
use store::QuoteStore;

/// CLI verbs stay quiet unless RUST_LOG says otherwise; the server logs requests.
fn init_logging(cmd: &Command) {
    let default_filter = if *cmd == Command::Web { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let dir = data_dir::data_dir();
    data_dir::ensure_data_dir(&dir)
        .with_context(|| format!("Failed to create data directory {}", dir.display()))?;

    let store = QuoteStore::open(&dir).context("Failed to load quote store")?;
    dispatch(cli.cmd, store).await
}

/// Log a failed run at error level and build the `Error: ...` line for stderr.
/// Logged at `error` so the default `warn` filter keeps it.
fn report_failure(e: &anyhow::Error) -> String {
    log::error!("{:#}", e);
    format!("Error: {:#}", e)
}

#[actix_web::main]
async fn main() {
    dotenv().ok();

    // Unknown verbs and missing arguments exit here, before the store is opened
    let cli = Cli::parse();
    init_logging(&cli.cmd);

    if let Err(e) = run(cli).await {
        eprintln!("{}", report_failure(&e));
        std::process::exit(1);
    }
}
