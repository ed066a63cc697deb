//! Verb handlers. Each runs exactly one store operation and prints a one-line
//! confirmation to `out`.

use anyhow::Context;
use std::io::{self, Write};
use std::path::Path;

use super::args::Command;
use crate::config::Config;
use crate::server;
use crate::store::QuoteStore;

/// Run one verb. Only the verb arms take the stdout lock; `web` never does.
pub async fn dispatch(cmd: Command, mut store: QuoteStore) -> anyhow::Result<()> {
    match cmd {
        Command::Add { quote, author } => add(&mut store, &quote, &author, &mut io::stdout().lock()),
        Command::List => list(&store, &mut io::stdout().lock()),
        Command::Delete { id } => delete(&mut store, &id, &mut io::stdout().lock()),
        Command::Export => {
            let cwd = std::env::current_dir().context("Failed to resolve the current directory")?;
            export(&store, &cwd, &mut io::stdout().lock())
        }
        Command::Import { file } => import(&mut store, &file, &mut io::stdout().lock()),
        Command::Web => {
            let config = Config::from_env()?;
            server::run(store, config).await
        }
    }
}

pub fn add(store: &mut QuoteStore, quote: &str, author: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let saved = store.add(quote, author).context("Failed to save quote")?;
    writeln!(out, "Quote saved: \"{}\" - {}", saved.quote, saved.author)?;
    Ok(())
}

pub fn list(store: &QuoteStore, out: &mut impl Write) -> anyhow::Result<()> {
    if store.is_empty() {
        writeln!(out, "No quotes found.")?;
        return Ok(());
    }

    for q in store.list() {
        writeln!(
            out,
            "[{}] \"{}\" - {} (added on {})",
            q.id,
            q.quote,
            q.author,
            q.created_at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
        )?;
    }
    Ok(())
}

pub fn delete(store: &mut QuoteStore, id: &str, out: &mut impl Write) -> anyhow::Result<()> {
    if store.delete(id).context("Failed to delete quote")? {
        writeln!(out, "Quote with ID {} deleted.", id)?;
    } else {
        writeln!(out, "No quote found with ID {}.", id)?;
    }
    Ok(())
}

pub fn export(store: &QuoteStore, dir: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    let path = store
        .export_to(dir)
        .with_context(|| format!("Failed to export quotes to {}", dir.display()))?;
    writeln!(out, "Database exported to: {}", path.display())?;
    Ok(())
}

pub fn import(store: &mut QuoteStore, file: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    let summary = store
        .import_file(file)
        .with_context(|| format!("Failed to import quotes from {}", file.display()))?;

    writeln!(out, "Imported {} quotes from {}", summary.imported, file.display())?;
    if summary.skipped > 0 {
        writeln!(out, "Skipped {} duplicate quotes (based on id)", summary.skipped)?;
    }
    Ok(())
}
