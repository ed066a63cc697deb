use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "quote-me",
    version,
    about = "A simple CLI tool for managing and storing your favorite quotes"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Add a new quote
    #[command(alias = "a")]
    Add {
        /// The quote text
        quote: String,
        /// The quote author
        author: String,
    },
    /// List all saved quotes
    #[command(alias = "l")]
    List,
    /// Delete a quote by ID
    #[command(alias = "d")]
    Delete {
        /// The quote ID to delete
        id: String,
    },
    /// Export quotes to quotes.json in the current directory
    Export,
    /// Import quotes from a JSON file
    Import {
        /// Path to the JSON file
        file: PathBuf,
    },
    /// Start the web interface
    Web,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, clap::Error> {
        Cli::try_parse_from(std::iter::once("quote-me").chain(args.iter().copied())).map(|c| c.cmd)
    }

    #[test]
    fn test_parse_add() {
        assert_eq!(
            parse(&["add", "Be water.", "Bruce Lee"]).unwrap(),
            Command::Add {
                quote: "Be water.".to_string(),
                author: "Bruce Lee".to_string(),
            }
        );
    }

    #[test]
    fn test_aliases() {
        assert!(matches!(parse(&["a", "q", "who"]).unwrap(), Command::Add { .. }));
        assert_eq!(parse(&["l"]).unwrap(), Command::List);
        assert_eq!(
            parse(&["d", "abc"]).unwrap(),
            Command::Delete { id: "abc".to_string() }
        );
    }

    #[test]
    fn test_parse_import_and_web() {
        assert_eq!(
            parse(&["import", "backup.json"]).unwrap(),
            Command::Import { file: PathBuf::from("backup.json") }
        );
        assert_eq!(parse(&["export"]).unwrap(), Command::Export);
        assert_eq!(parse(&["web"]).unwrap(), Command::Web);
    }

    #[test]
    fn test_missing_arguments_rejected() {
        assert!(parse(&["add", "only the quote"]).is_err());
        assert!(parse(&["delete"]).is_err());
        assert!(parse(&["import"]).is_err());
    }

    #[test]
    fn test_unknown_verb_rejected() {
        let err = parse(&["edit", "x"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidSubcommand);
        assert!(parse(&[]).is_err());
    }
}
