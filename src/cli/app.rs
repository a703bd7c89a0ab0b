//! Main CLI application structure

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::contact_cmd;
use super::menu::Menu;
use super::output::{Output, OutputFormat};
use crate::storage::Config;

#[derive(Parser)]
#[command(name = "contacts")]
#[command(author, version, about = "A flat-file contact book")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to `default_format` from the config)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Contact file (defaults to `store_path` from the config, then ./contact.txt)
    #[arg(long, global = true, env = "CONTACTS_FILE")]
    pub file: Option<PathBuf>,

    /// Runs the interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a contact (replaces the phone if the name exists)
    Add {
        /// Contact name
        name: String,

        /// Phone number, e.g. +8801712345678
        phone: String,
    },

    /// List all contacts
    #[command(visible_alias = "list")]
    Show,

    /// Delete a contact
    Delete {
        /// Contact name
        name: String,
    },

    /// Change the phone of an existing contact
    Update {
        /// Contact name
        name: String,

        /// New phone number
        phone: String,
    },

    /// Look up a contact's phone
    Search {
        /// Contact name
        name: String,
    },

    /// Remove duplicate lines left in the contact file
    Compact,

    /// Print the contact file in use
    Path,

    /// Start the interactive menu
    Menu,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    let format = cli.format.unwrap_or_else(|| config.default_format.into());
    let output = Output::new(format, cli.verbose);

    output.verbose("Contact book starting");
    if let Some(config_path) = Config::config_path() {
        output.verbose_ctx("config", &format!("Config file: {}", config_path.display()));
    }

    let path = config.resolve_store_path(cli.file.as_deref());
    output.verbose_ctx("store", &format!("Contact file: {}", path.display()));

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Path => contact_cmd::path(&output, &path)?,

        Commands::Menu => {
            let mut store = contact_cmd::open_store(&output, &path)?;
            let stdin = io::stdin();
            Menu::new(&mut store, stdin.lock(), io::stdout()).run()?
        }

        Commands::Add { name, phone } => {
            let mut store = contact_cmd::open_store(&output, &path)?;
            contact_cmd::add(&output, &mut store, &name, &phone)?
        }
        Commands::Show => {
            let store = contact_cmd::open_store(&output, &path)?;
            contact_cmd::show(&output, &store)?
        }
        Commands::Delete { name } => {
            let mut store = contact_cmd::open_store(&output, &path)?;
            contact_cmd::delete(&output, &mut store, &name)?
        }
        Commands::Update { name, phone } => {
            let mut store = contact_cmd::open_store(&output, &path)?;
            contact_cmd::update(&output, &mut store, &name, &phone)?
        }
        Commands::Search { name } => {
            let store = contact_cmd::open_store(&output, &path)?;
            contact_cmd::search(&output, &store, &name)?
        }
        Commands::Compact => {
            let mut store = contact_cmd::open_store(&output, &path)?;
            contact_cmd::compact(&output, &mut store)?
        }
    }

    output.verbose("Command completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_menu() {
        let cli = Cli::try_parse_from(["contacts"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "contacts",
            "search",
            "Alice",
            "--file",
            "book.txt",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.file, Some(PathBuf::from("book.txt")));
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert!(matches!(cli.command, Some(Commands::Search { ref name }) if name == "Alice"));
    }
}
