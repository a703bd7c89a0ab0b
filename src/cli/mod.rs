//! # Command-Line Interface
//!
//! User-facing commands, the interactive menu and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `add <name> <phone>` | Add a contact |
//! | `show` / `list` | List all contacts |
//! | `delete <name>` | Delete a contact |
//! | `update <name> <phone>` | Change a contact's phone |
//! | `search <name>` | Look up a contact |
//! | `compact` | Drop duplicate lines from the contact file |
//! | `path` | Print the contact file in use |
//! | `menu` (or no command) | Interactive numbered menu |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output:
//! ```bash
//! contacts --verbose show
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod contact_cmd;
mod menu;
mod output;

pub use app::{run, Cli, Commands};
pub use menu::{Menu, MenuChoice};
pub use output::{Output, OutputFormat};
