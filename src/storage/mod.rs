//! # Storage Layer
//!
//! Persistence for the contact book.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Contacts | `name,phone` per line | `contact.txt` (or `--file`) |
//! | Config | TOML | `~/.config/contacts/config.toml` |
//!
//! ## Consistency
//!
//! - [`ContactStore`] keeps one line per live contact after every mutation
//! - [`ContactFile`] locks the file (`fs2`) while reading or appending
//! - Rewrites are atomic (temp file + rename) and leave no temp file behind
//!
//! ## Key Types
//!
//! - [`ContactStore`] - In-memory index mirrored to the backing file
//! - [`ContactFile`] - Line-level reads, appends and rewrites
//! - [`Config`] - User configuration

mod config;
mod file;
mod store;

pub use config::{Config, ConfigError, DefaultFormat, CONFIG_ENV, DEFAULT_STORE_FILE};
pub use file::ContactFile;
pub use store::{ContactStore, StoreError};
