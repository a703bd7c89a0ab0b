//! Contact Book - a flat-file contact book for the command line
//!
//! Contacts are name/phone pairs kept in an in-memory index and mirrored
//! to a `name,phone` text file after every change.

pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{Contact, ContactError, PhoneNumber};
pub use storage::{ContactStore, StoreError};
