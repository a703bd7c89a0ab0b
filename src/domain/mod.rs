//! Domain models for the contact book
//!
//! Contains the record type and its validation rules without any I/O concerns.

mod contact;

pub use contact::{normalize_name, Contact, ContactError, PhoneNumber};
