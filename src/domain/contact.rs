//! Contact domain model
//!
//! A contact is a name paired with a validated phone number. Both fields
//! must survive the `name,phone` line format of the backing file, so
//! validation happens here before anything reaches storage.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `+880`, an optional `1`, one of 3-9, then eight digits.
///
/// `[0-9]` rather than `\d`: the regex crate's `\d` matches any Unicode digit.
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+8801?[3-9][0-9]{8}$").expect("phone pattern is valid"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactError {
    #[error("Invalid phone number: '{0}' (expected +880[1]XNNNNNNNN with X in 3-9)")]
    InvalidPhone(String),

    #[error("Contact name must not be empty")]
    EmptyName,

    #[error("Invalid contact name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("Malformed contact record: expected 'name,phone'")]
    MissingSeparator,
}

/// A phone number that matches the national mobile pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validates and wraps a phone number
    pub fn parse(phone: &str) -> Result<Self, ContactError> {
        if PHONE_PATTERN.is_match(phone) {
            Ok(Self(phone.to_string()))
        } else {
            Err(ContactError::InvalidPhone(phone.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PhoneNumber {
    type Err = ContactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = ContactError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

/// Normalizes and validates a contact name
///
/// Surrounding whitespace is trimmed. Names that could not round-trip through
/// a `name,phone` line are rejected.
pub fn normalize_name(name: &str) -> Result<String, ContactError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ContactError::EmptyName);
    }

    if name.contains(',') {
        return Err(ContactError::InvalidName {
            name: name.to_string(),
            reason: "commas are not allowed",
        });
    }

    if name.contains(['\n', '\r']) {
        return Err(ContactError::InvalidName {
            name: name.to_string(),
            reason: "line breaks are not allowed",
        });
    }

    Ok(name.to_string())
}

/// A single contact record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: PhoneNumber,
}

impl Contact {
    /// Creates a contact, validating both fields
    pub fn new(name: &str, phone: &str) -> Result<Self, ContactError> {
        let phone = PhoneNumber::parse(phone)?;
        let name = normalize_name(name)?;
        Ok(Self { name, phone })
    }

    /// Parses a `name,phone` record line
    pub fn from_line(line: &str) -> Result<Self, ContactError> {
        let mut fields = line.trim().split(',');

        match (fields.next(), fields.next(), fields.next()) {
            (Some(name), Some(phone), None) => Self::new(name, phone),
            _ => Err(ContactError::MissingSeparator),
        }
    }

    /// Renders the record line, without the trailing newline
    pub fn to_line(&self) -> String {
        format!("{},{}", self.name, self.phone)
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name: {}\nPhone: {}", self.name, self.phone)
    }
}
