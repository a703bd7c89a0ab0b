//! In-memory contact index mirrored to the backing file
//!
//! The store is loaded once, mutated through its operations, and every
//! mutation leaves the file holding exactly one `name,phone` line per live
//! contact.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use thiserror::Error;

use super::ContactFile;
use crate::domain::{normalize_name, Contact, ContactError, PhoneNumber};

/// Width of the banner and separators in [`ContactStore::show`]
const LISTING_WIDTH: usize = 40;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Contact not found: {0}")]
    NotFound(String),

    #[error("Malformed contact record at line {line}: '{content}'")]
    Malformed {
        line: usize,
        content: String,
        #[source]
        source: ContactError,
    },
}

/// A contact book backed by a flat file
pub struct ContactStore {
    file: ContactFile,
    contacts: BTreeMap<String, Contact>,
    shadowed: usize,
}

impl ContactStore {
    /// Loads the store from the given file, creating the file if it is missing
    ///
    /// When a name occurs on several lines the last one wins; the number of
    /// ignored lines is reported by [`ContactStore::shadowed_lines`].
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let file = ContactFile::new(path);
        let records = file.read_all()?;
        let total = records.len();

        let mut contacts = BTreeMap::new();
        for contact in records {
            contacts.insert(contact.name.clone(), contact);
        }

        Ok(Self {
            file,
            shadowed: total - contacts.len(),
            contacts,
        })
    }

    /// Returns the path of the backing file
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Lines in the file that are hidden by a later line with the same name
    pub fn shadowed_lines(&self) -> usize {
        self.shadowed
    }

    /// Iterates over all contacts, ordered by name
    pub fn contacts(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.values()
    }

    /// Adds a contact, returning the phone it replaced if the name existed
    ///
    /// Validation failures leave both the index and the file untouched.
    /// A new name is appended to the file; an existing name triggers a rewrite
    /// so the file never holds two lines for one name.
    pub fn add(&mut self, name: &str, phone: &str) -> Result<Option<PhoneNumber>> {
        let contact = Contact::new(name, phone)?;

        if self.contacts.contains_key(&contact.name) || self.shadowed > 0 {
            let name = contact.name.clone();
            let previous = self.rewrite_with(&name, Some(contact))?;
            return Ok(previous.map(|c| c.phone));
        }

        self.file.append(&contact)?;
        self.contacts.insert(contact.name.clone(), contact);
        Ok(None)
    }

    /// Renders a human-readable listing of every contact
    pub fn show(&self) -> String {
        let rule = "=".repeat(LISTING_WIDTH);
        let separator = "-".repeat(LISTING_WIDTH);

        let mut listing = format!(
            "{rule}\n{:^width$}\n{rule}\n",
            "Contact List",
            width = LISTING_WIDTH
        );

        if self.contacts.is_empty() {
            listing.push_str(&format!(
                "{:^width$}\n",
                "No contacts",
                width = LISTING_WIDTH
            ));
            return listing;
        }

        for contact in self.contacts.values() {
            listing.push_str(&format!(
                "\n{separator}\n{:^width$}\n{:^width$}\n{separator}\n",
                format!("Name: {}", contact.name),
                format!("Phone: {}", contact.phone),
                width = LISTING_WIDTH
            ));
        }

        listing
    }

    /// Removes a contact and rewrites the file without it
    pub fn delete(&mut self, name: &str) -> Result<Contact> {
        let name = self.existing_name(name)?;
        let removed = self.rewrite_with(&name, None)?;
        removed.ok_or_else(|| StoreError::NotFound(name).into())
    }

    /// Replaces the phone of an existing contact
    ///
    /// The new phone is validated before anything is modified.
    pub fn update(&mut self, name: &str, phone: &str) -> Result<PhoneNumber> {
        let name = self.existing_name(name)?;
        let contact = Contact::new(&name, phone)?;
        let previous = self.rewrite_with(&name, Some(contact))?;
        previous
            .map(|c| c.phone)
            .ok_or_else(|| StoreError::NotFound(name).into())
    }

    /// Looks up the phone of a contact
    pub fn search(&self, name: &str) -> Result<&PhoneNumber> {
        let name = self.existing_name(name)?;
        Ok(&self.contacts[&name].phone)
    }

    /// Rewrites the whole file from the in-memory index
    pub fn flush(&mut self) -> Result<()> {
        self.file.write_all(self.contacts.values())?;
        self.shadowed = 0;
        Ok(())
    }

    /// Drops shadowed lines from the file, returning how many were removed
    pub fn compact(&mut self) -> Result<usize> {
        let removed = self.shadowed;
        self.flush()?;
        Ok(removed)
    }

    /// Normalizes `name` and checks that it is present
    fn existing_name(&self, name: &str) -> Result<String> {
        // A name that cannot be stored cannot be present either
        let Ok(name) = normalize_name(name) else {
            return Err(StoreError::NotFound(name.trim().to_string()).into());
        };

        if self.contacts.contains_key(&name) {
            Ok(name)
        } else {
            Err(StoreError::NotFound(name).into())
        }
    }

    /// Sets or removes one entry and rewrites the file
    ///
    /// The index is restored if the rewrite fails.
    fn rewrite_with(&mut self, name: &str, contact: Option<Contact>) -> Result<Option<Contact>> {
        let previous = match contact {
            Some(contact) => self.contacts.insert(name.to_string(), contact),
            None => self.contacts.remove(name),
        };

        if let Err(e) = self.flush() {
            match previous.clone() {
                Some(old) => self.contacts.insert(name.to_string(), old),
                None => self.contacts.remove(name),
            };
            return Err(e);
        }

        Ok(previous)
    }
}
