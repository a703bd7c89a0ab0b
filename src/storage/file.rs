//! Flat-file storage for contacts
//!
//! Contacts are stored one per line as `name,phone`.
//! Reads take a shared lock and appends an exclusive one. Rewrites do not
//! lock: they replace the file by renaming a finished temp file over it, so a
//! reader sees either the old contents or the new ones.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use super::store::StoreError;
use crate::domain::Contact;

/// Backing file of a contact store
pub struct ContactFile {
    path: PathBuf,
}

impl ContactFile {
    /// Creates a handle for the file at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the scratch file used by [`ContactFile::write_all`]
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("contacts"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Reads every record in file order, creating an empty file if none exists
    ///
    /// Duplicate names are returned as-is; resolving them is up to the caller.
    pub fn read_all(&self) -> Result<Vec<Contact>> {
        if !self.path.exists() {
            self.create_empty()?;
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open contact file: {}", self.path.display()))?;

        // Acquire shared lock for reading
        file.lock_shared()
            .context("Failed to acquire read lock on contact file")?;

        let reader = BufReader::new(&file);
        let mut contacts = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let contact = Contact::from_line(&line).map_err(|source| StoreError::Malformed {
                line: line_num + 1,
                content: line.clone(),
                source,
            })?;

            contacts.push(contact);
        }

        // Lock is released when file is dropped
        Ok(contacts)
    }

    /// Writes all contacts to the file (full rewrite)
    ///
    /// The temp file is removed if any step fails.
    pub fn write_all<'a>(&self, contacts: impl IntoIterator<Item = &'a Contact>) -> Result<()> {
        self.ensure_parent()?;

        // Write to temp file first
        let temp_path = self.temp_path();

        let result = Self::write_lines(&temp_path, contacts).and_then(|()| {
            // Atomic rename
            fs::rename(&temp_path, &self.path).with_context(|| {
                format!(
                    "Failed to rename {} to {}",
                    temp_path.display(),
                    self.path.display()
                )
            })
        });

        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }

        result
    }

    fn write_lines<'a>(path: &Path, contacts: impl IntoIterator<Item = &'a Contact>) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("Failed to create temp file: {}", path.display()))?;

        let mut writer = BufWriter::new(&file);

        for contact in contacts {
            writeln!(writer, "{}", contact.to_line()).context("Failed to write contact")?;
        }

        writer.flush().context("Failed to flush contact file")?;

        Ok(())
    }

    /// Appends a single contact without rewriting the file
    pub fn append(&self, contact: &Contact) -> Result<()> {
        self.ensure_parent()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open contact file: {}", self.path.display()))?;

        // Acquire exclusive lock
        file.lock_exclusive()
            .context("Failed to acquire write lock on contact file")?;

        let mut writer = BufWriter::new(&file);
        writeln!(writer, "{}", contact.to_line()).context("Failed to write contact")?;

        writer.flush().context("Failed to flush contact file")?;

        Ok(())
    }

    fn create_empty(&self) -> Result<()> {
        self.ensure_parent()?;

        File::create(&self.path)
            .with_context(|| format!("Failed to create contact file: {}", self.path.display()))?;

        Ok(())
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn contact(name: &str, phone: &str) -> Contact {
        Contact::new(name, phone).unwrap()
    }

    #[test]
    fn missing_file_is_created_empty() {
        let dir = TempDir::new().unwrap();
        let file = ContactFile::new(dir.path().join("contact.txt"));

        let contacts = file.read_all().unwrap();
        assert!(contacts.is_empty());
        assert!(file.path().is_file());
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "");
    }

    #[test]
    fn append_writes_one_line_per_contact() {
        let dir = TempDir::new().unwrap();
        let file = ContactFile::new(dir.path().join("contact.txt"));

        file.append(&contact("Alice", "+8801712345678")).unwrap();
        file.append(&contact("Bob", "+8801812345678")).unwrap();

        assert_eq!(
            fs::read_to_string(file.path()).unwrap(),
            "Alice,+8801712345678\nBob,+8801812345678\n"
        );

        let loaded = file.read_all().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].name, "Bob");
    }

    #[test]
    fn write_all_replaces_contents() {
        let dir = TempDir::new().unwrap();
        let file = ContactFile::new(dir.path().join("contact.txt"));

        file.append(&contact("Alice", "+8801712345678")).unwrap();
        file.write_all(&[contact("Bob", "+8801812345678")]).unwrap();

        assert_eq!(
            fs::read_to_string(file.path()).unwrap(),
            "Bob,+8801812345678\n"
        );
    }

    #[test]
    fn atomic_write() {
        let dir = TempDir::new().unwrap();
        let file = ContactFile::new(dir.path().join("contact.txt"));

        file.write_all(&[contact("Alice", "+8801712345678")]).unwrap();

        // Temp file should not exist after write
        assert!(!file.temp_path().exists());
        assert_eq!(file.temp_path(), dir.path().join("contact.txt.tmp"));
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("contact.txt");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("occupied"), "").unwrap();

        let file = ContactFile::new(&path);
        let err = file
            .write_all(&[contact("Alice", "+8801712345678")])
            .unwrap_err();

        assert!(format!("{:#}", err).contains("Failed to rename"));
        assert!(!file.temp_path().exists());
    }

    #[test]
    #[cfg(unix)]
    fn rewrite_does_not_wait_for_readers() {
        let dir = TempDir::new().unwrap();
        let file = ContactFile::new(dir.path().join("contact.txt"));
        file.append(&contact("Alice", "+8801712345678")).unwrap();

        // A reader holding the shared lock keeps the old contents
        let mut reader = File::open(file.path()).unwrap();
        reader.lock_shared().unwrap();

        file.write_all(&[contact("Bob", "+8801812345678")]).unwrap();

        let mut old = String::new();
        std::io::Read::read_to_string(&mut reader, &mut old).unwrap();
        assert_eq!(old, "Alice,+8801712345678\n");

        let loaded = file.read_all().unwrap();
        assert_eq!(loaded, vec![contact("Bob", "+8801812345678")]);
    }

    #[test]
    fn skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("contact.txt");
        fs::write(&path, "Alice,+8801712345678\n\n   \nBob,+8801812345678").unwrap();

        let loaded = ContactFile::new(&path).read_all().unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn malformed_line_reports_position() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("contact.txt");
        fs::write(&path, "Alice,+8801712345678\nBob +8801812345678\n").unwrap();

        let err = ContactFile::new(&path).read_all().unwrap_err();
        match err.downcast_ref::<StoreError>() {
            Some(StoreError::Malformed { line, content, .. }) => {
                assert_eq!(*line, 2);
                assert_eq!(content, "Bob +8801812345678");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let file = ContactFile::new(dir.path().join("nested").join("dir").join("contact.txt"));

        file.append(&contact("Alice", "+8801712345678")).unwrap();

        assert!(file.path().exists());
    }
}
