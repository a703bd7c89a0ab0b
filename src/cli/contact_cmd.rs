//! One-shot contact commands

use std::path::Path;

use anyhow::Result;

use super::output::Output;
use crate::storage::ContactStore;

/// Loads the store, reporting what was found when verbose
pub fn open_store(output: &Output, path: &Path) -> Result<ContactStore> {
    let store = ContactStore::load(path)?;

    output.verbose_ctx(
        "store",
        &format!("Loaded {} contact(s) from {}", store.len(), path.display()),
    );
    if store.shadowed_lines() > 0 {
        output.verbose_ctx(
            "store",
            &format!(
                "{} duplicate line(s) ignored; run 'contacts compact' to remove them",
                store.shadowed_lines()
            ),
        );
    }

    Ok(store)
}

pub fn add(output: &Output, store: &mut ContactStore, name: &str, phone: &str) -> Result<()> {
    output.verbose_ctx("add", &format!("Adding '{}' with phone {}", name, phone));

    match store.add(name, phone)? {
        Some(previous) => output.success(&format!(
            "Contact '{}' already existed; phone changed from {} to {}",
            name.trim(),
            previous,
            phone
        )),
        None => output.success(&format!("Contact added: {}", name.trim())),
    }

    Ok(())
}

pub fn show(output: &Output, store: &ContactStore) -> Result<()> {
    if output.is_json() {
        let items: Vec<_> = store.contacts().collect();
        output.data(&items);
    } else {
        print!("{}", store.show());
    }

    Ok(())
}

pub fn delete(output: &Output, store: &mut ContactStore, name: &str) -> Result<()> {
    output.verbose_ctx("delete", &format!("Deleting '{}'", name));

    let removed = store.delete(name)?;
    output.success(&format!("Contact deleted: {}", removed.name));

    Ok(())
}

pub fn update(output: &Output, store: &mut ContactStore, name: &str, phone: &str) -> Result<()> {
    output.verbose_ctx("update", &format!("Updating '{}' to phone {}", name, phone));

    let previous = store.update(name, phone)?;
    output.success(&format!(
        "Contact updated: {} ({} -> {})",
        name.trim(),
        previous,
        phone
    ));

    Ok(())
}

pub fn search(output: &Output, store: &ContactStore, name: &str) -> Result<()> {
    let phone = store.search(name)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "name": name.trim(),
            "phone": phone,
        }));
    } else {
        println!("Name: {}", name.trim());
        println!("Phone: {}", phone);
    }

    Ok(())
}

pub fn compact(output: &Output, store: &mut ContactStore) -> Result<()> {
    let removed = store.compact()?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "removed": removed,
            "contacts": store.len(),
        }));
    } else {
        println!(
            "Compacted {}: removed {} duplicate line(s), {} contact(s) kept",
            store.path().display(),
            removed,
            store.len()
        );
    }

    Ok(())
}

/// Prints the resolved contact file path without touching it
pub fn path(output: &Output, path: &Path) -> Result<()> {
    if output.is_json() {
        output.data(&serde_json::json!({
            "path": path.display().to_string(),
        }));
    } else {
        println!("{}", path.display());
    }

    Ok(())
}
