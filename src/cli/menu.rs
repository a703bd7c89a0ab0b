//! Interactive numbered menu
//!
//! Runs when `contacts` is invoked without a subcommand. Validation and
//! not-found errors are shown to the user and the menu continues; anything
//! else (I/O failures) ends the session with an error.

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::domain::ContactError;
use crate::storage::{ContactStore, StoreError};

const BANNER_WIDTH: usize = 40;

/// A menu entry chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    Show,
    Delete,
    Update,
    Search,
    Exit,
}

impl MenuChoice {
    /// Parses a menu selection, `None` for anything outside 0-5
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::Add),
            "2" => Some(MenuChoice::Show),
            "3" => Some(MenuChoice::Delete),
            "4" => Some(MenuChoice::Update),
            "5" => Some(MenuChoice::Search),
            "0" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// Console session over arbitrary input and output streams
pub struct Menu<'a, R, W> {
    store: &'a mut ContactStore,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(store: &'a mut ContactStore, input: R, out: W) -> Self {
        Self { store, input, out }
    }

    /// Runs until the user picks `0` or input ends
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.banner("Contact Book")?;
            writeln!(
                self.out,
                "\n1. Add Contact\
                 \n2. Show Contact\
                 \n3. Delete Contact\
                 \n4. Update Contact\
                 \n5. Search Contact\
                 \n0. Exit"
            )?;

            let Some(choice) = self.prompt("Enter Your Choice: ")? else {
                return self.goodbye();
            };

            let outcome = match MenuChoice::parse(&choice) {
                Some(MenuChoice::Add) => {
                    let Some((name, phone)) = self.prompt_pair(
                        "Enter Your Name: ",
                        "Enter Your Phone Number: ",
                    )?
                    else {
                        return self.goodbye();
                    };
                    self.store
                        .add(&name, &phone)
                        .map(|_| "Contact Added Successfully".to_string())
                }
                Some(MenuChoice::Show) => Ok(self.store.show()),
                Some(MenuChoice::Delete) => {
                    let Some(name) =
                        self.prompt("Enter the contact Name you want to delete: ")?
                    else {
                        return self.goodbye();
                    };
                    self.store
                        .delete(&name)
                        .map(|_| "Contact Deleted Successfully".to_string())
                }
                Some(MenuChoice::Update) => {
                    let Some((name, phone)) = self.prompt_pair(
                        "Enter the contact Name you want to update: ",
                        "Enter the contact Phone you want to update: ",
                    )?
                    else {
                        return self.goodbye();
                    };
                    self.store
                        .update(&name, &phone)
                        .map(|_| "Contact Updated Successfully".to_string())
                }
                Some(MenuChoice::Search) => {
                    let Some(name) =
                        self.prompt("Enter the contact Name you want to search: ")?
                    else {
                        return self.goodbye();
                    };
                    self.store
                        .search(&name)
                        .map(|phone| format!("Name: {}\nPhone: {}", name, phone))
                }
                Some(MenuChoice::Exit) => return self.goodbye(),
                None => Ok("Invalid Choice\nPlease Try Again.".to_string()),
            };

            self.report(outcome)?;
        }
    }

    fn banner(&mut self, title: &str) -> Result<()> {
        let rule = "=".repeat(BANNER_WIDTH);
        writeln!(
            self.out,
            "{rule}\n{title:^width$}\n{rule}",
            width = BANNER_WIDTH
        )?;
        Ok(())
    }

    fn goodbye(&mut self) -> Result<()> {
        writeln!(self.out, "Thank You for Using the Application\nGoodbye!!!")?;
        self.out.flush()?;
        Ok(())
    }

    /// Prints a prompt and reads one trimmed line, `None` at end of input
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.out, "{}", message)?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.out)?;
            return Ok(None);
        }

        Ok(Some(line.trim().to_string()))
    }

    fn prompt_pair(&mut self, first: &str, second: &str) -> Result<Option<(String, String)>> {
        let Some(a) = self.prompt(first)? else {
            return Ok(None);
        };
        Ok(self.prompt(second)?.map(|b| (a, b)))
    }

    /// Prints the outcome of an operation, passing through errors the user cannot fix
    fn report(&mut self, outcome: Result<String>) -> Result<()> {
        match outcome {
            Ok(message) => writeln!(self.out, "{}", message)?,
            Err(e) if is_user_error(&e) => writeln!(self.out, "{}", e)?,
            Err(e) => return Err(e),
        }
        Ok(())
    }
}

/// Errors caused by the user's input rather than the environment
fn is_user_error(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ContactError>().is_some()
        || matches!(err.downcast_ref::<StoreError>(), Some(StoreError::NotFound(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn session(store: &mut ContactStore, script: &str) -> String {
        let mut out = Vec::new();
        Menu::new(store, Cursor::new(script.as_bytes()), &mut out)
            .run()
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn store_in(dir: &TempDir) -> ContactStore {
        ContactStore::load(dir.path().join("contact.txt")).unwrap()
    }

    #[test]
    fn parses_choices() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::Add));
        assert_eq!(MenuChoice::parse(" 5 "), Some(MenuChoice::Search));
        assert_eq!(MenuChoice::parse("0"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("6"), None);
        assert_eq!(MenuChoice::parse("add"), None);
        assert_eq!(MenuChoice::parse(""), None);
    }

    #[test]
    fn full_session() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        let script = "1\nAlice\n+8801712345678\n\
                      5\nAlice\n\
                      4\nAlice\n+8801812345678\n\
                      2\n\
                      3\nAlice\n\
                      5\nAlice\n\
                      0\n";
        let output = session(&mut store, script);

        assert!(output.contains("Contact Added Successfully"));
        assert!(output.contains("Phone: +8801712345678"));
        assert!(output.contains("Contact Updated Successfully"));
        assert!(output.contains("Phone: +8801812345678"));
        assert!(output.contains("Contact Deleted Successfully"));
        assert!(output.contains("Contact not found: Alice"));
        assert!(output.ends_with("Goodbye!!!\n"));
        assert!(store.is_empty());
    }

    #[test]
    fn invalid_phone_is_reported_and_menu_continues() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        let output = session(&mut store, "1\nBob\n012345\n5\nBob\n0\n");

        assert!(output.contains("Invalid phone number: '012345'"));
        assert!(output.contains("Contact not found: Bob"));
        assert!(store.is_empty());
    }

    #[test]
    fn unknown_choice_reprompts() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        let output = session(&mut store, "9\n0\n");

        assert!(output.contains("Invalid Choice\nPlease Try Again."));
        assert_eq!(output.matches("Enter Your Choice: ").count(), 2);
    }

    #[test]
    fn end_of_input_exits() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        let output = session(&mut store, "1\nCarol\n");

        assert!(output.contains("Goodbye!!!"));
        assert!(store.is_empty());
    }
}
