//! The account directory: an explicitly constructed collection of accounts.
//!
//! The reference system kept a process-wide account list; here the directory
//! is a value owned by the service instance so tests get fresh state.

use super::account::Account;

/// Ordered collection of accounts with lookup by unique name.
#[derive(Debug, Default)]
pub struct Directory {
    accounts: Vec<Account>,
}

impl Directory {
    /// Builds a directory with one zero-balance account per name.
    ///
    /// Duplicate names collapse to a single account; insertion order is kept.
    #[must_use]
    pub fn seed<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut directory = Self::default();
        for name in names {
            let name = name.into();
            if directory.get(&name).is_none() {
                directory.accounts.push(Account::new(name));
            }
        }
        directory
    }

    /// Looks up an account by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.name() == name)
    }

    /// Looks up an account by name, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.name() == name)
    }

    /// Returns true if an account with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}
