//! In-memory account repository for pre-provisioned participants.

use secrecy::SecretString;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One row per pre-provisioned participant.
///
/// The participant id is already filled out because that's how clinical
/// studies work: accounts are pre-provisioned by clinicians. Everything
/// else starts unset and transitions during registration, verification and
/// password reset. Passwords are kept in the clear on purpose (demo code,
/// see `CredentialChecker`), wrapped in `SecretString` so they never land
/// in logs.
#[derive(Clone, Debug)]
pub struct Account {
    pub username: String,
    pub password: Option<SecretString>,
    pub phone_hash: Option<String>,
    pub verified: bool,
    pub reset_token: Option<String>,
    pub verification_token: Option<String>,
}

impl Account {
    /// A pre-provisioned row: username assigned, everything else unset.
    #[must_use]
    pub fn provisioned(username: &str) -> Self {
        Self {
            username: username.to_string(),
            password: None,
            phone_hash: None,
            verified: false,
            reset_token: None,
            verification_token: None,
        }
    }

    /// Registration is marked by the password being set.
    #[must_use]
    pub fn registered(&self) -> bool {
        self.password.is_some()
    }
}

/// Repository seam over the account table so storage can be swapped for a
/// real database without touching the account lifecycle logic.
pub trait AccountStore: Send + Sync {
    fn find_by_username(&self, username: &str) -> Option<Account>;
    fn find_by_phone_hash(&self, phone_hash: &str) -> Option<Account>;
    fn find_by_reset_token(&self, reset_token: &str) -> Option<Account>;
    fn save(&self, account: Account);
}

/// Account table held in memory. Lookups are linear scans; the table is a
/// handful of rows and never grows after seeding.
pub struct MemoryStore {
    accounts: Mutex<Vec<Account>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(accounts: Vec<Account>) -> Self {
        Self {
            accounts: Mutex::new(accounts),
        }
    }

    /// The demo seed data: a single unregistered participant.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(vec![Account::provisioned("p1337")])
    }

    fn rows(&self) -> MutexGuard<'_, Vec<Account>> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AccountStore for MemoryStore {
    fn find_by_username(&self, username: &str) -> Option<Account> {
        self.rows()
            .iter()
            .find(|account| account.username == username)
            .cloned()
    }

    fn find_by_phone_hash(&self, phone_hash: &str) -> Option<Account> {
        self.rows()
            .iter()
            .find(|account| account.phone_hash.as_deref() == Some(phone_hash))
            .cloned()
    }

    fn find_by_reset_token(&self, reset_token: &str) -> Option<Account> {
        self.rows()
            .iter()
            .find(|account| account.reset_token.as_deref() == Some(reset_token))
            .cloned()
    }

    fn save(&self, account: Account) {
        let mut rows = self.rows();
        match rows.iter_mut().find(|row| row.username == account.username) {
            Some(row) => *row = account,
            None => rows.push(account),
        }
    }
}
