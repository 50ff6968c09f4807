//! Password comparison seam.

use secrecy::{ExposeSecret, SecretString};

/// Seam over password checking so the plaintext demo comparison can be
/// replaced by a real hash (argon2, bcrypt) without touching the handlers.
pub trait CredentialChecker: Send + Sync {
    fn verify(&self, stored: &SecretString, candidate: &str) -> bool;
}

/// Plaintext comparison, matching the demo's observable behavior.
/// NEVER do this outside demo code: hash passwords with argon2 or bcrypt.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlaintextChecker;

impl CredentialChecker for PlaintextChecker {
    fn verify(&self, stored: &SecretString, candidate: &str) -> bool {
        stored.expose_secret() == candidate
    }
}
