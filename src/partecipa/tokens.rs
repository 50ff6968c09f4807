//! Token generation and phone-number digests.

use base64ct::{Base64, Encoding};
use rand::Rng;
use sha2::{Digest, Sha256};

const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const TOKEN_SUFFIX_LEN: usize = 4;

/// Seam for the `v-`/`p-` token generation so the demo generator can be
/// swapped for a secure one without touching the account lifecycle logic.
pub trait TokenGenerator: Send + Sync {
    fn verification_token(&self) -> String;
    fn reset_token(&self) -> String;
}

/// Demo-strength tokens: a 4-character lowercase alphanumeric suffix.
/// Short on purpose so participants can type them into a text message.
#[derive(Clone, Copy, Debug, Default)]
pub struct WeakTokenGenerator;

impl WeakTokenGenerator {
    fn suffix() -> String {
        let mut rng = rand::thread_rng();
        (0..TOKEN_SUFFIX_LEN)
            .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
            .collect()
    }
}

impl TokenGenerator for WeakTokenGenerator {
    fn verification_token(&self) -> String {
        format!("v-{}", Self::suffix())
    }

    fn reset_token(&self) -> String {
        format!("p-{}", Self::suffix())
    }
}

/// One-way digest of a phone number, the sole lookup key for inbound
/// messages. Base64 of SHA-256, so the raw number is never stored.
#[must_use]
pub fn phone_hash(phone_no: &str) -> String {
    let digest = Sha256::digest(phone_no.as_bytes());
    Base64::encode_string(digest.as_slice())
}
