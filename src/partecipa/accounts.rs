//! Account lifecycle operations: registration, login, verification and
//! password reset. Handlers surface the error strings verbatim, so the
//! `Display` text here is exactly what participants see.

use secrecy::SecretString;
use thiserror::Error;
use tracing::debug;

use super::credentials::CredentialChecker;
use super::store::{Account, AccountStore};
use super::tokens::{phone_hash, TokenGenerator};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Unknown participant id {0}")]
    UnknownParticipant(String),
    #[error("That participant has already been registered")]
    AlreadyRegistered,
    #[error("Phone number required")]
    PhoneNumberRequired,
    #[error("No user found")]
    UnknownUser,
    #[error("Participant has not registered")]
    NotRegistered,
    #[error("Wrong password")]
    WrongPassword,
    #[error("Please verify account before logging in")]
    NotVerified,
    #[error("Unknown user")]
    UnknownPhone,
    #[error("User not found")]
    UnknownResetToken,
}

/// Register a pre-provisioned participant: bind a password and a phone
/// number hash to the row and issue a verification token. The account is
/// then eligible for verification but not yet for login.
pub fn register(
    store: &dyn AccountStore,
    tokens: &dyn TokenGenerator,
    username: &str,
    password: &str,
    phone_no: Option<&str>,
) -> Result<Account, AuthError> {
    let mut account = store
        .find_by_username(username)
        .ok_or_else(|| AuthError::UnknownParticipant(username.to_string()))?;

    if account.registered() {
        return Err(AuthError::AlreadyRegistered);
    }

    let phone_no = phone_no
        .map(str::trim)
        .filter(|phone| !phone.is_empty())
        .ok_or(AuthError::PhoneNumberRequired)?;

    account.password = Some(SecretString::from(password.to_string()));
    account.phone_hash = Some(phone_hash(phone_no));
    account.verification_token = Some(tokens.verification_token());
    store.save(account.clone());

    debug!(username = %account.username, "participant registered");

    Ok(account)
}

/// Validate a username/password pair. Unverified accounts are rejected even
/// with the correct password.
pub fn authenticate(
    store: &dyn AccountStore,
    credentials: &dyn CredentialChecker,
    username: &str,
    password: &str,
) -> Result<Account, AuthError> {
    let account = store.find_by_username(username).ok_or(AuthError::UnknownUser)?;

    let Some(stored) = account.password.as_ref() else {
        return Err(AuthError::NotRegistered);
    };

    if !credentials.verify(stored, password) {
        return Err(AuthError::WrongPassword);
    }

    if !account.verified {
        return Err(AuthError::NotVerified);
    }

    Ok(account)
}

/// Consume an inbound `v-` message: flip the verified flag and clear the
/// stored token so it cannot be used again.
pub fn verify_inbound(store: &dyn AccountStore, phone_no: &str) -> Result<Account, AuthError> {
    let mut account = store
        .find_by_phone_hash(&phone_hash(phone_no))
        .ok_or(AuthError::UnknownPhone)?;

    // The inbound token body is not compared against the stored token: the
    // sender's phone hash alone selects the account.
    account.verified = true;
    account.verification_token = None;
    store.save(account.clone());

    debug!(username = %account.username, "participant verified");

    Ok(account)
}

/// Issue a single-use reset token for the account behind the sender's
/// phone number.
pub fn request_reset(
    store: &dyn AccountStore,
    tokens: &dyn TokenGenerator,
    phone_no: &str,
) -> Result<String, AuthError> {
    let mut account = store
        .find_by_phone_hash(&phone_hash(phone_no))
        .ok_or(AuthError::UnknownPhone)?;

    let token = tokens.reset_token();
    account.reset_token = Some(token.clone());
    store.save(account);

    Ok(token)
}

/// Complete a password reset: overwrite the password and revoke the token
/// so it cannot be used twice.
pub fn complete_reset(
    store: &dyn AccountStore,
    token: &str,
    new_password: &str,
) -> Result<Account, AuthError> {
    let mut account = store
        .find_by_reset_token(token)
        .ok_or(AuthError::UnknownResetToken)?;

    account.password = Some(SecretString::from(new_password.to_string()));
    account.reset_token = None;
    store.save(account.clone());

    debug!(username = %account.username, "password reset");

    Ok(account)
}

/// Resolve a session's username to its account. Called at request entry;
/// a stale username behaves like a missing session.
pub fn find_principal(store: &dyn AccountStore, username: &str) -> Result<Account, AuthError> {
    store.find_by_username(username).ok_or(AuthError::UnknownUser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partecipa::credentials::PlaintextChecker;
    use crate::partecipa::store::MemoryStore;
    use crate::partecipa::tokens::WeakTokenGenerator;

    const PHONE_NO: &str = "+15551234567";

    struct FixedTokens;

    impl TokenGenerator for FixedTokens {
        fn verification_token(&self) -> String {
            "v-fix3".to_string()
        }

        fn reset_token(&self) -> String {
            "p-fix3".to_string()
        }
    }

    fn registered_store() -> MemoryStore {
        let store = MemoryStore::seeded();
        register(&store, &FixedTokens, "p1337", "secret1", Some(PHONE_NO)).unwrap();
        store
    }

    #[test]
    fn register_sets_password_phone_hash_and_token() {
        let store = MemoryStore::seeded();

        let account =
            register(&store, &WeakTokenGenerator, "p1337", "secret1", Some(PHONE_NO)).unwrap();

        assert!(account.registered());
        assert!(!account.verified);
        assert_eq!(account.phone_hash, Some(phone_hash(PHONE_NO)));
        assert!(!account.verification_token.unwrap().is_empty());
    }

    #[test]
    fn register_unknown_participant_fails() {
        let store = MemoryStore::seeded();

        let err =
            register(&store, &WeakTokenGenerator, "p0000", "secret1", Some(PHONE_NO)).unwrap_err();

        assert_eq!(err, AuthError::UnknownParticipant("p0000".to_string()));
        assert_eq!(err.to_string(), "Unknown participant id p0000");
    }

    #[test]
    fn register_twice_fails_and_preserves_the_row() {
        let store = registered_store();

        let err =
            register(&store, &WeakTokenGenerator, "p1337", "other", Some(PHONE_NO)).unwrap_err();

        assert_eq!(err, AuthError::AlreadyRegistered);
        let account = store.find_by_username("p1337").unwrap();
        assert_eq!(account.verification_token.as_deref(), Some("v-fix3"));
        assert!(
            PlaintextChecker.verify(account.password.as_ref().unwrap(), "secret1"),
            "prior password must be unchanged"
        );
    }

    #[test]
    fn register_without_phone_number_fails() {
        let store = MemoryStore::seeded();

        let err = register(&store, &WeakTokenGenerator, "p1337", "secret1", None).unwrap_err();
        assert_eq!(err, AuthError::PhoneNumberRequired);

        let err =
            register(&store, &WeakTokenGenerator, "p1337", "secret1", Some("  ")).unwrap_err();
        assert_eq!(err, AuthError::PhoneNumberRequired);

        assert!(!store.find_by_username("p1337").unwrap().registered());
    }

    #[test]
    fn login_before_verification_fails_with_correct_password() {
        let store = registered_store();

        let err = authenticate(&store, &PlaintextChecker, "p1337", "secret1").unwrap_err();

        assert_eq!(err, AuthError::NotVerified);
    }

    #[test]
    fn login_failures_have_distinct_reasons() {
        let store = registered_store();

        assert_eq!(
            authenticate(&store, &PlaintextChecker, "p0000", "secret1").unwrap_err(),
            AuthError::UnknownUser
        );
        assert_eq!(
            authenticate(&store, &PlaintextChecker, "p1337", "wrong").unwrap_err(),
            AuthError::WrongPassword
        );

        let unregistered = MemoryStore::seeded();
        assert_eq!(
            authenticate(&unregistered, &PlaintextChecker, "p1337", "secret1").unwrap_err(),
            AuthError::NotRegistered
        );
    }

    #[test]
    fn verification_flips_the_flag_and_clears_the_token() {
        let store = registered_store();

        let account = verify_inbound(&store, PHONE_NO).unwrap();

        assert!(account.verified);
        assert!(account.verification_token.is_none());

        let principal = authenticate(&store, &PlaintextChecker, "p1337", "secret1").unwrap();
        assert_eq!(principal.username, "p1337");
    }

    #[test]
    fn verification_is_idempotent() {
        let store = registered_store();

        verify_inbound(&store, PHONE_NO).unwrap();
        let again = verify_inbound(&store, PHONE_NO).unwrap();

        assert!(again.verified);
    }

    #[test]
    fn verification_from_unknown_number_mutates_nothing() {
        let store = registered_store();

        let err = verify_inbound(&store, "+15550000000").unwrap_err();

        assert_eq!(err, AuthError::UnknownPhone);
        assert_eq!(err.to_string(), "Unknown user");
        assert!(!store.find_by_username("p1337").unwrap().verified);
    }

    #[test]
    fn reset_request_from_unknown_number_mutates_nothing() {
        let store = registered_store();

        let err = request_reset(&store, &WeakTokenGenerator, "+15550000000").unwrap_err();

        assert_eq!(err, AuthError::UnknownPhone);
        assert!(store.find_by_username("p1337").unwrap().reset_token.is_none());
    }

    #[test]
    fn reset_tokens_are_single_use() {
        let store = registered_store();

        let token = request_reset(&store, &FixedTokens, PHONE_NO).unwrap();
        assert_eq!(token, "p-fix3");

        complete_reset(&store, &token, "secret2").unwrap();

        let err = complete_reset(&store, &token, "secret3").unwrap_err();
        assert_eq!(err, AuthError::UnknownResetToken);
        assert_eq!(err.to_string(), "User not found");
    }

    #[test]
    fn reset_overwrites_the_password() {
        let store = registered_store();
        verify_inbound(&store, PHONE_NO).unwrap();

        let token = request_reset(&store, &FixedTokens, PHONE_NO).unwrap();
        complete_reset(&store, &token, "secret2").unwrap();

        assert_eq!(
            authenticate(&store, &PlaintextChecker, "p1337", "secret1").unwrap_err(),
            AuthError::WrongPassword
        );
        assert!(authenticate(&store, &PlaintextChecker, "p1337", "secret2").is_ok());
    }

    #[test]
    fn stale_session_username_resolves_to_not_found() {
        let store = MemoryStore::seeded();

        assert_eq!(
            find_principal(&store, "ghost").unwrap_err(),
            AuthError::UnknownUser
        );
        assert!(find_principal(&store, "p1337").is_ok());
    }
}
