//! In-memory sessions and the cookie that carries them.
//!
//! The session id is an opaque ULID in an `HttpOnly` cookie. A session is
//! created for any visitor who needs one (it carries the flash message for
//! the next page), and gains a username on successful login or registration.

use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use ulid::Ulid;

pub const SESSION_COOKIE_NAME: &str = "partecipa_session";

#[derive(Clone, Debug, Default)]
struct Session {
    username: Option<String>,
    flash: Option<String>,
}

/// Session table held in memory, keyed by the cookie token. Like the
/// account table it does not survive a restart.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

/// A resolved session for the current request. `fresh` means the token was
/// just minted and the response must set the cookie.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    pub token: String,
    pub fresh: bool,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mint a new anonymous session and return its token.
    pub fn create(&self) -> String {
        let token = Ulid::new().to_string();
        self.table().insert(token.clone(), Session::default());
        token
    }

    #[must_use]
    pub fn exists(&self, token: &str) -> bool {
        self.table().contains_key(token)
    }

    /// Bind a username to the session after login or registration.
    pub fn log_in(&self, token: &str, username: &str) {
        if let Some(session) = self.table().get_mut(token) {
            session.username = Some(username.to_string());
        }
    }

    #[must_use]
    pub fn username(&self, token: &str) -> Option<String> {
        self.table().get(token).and_then(|s| s.username.clone())
    }

    pub fn set_flash(&self, token: &str, message: String) {
        if let Some(session) = self.table().get_mut(token) {
            session.flash = Some(message);
        }
    }

    /// Read and clear the flash message, so it shows exactly once.
    pub fn take_flash(&self, token: &str) -> Option<String> {
        self.table().get_mut(token).and_then(|s| s.flash.take())
    }

    pub fn destroy(&self, token: &str) {
        self.table().remove(token);
    }
}

/// Resolve the request's session, minting a new one when the cookie is
/// missing or points at a session this process no longer knows.
pub fn ensure_session(headers: &HeaderMap, store: &SessionStore) -> SessionHandle {
    if let Some(token) = extract_session_token(headers) {
        if store.exists(&token) {
            return SessionHandle {
                token,
                fresh: false,
            };
        }
    }

    SessionHandle {
        token: store.create(),
        fresh: true,
    }
}

pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE_NAME {
            return Some(val.to_string());
        }
    }
    None
}

/// Build the `HttpOnly` cookie for a freshly minted session. The portal is
/// plain-HTTP demo code, so the cookie is not marked `Secure`.
pub fn session_cookie(token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax"
    ))
}

pub fn clear_session_cookie() -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"
    ))
}
