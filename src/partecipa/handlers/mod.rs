pub mod health;
pub use self::health::health;

pub mod login;
pub mod register;
pub mod reset;
pub mod secure;
pub mod sms;
pub mod verify;

// common functions for the handlers
use axum::http::{header::SET_COOKIE, HeaderMap};
use axum::response::Response;

use super::accounts;
use super::session::{self, SessionHandle};
use super::state::PortalState;
use super::store::Account;

/// Set the session cookie on the response when the session was freshly
/// minted, so the flash message survives the redirect.
pub(crate) fn attach_session_cookie(mut response: Response, session: &SessionHandle) -> Response {
    if session.fresh {
        if let Ok(cookie) = session::session_cookie(&session.token) {
            response.headers_mut().insert(SET_COOKIE, cookie);
        }
    }
    response
}

/// Resolve the request's session cookie to the logged-in participant, if
/// any. A stale cookie or a vanished username counts as not logged in.
pub(crate) fn require_participant(headers: &HeaderMap, state: &PortalState) -> Option<Account> {
    let token = session::extract_session_token(headers)?;
    let username = state.sessions().username(&token)?;
    accounts::find_principal(state.store(), &username).ok()
}
