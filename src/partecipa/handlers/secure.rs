use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap},
    response::{Html, IntoResponse, Redirect},
};
use std::sync::Arc;

use crate::partecipa::handlers::require_participant;
use crate::partecipa::session::{clear_session_cookie, extract_session_token};
use crate::partecipa::{pages, state::PortalState};

/// `GET /secure`, the authenticated landing page. Anonymous visitors are
/// bounced to the login form.
pub async fn landing(state: Extension<Arc<PortalState>>, headers: HeaderMap) -> impl IntoResponse {
    match require_participant(&headers, &state) {
        Some(account) => Html(pages::secure(&account.username)).into_response(),
        None => Redirect::to("/").into_response(),
    }
}

/// `GET /logout` destroys the session and clears the cookie.
pub async fn logout(state: Extension<Arc<PortalState>>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = extract_session_token(&headers) {
        state.sessions().destroy(&token);
    }

    let mut response = Redirect::to("/").into_response();
    if let Ok(cookie) = clear_session_cookie() {
        response.headers_mut().insert(SET_COOKIE, cookie);
    }
    response
}
