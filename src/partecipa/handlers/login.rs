use axum::{
    extract::Extension,
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::partecipa::handlers::attach_session_cookie;
use crate::partecipa::{accounts, pages, session::ensure_session, state::PortalState};

#[derive(Deserialize, Debug)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// `GET /` renders the login form with the flashed message, if any.
pub async fn form(state: Extension<Arc<PortalState>>, headers: HeaderMap) -> impl IntoResponse {
    let session = ensure_session(&headers, state.sessions());
    let message = state.sessions().take_flash(&session.token);

    attach_session_cookie(
        Html(pages::login(message.as_deref())).into_response(),
        &session,
    )
}

/// `POST /` authenticates and redirects to the secure landing page, or back
/// to the form with the failure reason flashed.
pub async fn submit(
    state: Extension<Arc<PortalState>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> impl IntoResponse {
    let session = ensure_session(&headers, state.sessions());

    match accounts::authenticate(
        state.store(),
        state.credentials(),
        &form.username,
        &form.password,
    ) {
        Ok(account) => {
            state.sessions().log_in(&session.token, &account.username);

            debug!(username = %account.username, "login successful");

            attach_session_cookie(Redirect::to("/secure").into_response(), &session)
        }
        Err(err) => {
            debug!(%err, "login rejected");

            state.sessions().set_flash(&session.token, err.to_string());

            attach_session_cookie(Redirect::to("/").into_response(), &session)
        }
    }
}
