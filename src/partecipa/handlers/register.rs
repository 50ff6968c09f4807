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
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub phone_no: Option<String>,
}

/// `GET /register` renders the registration form.
pub async fn form(state: Extension<Arc<PortalState>>, headers: HeaderMap) -> impl IntoResponse {
    let session = ensure_session(&headers, state.sessions());
    let message = state.sessions().take_flash(&session.token);

    attach_session_cookie(
        Html(pages::register(message.as_deref())).into_response(),
        &session,
    )
}

/// `POST /register` activates a pre-provisioned account and moves the
/// participant on to the verification instructions.
pub async fn submit(
    state: Extension<Arc<PortalState>>,
    headers: HeaderMap,
    Form(form): Form<RegisterForm>,
) -> impl IntoResponse {
    let session = ensure_session(&headers, state.sessions());

    match accounts::register(
        state.store(),
        state.tokens(),
        &form.username,
        &form.password,
        form.phone_no.as_deref(),
    ) {
        Ok(account) => {
            // Registration also logs the participant in, so the verify page
            // can show their token.
            state.sessions().log_in(&session.token, &account.username);

            attach_session_cookie(Redirect::to("/verify").into_response(), &session)
        }
        Err(err) => {
            debug!(%err, "registration rejected");

            state.sessions().set_flash(&session.token, err.to_string());

            attach_session_cookie(Redirect::to("/register").into_response(), &session)
        }
    }
}
