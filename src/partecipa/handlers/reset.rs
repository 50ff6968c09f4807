use axum::{
    extract::{Extension, Query},
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
pub struct ResetQuery {
    pub token: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ResetForm {
    pub token: String,
    pub password: String,
}

/// `GET /reset?token=` renders the reset form with the token tucked into a
/// hidden input.
pub async fn form(Query(query): Query<ResetQuery>) -> impl IntoResponse {
    Html(pages::reset(query.token.as_deref().unwrap_or_default()))
}

/// `POST /reset` completes the reset. The outcome is flashed on the login
/// page either way.
pub async fn submit(
    state: Extension<Arc<PortalState>>,
    headers: HeaderMap,
    Form(form): Form<ResetForm>,
) -> impl IntoResponse {
    let session = ensure_session(&headers, state.sessions());

    let message = match accounts::complete_reset(state.store(), &form.token, &form.password) {
        Ok(_) => "Password reset successful".to_string(),
        Err(err) => {
            debug!(%err, "password reset rejected");

            err.to_string()
        }
    };

    state.sessions().set_flash(&session.token, message);

    attach_session_cookie(Redirect::to("/").into_response(), &session)
}
