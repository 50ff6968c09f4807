use axum::{
    extract::Extension,
    http::HeaderMap,
    response::{Html, IntoResponse},
};
use std::sync::Arc;

use crate::partecipa::handlers::require_participant;
use crate::partecipa::{pages, state::PortalState};

/// `GET /verify` shows the session user's verification token and the phone
/// number to text it to.
pub async fn instructions(
    state: Extension<Arc<PortalState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let account = require_participant(&headers, &state);
    let token = account.as_ref().and_then(|a| a.verification_token.as_deref());

    Html(pages::verify(token, state.config().phone_no()))
}
