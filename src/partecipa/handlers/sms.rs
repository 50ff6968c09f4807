use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, StatusCode},
    response::IntoResponse,
    Form,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::partecipa::{accounts, state::PortalState, twiml::MessagingResponse};

/// The fields Twilio posts to a messaging webhook.
#[derive(Deserialize, Debug)]
pub struct InboundMessage {
    #[serde(rename = "Body")]
    pub body: String,
    #[serde(rename = "From")]
    pub from: String,
}

enum InboundKind<'a> {
    Verification,
    ResetRequest,
    Unknown(&'a str),
}

fn classify(body: &str) -> InboundKind<'_> {
    if body.starts_with("v-") {
        InboundKind::Verification
    } else if body == "reset password" {
        InboundKind::ResetRequest
    } else {
        InboundKind::Unknown(body)
    }
}

/// `POST /sms`, the inbound message webhook. Every branch terminates in
/// exactly one reply message with status 200; failures are replies too.
pub async fn webhook(
    state: Extension<Arc<PortalState>>,
    Form(inbound): Form<InboundMessage>,
) -> impl IntoResponse {
    debug!(body = %inbound.body, "inbound message");

    let reply = match classify(&inbound.body) {
        InboundKind::Verification => {
            match accounts::verify_inbound(state.store(), &inbound.from) {
                Ok(_) => "Congrats you're verified! 🎉".to_string(),
                Err(err) => err.to_string(),
            }
        }
        InboundKind::ResetRequest => {
            match accounts::request_reset(state.store(), state.tokens(), &inbound.from) {
                Ok(token) => format!("Reset password at {}", state.config().reset_url(&token)),
                Err(err) => err.to_string(),
            }
        }
        InboundKind::Unknown(body) => format!("Unknown request: {body}"),
    };

    let mut twiml = MessagingResponse::new();
    twiml.message(&reply);

    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/xml")],
        twiml.to_xml(),
    )
}
