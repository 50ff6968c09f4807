use crate::cli::globals::GlobalArgs;
use anyhow::Result;
use axum::{
    body::Body,
    extract::{Extension, MatchedPath},
    http::{HeaderName, HeaderValue, Request},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;

pub mod accounts;
pub mod credentials;
pub(crate) mod handlers;
pub mod pages;
pub mod session;
pub mod state;
pub mod store;
pub mod tokens;
pub mod twiml;

use self::state::{PortalConfig, PortalState};
use self::store::MemoryStore;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(host: &str, port: u16, globals: &GlobalArgs) -> Result<()> {
    let config = PortalConfig::new(host, port, &globals.phone_no);
    let state = Arc::new(PortalState::new(config, MemoryStore::seeded()));

    let app = Router::new()
        .route("/", get(handlers::login::form).post(handlers::login::submit))
        .route(
            "/register",
            get(handlers::register::form).post(handlers::register::submit),
        )
        .route("/verify", get(handlers::verify::instructions))
        .route(
            "/reset",
            get(handlers::reset::form).post(handlers::reset::submit),
        )
        .route("/secure", get(handlers::secure::landing))
        .route("/logout", get(handlers::secure::logout))
        .route("/sms", post(handlers::sms::webhook))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(state)),
        )
        .route("/health", get(handlers::health).options(handlers::health));

    let listener = TcpListener::bind(format!("{host}:{port}")).await?;

    info!("Listening on http://{}:{}", host, port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
