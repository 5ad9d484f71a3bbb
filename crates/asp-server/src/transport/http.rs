//! HTTP transport — the `/asp` request endpoint, `/asp/discover`, and `/health`.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::Json as AxumJson,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::protocol::ProtocolHandler;
use crate::types::{AspError, AspResult, Envelope, ErrorCode, ASP_VERSION, SERVER_VERSION};

use super::framing;

/// Largest request body accepted on `POST /asp`.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// HTTP transport for networked agents.
pub struct HttpTransport {
    handler: ProtocolHandler,
}

impl HttpTransport {
    pub fn new(handler: ProtocolHandler) -> Self {
        Self { handler }
    }

    /// Run the HTTP server on the given address until Ctrl+C.
    pub async fn run(&self, addr: &str) -> AspResult<()> {
        let app = router(self.handler.clone());

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(AspError::Io)?;

        tracing::info!("HTTP transport listening on {addr}");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AspError::Transport(e.to_string()))?;

        tracing::info!("HTTP transport stopped");
        Ok(())
    }
}

/// Build the axum router serving the protocol endpoints.
pub fn router(handler: ProtocolHandler) -> Router {
    Router::new()
        .route("/asp", post(handle_request))
        .route("/asp/discover", get(handle_discover))
        .route("/health", get(handle_health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(handler)
}

/// HTTP status for an error code. The body is always an envelope.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::UnknownType => StatusCode::OK,
        ErrorCode::ParseError
        | ErrorCode::InvalidRequest
        | ErrorCode::InvalidPayload
        | ErrorCode::RangeParseError => StatusCode::BAD_REQUEST,
        ErrorCode::TableNotFound => StatusCode::NOT_FOUND,
        ErrorCode::StorageError | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Handle a request envelope. Unreadable or unparseable bodies still get an
/// `ERROR` envelope back.
async fn handle_request(
    State(handler): State<ProtocolHandler>,
    body: Result<Bytes, BytesRejection>,
) -> (StatusCode, AxumJson<Envelope>) {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            let error = AspError::InvalidRequest(rejection.body_text());
            return (rejection.status(), AxumJson(handler.error_envelope(&error)));
        }
    };

    let request = match std::str::from_utf8(&body) {
        Ok(text) => framing::parse_request(text),
        Err(e) => Err(AspError::ParseError(e.to_string())),
    };

    let outcome = match request {
        Ok(request) => {
            let worker = handler.clone();
            tokio::task::spawn_blocking(move || worker.process(&request))
                .await
                .unwrap_or_else(|e| Err(AspError::Internal(e.to_string())))
        }
        Err(e) => Err(e),
    };

    match outcome {
        Ok(envelope) => (StatusCode::OK, AxumJson(envelope)),
        Err(e) => (status_for(e.code()), AxumJson(handler.error_envelope(&e))),
    }
}

async fn handle_discover(State(handler): State<ProtocolHandler>) -> AxumJson<Envelope> {
    AxumJson(handler.discover())
}

/// Health check endpoint.
async fn handle_health(State(handler): State<ProtocolHandler>) -> AxumJson<serde_json::Value> {
    AxumJson(serde_json::json!({
        "status": "ok",
        "version": SERVER_VERSION,
        "protocol_version": ASP_VERSION,
        "message_types": handler.registry().message_types(),
    }))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
