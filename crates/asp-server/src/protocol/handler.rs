//! Main request dispatcher — resolves a request's type to its handler and
//! wraps the result in an envelope.

use std::sync::Arc;

use asp_sheets::SpreadsheetBackend;

use crate::tools::{self, ToolCatalog};
use crate::types::*;

use super::registry::{HandlerRegistry, MessageHandler};
use super::validator::validate_request;

/// Dispatches requests against an immutable handler registry and serves the
/// discovery catalog.
///
/// Holds no mutable state, so one instance can be shared across any number
/// of concurrent requests.
#[derive(Debug, Clone)]
pub struct ProtocolHandler {
    registry: Arc<HandlerRegistry>,
    catalog: Arc<ToolCatalog>,
}

impl ProtocolHandler {
    pub fn new(registry: Arc<HandlerRegistry>, catalog: Arc<ToolCatalog>) -> Self {
        for tool in catalog.tools() {
            if !registry.contains(&tool.id) {
                tracing::warn!("Tool {} is advertised but has no handler", tool.id);
            }
        }
        Self { registry, catalog }
    }

    /// The built-in tools served from `backend`.
    pub fn with_backend(backend: Arc<dyn SpreadsheetBackend>) -> AspResult<Self> {
        tracing::info!("Serving sheets from {}", backend.describe());
        let registry = tools::register_builtin(HandlerRegistry::builder(), backend).build();
        let catalog = ToolCatalog::builtin()?;
        Ok(Self::new(Arc::new(registry), Arc::new(catalog)))
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    fn handler_for(&self, request: &AspRequest) -> Option<&dyn MessageHandler> {
        request.message_type().and_then(|t| self.registry.get(t))
    }

    /// Resolve the request's type to a handler and wrap its result.
    ///
    /// An absent, non-string or unregistered type is answered with an
    /// `UNKNOWN_TYPE` error envelope. Handler failures are returned
    /// untranslated.
    pub fn dispatch(&self, request: &AspRequest) -> AspResult<Envelope> {
        let Some(handler) = self.handler_for(request) else {
            tracing::debug!("No handler for message type {:?}", request.message_type);
            return Ok(self.error_envelope(&AspError::UnknownType(request.type_label())));
        };

        tracing::debug!("Dispatching {}", request.type_label());
        let result = handler.handle(request)?;
        Ok(Envelope::data(result))
    }

    /// Dispatch, validating the request shape once a handler is known.
    ///
    /// Unknown types are reported as `UNKNOWN_TYPE` whatever the payload.
    pub fn process(&self, request: &AspRequest) -> AspResult<Envelope> {
        if self.handler_for(request).is_some() {
            validate_request(request)?;
        }
        self.dispatch(request)
    }

    /// Dispatch and convert any failure into an `ERROR` envelope.
    pub fn handle_message(&self, request: &AspRequest) -> Envelope {
        match self.process(request) {
            Ok(envelope) => envelope,
            Err(e) => self.error_envelope(&e),
        }
    }

    /// The discovery catalog as a `DISCOVER_RESPONSE` envelope.
    pub fn discover(&self) -> Envelope {
        self.catalog.discover()
    }

    /// Convert an error into an `ERROR` envelope, logging it at a level that
    /// matches who caused it.
    pub fn error_envelope(&self, error: &AspError) -> Envelope {
        if error.is_client_error() {
            tracing::warn!("Request failed: {error}");
        } else {
            tracing::error!("Request failed: {error}");
        }
        let payload = error.to_payload();
        Envelope::error(payload.code, payload.message)
    }

    pub fn server_info(&self) -> ServerInfo {
        ServerInfo::new(self.registry.message_types(), self.catalog.tools().to_vec())
    }
}
