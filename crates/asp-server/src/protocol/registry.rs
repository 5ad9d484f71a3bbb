//! Handler registration: an immutable map from message type to handler.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::types::{AspRequest, AspResult};

/// Produces the raw result payload for one message type.
///
/// Handlers receive the whole request so they can read envelope metadata,
/// not just the payload.
pub trait MessageHandler: Send + Sync {
    fn handle(&self, request: &AspRequest) -> AspResult<Value>;
}

impl<F> MessageHandler for F
where
    F: Fn(&AspRequest) -> AspResult<Value> + Send + Sync,
{
    fn handle(&self, request: &AspRequest) -> AspResult<Value> {
        self(request)
    }
}

/// Message type → handler, fixed once built.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn MessageHandler>>,
}

impl HandlerRegistry {
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::default()
    }

    pub fn get(&self, message_type: &str) -> Option<&dyn MessageHandler> {
        self.handlers.get(message_type).map(|h| h.as_ref())
    }

    pub fn contains(&self, message_type: &str) -> bool {
        self.handlers.contains_key(message_type)
    }

    /// Registered message types, sorted.
    pub fn message_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.handlers.keys().cloned().collect();
        types.sort();
        types
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("message_types", &self.message_types())
            .finish()
    }
}

/// Collects registrations at startup. Registering a type twice keeps the
/// last handler.
#[derive(Default)]
pub struct HandlerRegistryBuilder {
    handlers: HashMap<String, Arc<dyn MessageHandler>>,
}

impl HandlerRegistryBuilder {
    pub fn register(
        mut self,
        message_type: impl Into<String>,
        handler: impl MessageHandler + 'static,
    ) -> Self {
        let message_type = message_type.into();
        if self
            .handlers
            .insert(message_type.clone(), Arc::new(handler))
            .is_some()
        {
            tracing::warn!("Handler for {message_type} registered twice; keeping the last one");
        }
        self
    }

    pub fn build(self) -> HandlerRegistry {
        HandlerRegistry {
            handlers: self.handlers,
        }
    }
}
