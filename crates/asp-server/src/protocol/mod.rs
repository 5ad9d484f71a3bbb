//! ASP protocol handling — handler registry and dispatch.

pub mod handler;
pub mod registry;
pub mod validator;

pub use handler::ProtocolHandler;
pub use registry::{HandlerRegistry, HandlerRegistryBuilder, MessageHandler};
