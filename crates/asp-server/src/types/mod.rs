//! All ASP data types used by the server.

pub mod capabilities;
pub mod envelope;
pub mod error;
pub mod request;
pub mod tool;

pub use capabilities::*;
pub use envelope::*;
pub use error::*;
pub use request::*;
pub use tool::*;
