//! Application layer - Use cases and orchestration
//!
//! Contains the speech pipeline, the visual/gesture presence controller, and
//! the port definitions the infrastructure adapters implement. Orchestrates
//! domain objects; owns no I/O of its own.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
