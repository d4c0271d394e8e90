//! Application layer - Use cases and orchestration
//!
//! Contains the port definitions the monitor depends on and the proximity
//! monitor service that watches live vehicle positions.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
