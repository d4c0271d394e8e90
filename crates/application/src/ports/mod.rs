//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod live_position_port;

#[cfg(test)]
pub use live_position_port::MockLivePositionPort;
pub use live_position_port::LivePositionPort;
