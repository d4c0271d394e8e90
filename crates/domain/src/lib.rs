//! Domain layer for the RTL transit client
//!
//! Contains value objects, entities, and domain errors shared by the
//! booking client and the live vehicle proximity monitor.
//! This layer has no I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
