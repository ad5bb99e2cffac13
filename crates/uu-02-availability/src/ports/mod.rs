//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - API for the request layer
//! - Driven Ports (outbound) - The authoritative username store

pub mod inbound;
pub mod outbound;

pub use inbound::AvailabilityApi;
pub use outbound::{SaveOutcome, UsernameStore};
