//! Domain Layer - Availability value types
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod username;

pub use username::{CheckOutcome, Resolution, Username, UsernameRecord};
