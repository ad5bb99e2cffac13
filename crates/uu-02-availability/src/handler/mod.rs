//! Handler Layer
//!
//! Turns typed requests into `AvailabilityApi` calls and maps failures to
//! `ErrorResponse` values.

pub mod request_handler;

pub use request_handler::RequestHandler;
