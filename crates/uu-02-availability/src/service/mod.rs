//! Service Layer
//!
//! Orchestrates the membership filter and the authoritative store.

pub mod availability_service;
pub mod bootstrap;

pub use availability_service::AvailabilityService;
pub use bootstrap::{populate_filter, BootstrapReport, DEFAULT_PAGE_SIZE};
