//! # Username Registry Runtime
//!
//! Configuration and wiring for the registry binary.
//!
//! - `config/` - `RuntimeConfig` with `UU_*` environment overrides
//! - `container/` - store selection, filter allocation, mandatory startup
//!   population

pub mod config;
pub mod container;

pub use config::{BootstrapConfig, ConfigError, RuntimeConfig, StoreConfig};
pub use container::{open_store, RegistryContainer, RegistryService, RuntimeError};
