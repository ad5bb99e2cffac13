//! # Runtime Configuration
//!
//! Defaults suit a registry of about a million usernames. Every field can be
//! overridden from the environment:
//!
//! | Variable | Field |
//! |---|---|
//! | `UU_EXPECTED_USERNAMES` | `filter.expected_usernames` |
//! | `UU_TARGET_FPR` | `filter.target_fpr` |
//! | `UU_FILTER_BITS` | `filter.size_bits` |
//! | `UU_FILTER_HASHES` | `filter.hash_count` |
//! | `UU_HASH_STRATEGY` | `filter.strategy` (`double` or `independent`) |
//! | `UU_STORE_TIMEOUT_MS` | `store.timeout` (0 disables) |
//! | `UU_BOOTSTRAP_PAGE_SIZE` | `bootstrap.page_size` |
//! | `UU_DATA_DIR` | `store.data_dir` |
//!
//! Values that fail to parse are logged and ignored.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};
use uu_01_membership_filter::{FilterConfig, FilterError, HashStrategy};
use uu_02_availability::DEFAULT_PAGE_SIZE;

/// Complete runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    /// Membership filter sizing.
    pub filter: FilterConfig,
    /// Authoritative store configuration.
    pub store: StoreConfig,
    /// Startup population configuration.
    pub bootstrap: BootstrapConfig,
}

/// Authoritative store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// RocksDB directory. `None` selects the in-memory store.
    pub data_dir: Option<PathBuf>,
    /// Upper bound on a single store call.
    pub timeout: Option<Duration>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            timeout: Some(Duration::from_secs(2)),
        }
    }
}

/// Startup population configuration.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Usernames fetched per store page.
    pub page_size: usize,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl RuntimeConfig {
    /// Defaults overridden from the process environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply `UU_*` overrides using `lookup` to read variables.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(n) = parse_var(&lookup, "UU_EXPECTED_USERNAMES") {
            self.filter.expected_usernames = n;
        }
        if let Some(fpr) = parse_var(&lookup, "UU_TARGET_FPR") {
            self.filter.target_fpr = fpr;
        }
        if let Some(bits) = parse_var(&lookup, "UU_FILTER_BITS") {
            self.filter.size_bits = Some(bits);
        }
        if let Some(k) = parse_var(&lookup, "UU_FILTER_HASHES") {
            self.filter.hash_count = Some(k);
        }
        if let Some(name) = lookup("UU_HASH_STRATEGY") {
            match HashStrategy::parse(&name) {
                Some(strategy) => self.filter.strategy = strategy,
                None => warn!(value = %name, "UU_HASH_STRATEGY must be 'double' or 'independent'"),
            }
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "UU_STORE_TIMEOUT_MS") {
            self.store.timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(page_size) = parse_var(&lookup, "UU_BOOTSTRAP_PAGE_SIZE") {
            self.bootstrap.page_size = page_size;
        }
        if let Some(dir) = lookup("UU_DATA_DIR").filter(|d| !d.trim().is_empty()) {
            info!(data_dir = %dir, "Using durable username store");
            self.store.data_dir = Some(PathBuf::from(dir));
        }
    }

    /// Validate configuration before anything is allocated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.filter.validate()?;
        if self.bootstrap.page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable environment override");
            None
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid filter configuration: {0}")]
    Filter(#[from] FilterError),

    #[error("Bootstrap page size must be greater than 0")]
    InvalidPageSize,
}
