//! # Registry Container
//!
//! Wires the store, filter, service and request handler together.
//!
//! ## Startup Sequence
//!
//! 1. Validate configuration
//! 2. Open the authoritative store (RocksDB when `data_dir` is set)
//! 3. Allocate the membership filter
//! 4. Populate the filter from every stored username
//! 5. Hand out the request handler
//!
//! Nothing is served before step 4 completes.

use std::sync::Arc;

use tracing::{info, warn};
use uu_01_membership_filter::MembershipFilter;
use uu_02_availability::{
    AvailabilityError, AvailabilityMetrics, AvailabilityService, BootstrapReport,
    InMemoryUsernameStore, RequestHandler, StoreError, UsernameStore,
};

use crate::config::{ConfigError, RuntimeConfig};

/// Service over a runtime-selected store.
pub type RegistryService = AvailabilityService<dyn UsernameStore>;

/// Startup errors.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to open username store: {0}")]
    Store(#[from] StoreError),

    #[error("Startup population failed: {0}")]
    Bootstrap(#[from] AvailabilityError),

    #[error("A data directory was configured but this build has no durable store (enable the `rocksdb` feature)")]
    DurableStoreUnavailable,
}

/// Fully wired registry, populated and ready to serve.
pub struct RegistryContainer {
    pub service: Arc<RegistryService>,
    pub handler: RequestHandler<RegistryService>,
    pub metrics: Arc<AvailabilityMetrics>,
    pub bootstrap: BootstrapReport,
}

impl RegistryContainer {
    /// Build the registry from `config` and populate the filter.
    pub async fn start(config: &RuntimeConfig) -> Result<Self, RuntimeError> {
        let store = open_store(config)?;
        Self::start_with_store(config, store).await
    }

    /// Build the registry over an already-open store.
    pub async fn start_with_store(
        config: &RuntimeConfig,
        store: Arc<dyn UsernameStore>,
    ) -> Result<Self, RuntimeError> {
        config.validate()?;

        let filter = MembershipFilter::from_config(&config.filter)
            .map_err(|e| RuntimeError::Config(ConfigError::Filter(e)))?;
        info!(
            size_bits = filter.size_bits(),
            hash_count = filter.hash_count(),
            strategy = ?filter.hash_family().strategy(),
            "Membership filter allocated"
        );

        let metrics = Arc::new(AvailabilityMetrics::new());
        let mut service = AvailabilityService::new(store, Arc::new(filter))
            .with_metrics(metrics.clone());
        if let Some(timeout) = config.store.timeout {
            service = service.with_store_timeout(timeout);
        }
        let service = Arc::new(service);

        let bootstrap = service.populate_filter(config.bootstrap.page_size).await?;

        let estimated = service.filter().estimated_fpr();
        if estimated > config.filter.target_fpr {
            warn!(
                estimated_fpr = estimated,
                target_fpr = config.filter.target_fpr,
                loaded = bootstrap.usernames_loaded,
                "Filter is over capacity; raise UU_EXPECTED_USERNAMES"
            );
        }

        Ok(Self {
            handler: RequestHandler::new(service.clone()),
            service,
            metrics,
            bootstrap,
        })
    }
}

/// Select the store backend from configuration.
pub fn open_store(config: &RuntimeConfig) -> Result<Arc<dyn UsernameStore>, RuntimeError> {
    match &config.store.data_dir {
        None => {
            info!("Using in-memory username store (not durable)");
            Ok(Arc::new(InMemoryUsernameStore::new()))
        }
        #[cfg(feature = "rocksdb")]
        Some(dir) => {
            let store = uu_02_availability::RocksDbUsernameStore::open_default(dir)?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "rocksdb"))]
        Some(_) => Err(RuntimeError::DurableStoreUnavailable),
    }
}
