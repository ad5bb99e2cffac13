//! # Startup Population
//!
//! A fresh filter must be populated from the authoritative store before any
//! check is served; afterwards every stored username reports unavailable.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uu_01_membership_filter::MembershipFilter;
    use uu_02_availability::{
        populate_filter, AvailabilityApi, AvailabilityService, InMemoryUsernameStore, Username,
        UsernameRecord,
    };
    use uu_runtime::{RegistryContainer, RuntimeConfig};

    use crate::integration::CountingStore;

    fn store_with(n: usize) -> InMemoryUsernameStore {
        InMemoryUsernameStore::with_records(
            (0..n).map(|i| UsernameRecord::new(Username::parse(&format!("existing_{i:05}")).unwrap())),
        )
    }

    #[tokio::test]
    async fn test_population_marks_existing_unavailable() {
        let store = Arc::new(store_with(2_500));
        let filter = Arc::new(MembershipFilter::with_capacity(5_000, 0.01).unwrap());

        let report = populate_filter(&filter, store.as_ref(), 1_000).await.unwrap();
        assert_eq!(report.usernames_loaded, 2_500);
        assert_eq!(report.pages, 3);

        let service = AvailabilityService::new(store, filter);
        for i in (0..2_500).step_by(97) {
            let outcome = service.check(&format!("existing_{i:05}")).await.unwrap();
            assert!(!outcome.available);
        }
    }

    #[tokio::test]
    async fn test_unpopulated_filter_needs_bootstrap() {
        // Without population, claims still conflict because the store decides
        let store = Arc::new(store_with(10));
        let filter = Arc::new(MembershipFilter::with_capacity(100, 0.01).unwrap());
        let service = AvailabilityService::new(store, filter);

        assert!(service.claim("existing_00003").await.is_err());

        service.populate_filter(4).await.unwrap();
        assert!(!service.check("existing_00003").await.unwrap().available);
    }

    #[tokio::test]
    async fn test_runtime_start_populates_through_pages() {
        let store = Arc::new(CountingStore::new(store_with(40)));
        let mut config = RuntimeConfig::default();
        config.filter.expected_usernames = 1_000;
        config.bootstrap.page_size = 16;

        let registry = RegistryContainer::start_with_store(&config, store.clone())
            .await
            .unwrap();

        assert_eq!(registry.bootstrap.usernames_loaded, 40);
        // 16 + 16 + 8, short page ends the scan
        assert_eq!(store.list_calls.load(std::sync::atomic::Ordering::SeqCst), 3);
        assert_eq!(registry.service.filter().insertions(), 40);
    }

    #[cfg(feature = "rocksdb")]
    #[tokio::test]
    async fn test_durable_store_recovers_filter_after_restart() {
        use uu_02_availability::RocksDbUsernameStore;

        let dir = tempfile::TempDir::new().unwrap();
        let mut config = RuntimeConfig::default();
        config.filter.expected_usernames = 1_000;
        config.store.data_dir = Some(dir.path().to_path_buf());

        {
            let registry = RegistryContainer::start(&config).await.unwrap();
            for name in ["heidi", "ivan", "judy"] {
                registry.service.claim(name).await.unwrap();
            }
        }

        let registry = RegistryContainer::start(&config).await.unwrap();
        assert_eq!(registry.bootstrap.usernames_loaded, 3);
        for name in ["heidi", "ivan", "judy"] {
            assert!(!registry.service.check(name).await.unwrap().available);
        }
        assert!(registry.service.check("mallory").await.unwrap().available);
    }
}
