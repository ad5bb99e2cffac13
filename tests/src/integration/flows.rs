//! # Check / Claim Flows
//!
//! Request handler -> availability service -> filter + store, wired the
//! same way the runtime wires them.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uu_01_membership_filter::MembershipFilter;
    use uu_02_availability::events::{error_codes, CheckUsernameRequest, ClaimUsernameRequest};
    use uu_02_availability::{
        AvailabilityApi, AvailabilityMetrics, AvailabilityService, InMemoryUsernameStore,
        RequestHandler, Resolution,
    };

    use crate::integration::CountingStore;

    type Store = CountingStore<InMemoryUsernameStore>;

    struct Fixture {
        store: Arc<Store>,
        filter: Arc<MembershipFilter>,
        metrics: Arc<AvailabilityMetrics>,
        service: Arc<AvailabilityService<Store>>,
        handler: RequestHandler<AvailabilityService<Store>>,
    }

    fn fixture(filter: MembershipFilter) -> Fixture {
        let store = Arc::new(CountingStore::new(InMemoryUsernameStore::new()));
        let filter = Arc::new(filter);
        let metrics = Arc::new(AvailabilityMetrics::new());
        let service = Arc::new(
            AvailabilityService::new(store.clone(), filter.clone()).with_metrics(metrics.clone()),
        );
        Fixture {
            handler: RequestHandler::new(service.clone()),
            store,
            filter,
            metrics,
            service,
        }
    }

    fn default_fixture() -> Fixture {
        fixture(MembershipFilter::with_capacity(10_000, 0.01).unwrap())
    }

    #[tokio::test]
    async fn test_carol_claim_conflict_check() {
        let f = default_fixture();

        let claimed = f
            .handler
            .handle_claim(ClaimUsernameRequest::new("carol"))
            .await
            .unwrap();
        assert_eq!(claimed.username, "carol");

        let conflict = f
            .handler
            .handle_claim(ClaimUsernameRequest::new("carol"))
            .await
            .unwrap_err();
        assert_eq!(conflict.status, 409);
        assert_eq!(conflict.error_code, error_codes::CONFLICT);

        let check = f
            .handler
            .handle_check(CheckUsernameRequest::new("carol"))
            .await
            .unwrap();
        assert!(!check.available);
        assert_eq!(f.store.inner.len(), 1);
    }

    #[tokio::test]
    async fn test_blank_check_touches_nothing() {
        let f = default_fixture();

        let err = f
            .handler
            .handle_check(CheckUsernameRequest::new(""))
            .await
            .unwrap_err();

        assert_eq!(err.status, 400);
        assert_eq!(err.error_code, error_codes::INVALID_INPUT);
        assert_eq!(f.store.calls(), (0, 0));
        assert_eq!(f.filter.bits_set(), 0);
        assert_eq!(f.metrics.snapshot().invalid_inputs, 1);
    }

    #[tokio::test]
    async fn test_fresh_usernames_skip_the_store() {
        let f = default_fixture();
        f.service.claim("alice").await.unwrap();
        let (exists_before, _) = f.store.calls();

        for i in 0..200 {
            let response = f
                .handler
                .handle_check(CheckUsernameRequest::new(format!("fresh_{i}")))
                .await
                .unwrap();
            assert!(response.available);
        }

        let snapshot = f.metrics.snapshot();
        let (exists_after, _) = f.store.calls();
        // Only filter hits (false positives here) reach the store
        assert_eq!(
            (exists_after - exists_before) as u64,
            snapshot.false_positives + snapshot.store_confirmed
        );
        assert!(snapshot.filter_misses >= 190);
    }

    #[tokio::test]
    async fn test_false_positive_reported_available() {
        // One-bit filter: every lookup after the first insert is a hit
        let f = fixture(MembershipFilter::new(1, 1).unwrap());
        f.service.claim("alice").await.unwrap();

        let outcome = f.service.check("bob").await.unwrap();

        assert!(outcome.available);
        assert_eq!(outcome.resolution, Resolution::FalsePositive);
        assert_eq!(f.metrics.snapshot().false_positives, 1);
    }

    #[tokio::test]
    async fn test_every_claim_reports_unavailable_afterwards() {
        let f = default_fixture();
        let names: Vec<String> = (0..500).map(|i| format!("member_{i:03}")).collect();

        for name in &names {
            f.handler
                .handle_claim(ClaimUsernameRequest::new(name.clone()))
                .await
                .unwrap();
        }

        for name in &names {
            let outcome = f.service.check(name).await.unwrap();
            assert!(!outcome.available, "{name} should be taken");
            assert_eq!(outcome.resolution, Resolution::StoreConfirmed);
        }
        assert_eq!(f.filter.insertions(), names.len());
    }

    #[tokio::test]
    async fn test_usernames_are_case_sensitive() {
        let f = default_fixture();
        f.service.claim("Dave").await.unwrap();

        assert!(f.service.check("dave").await.unwrap().available);
        assert!(f.service.claim("dave").await.is_ok());
    }
}
