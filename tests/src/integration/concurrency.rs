//! # Concurrent Access
//!
//! Many tasks share one service: racing claims must produce exactly one
//! winner, and concurrent claims of distinct names must all land in the
//! filter.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::task::JoinSet;
    use uu_01_membership_filter::MembershipFilter;
    use uu_02_availability::{
        AvailabilityApi, AvailabilityError, AvailabilityService, InMemoryUsernameStore,
        UsernameStore,
    };

    use crate::integration::SlowSaveStore;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_claims_single_winner() {
        let store = Arc::new(InMemoryUsernameStore::new());
        let filter = Arc::new(MembershipFilter::with_capacity(1000, 0.01).unwrap());
        let service = Arc::new(AvailabilityService::new(store.clone(), filter));

        let mut tasks = JoinSet::new();
        for _ in 0..32 {
            let service = service.clone();
            tasks.spawn(async move { service.claim("frank").await });
        }

        let mut winners = 0;
        let mut conflicts = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined.unwrap() {
                Ok(record) => {
                    assert_eq!(record.username.as_str(), "frank");
                    winners += 1;
                }
                Err(AvailabilityError::Conflict { .. }) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(conflicts, 31);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_race_past_existence_check_still_single_winner() {
        let store = Arc::new(SlowSaveStore::new());
        let filter = Arc::new(MembershipFilter::with_capacity(1000, 0.01).unwrap());
        let service = Arc::new(AvailabilityService::new(store.clone(), filter.clone()));

        let mut tasks = JoinSet::new();
        for _ in 0..8 {
            let service = service.clone();
            tasks.spawn(async move { service.claim("grace").await });
        }

        let mut winners = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined.unwrap() {
                Ok(_) => winners += 1,
                Err(AvailabilityError::Conflict { .. }) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(winners, 1);
        // Losers never touch the filter
        assert_eq!(filter.insertions(), 1);
        assert!(!service.check("grace").await.unwrap().available);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_distinct_claims_all_visible() {
        let store = Arc::new(InMemoryUsernameStore::new());
        let filter = Arc::new(MembershipFilter::with_capacity(10_000, 0.01).unwrap());
        let service = Arc::new(AvailabilityService::new(store, filter.clone()));

        let mut tasks = JoinSet::new();
        for t in 0..8 {
            let service = service.clone();
            tasks.spawn(async move {
                for i in 0..100 {
                    service.claim(&format!("t{t}_user{i}")).await.unwrap();
                }
            });
        }
        while let Some(joined) = tasks.join_next().await {
            joined.unwrap();
        }

        assert_eq!(filter.insertions(), 800);
        for t in 0..8 {
            for i in 0..100 {
                let name = format!("t{t}_user{i}");
                assert!(filter.might_contain(&name));
                assert!(!service.check(&name).await.unwrap().available);
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_checks_during_claims_never_lose_committed_names() {
        let store = Arc::new(InMemoryUsernameStore::new());
        let filter = Arc::new(MembershipFilter::with_capacity(10_000, 0.01).unwrap());
        let service = Arc::new(AvailabilityService::new(store, filter));

        let writer = {
            let service = service.clone();
            tokio::spawn(async move {
                for i in 0..300 {
                    service.claim(&format!("w{i}")).await.unwrap();
                }
            })
        };

        let reader = {
            let service = service.clone();
            tokio::spawn(async move {
                for _ in 0..3 {
                    for i in 0..300 {
                        let _ = service.check(&format!("w{i}")).await.unwrap();
                    }
                }
            })
        };

        writer.await.unwrap();
        reader.await.unwrap();

        for i in 0..300 {
            assert!(!service.check(&format!("w{i}")).await.unwrap().available);
        }
    }
}
