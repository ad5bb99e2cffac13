//! Availability Service
//!
//! Implements `AvailabilityApi` on top of a shared `MembershipFilter` and an
//! injected `UsernameStore`.
//!
//! Ordering rule for claims: the store write is awaited before any filter bit
//! is set. When `save` fails or times out its outcome is unknown, so the bits
//! are set anyway: the filter may over-report a username, never under-report
//! one the store holds.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uu_01_membership_filter::MembershipFilter;

use crate::domain::{CheckOutcome, Resolution, Username, UsernameRecord};
use crate::error::{AvailabilityError, StoreError};
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::{AvailabilityApi, SaveOutcome, UsernameStore};
use crate::service::bootstrap::{populate_filter, BootstrapReport};

/// Availability resolver
pub struct AvailabilityService<S: UsernameStore + ?Sized> {
    /// Authoritative store (driven port)
    store: Arc<S>,
    /// Pre-filter shared by every request
    filter: Arc<MembershipFilter>,
    metrics: Arc<dyn MetricsRecorder>,
    /// Upper bound on a single store call; `None` leaves it to the store
    store_timeout: Option<Duration>,
}

impl<S: UsernameStore + ?Sized> AvailabilityService<S> {
    /// Create a service over `store` and `filter`.
    ///
    /// The filter must already hold every stored username (see
    /// [`populate_filter`]) or be populated via [`Self::populate_filter`]
    /// before checks are served.
    pub fn new(store: Arc<S>, filter: Arc<MembershipFilter>) -> Self {
        Self {
            store,
            filter,
            metrics: Arc::new(NoOpMetrics),
            store_timeout: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = Some(timeout);
        self
    }

    pub fn filter(&self) -> &Arc<MembershipFilter> {
        &self.filter
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Replay every stored username into the filter.
    pub async fn populate_filter(&self, page_size: usize) -> Result<BootstrapReport, AvailabilityError> {
        populate_filter(&self.filter, self.store.as_ref(), page_size).await
    }

    fn validate(&self, raw: &str) -> Result<Username, AvailabilityError> {
        Username::parse(raw).inspect_err(|_| self.metrics.record_invalid_input())
    }

    /// Run a store call under the configured timeout.
    async fn store_call<T, F>(&self, operation: &'static str, call: F) -> Result<T, AvailabilityError>
    where
        F: Future<Output = Result<T, StoreError>> + Send,
    {
        let result = match self.store_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or(Err(StoreError::Timeout)),
            None => call.await,
        };

        result.map_err(|e| {
            self.metrics.record_store_error();
            warn!(operation, error = %e, "username store call failed");
            AvailabilityError::StoreUnavailable(e)
        })
    }
}

#[async_trait]
impl<S: UsernameStore + ?Sized + 'static> AvailabilityApi for AvailabilityService<S> {
    async fn check(&self, username: &str) -> Result<CheckOutcome, AvailabilityError> {
        let start = Instant::now();
        let username = self.validate(username)?;

        let resolution = if !self.filter.might_contain(username.as_str()) {
            Resolution::FilterMiss
        } else if self
            .store_call("exists", self.store.exists(username.as_str()))
            .await?
        {
            Resolution::StoreConfirmed
        } else {
            Resolution::FalsePositive
        };

        self.metrics.record_check(resolution, start.elapsed());
        debug!(username = %username, ?resolution, "availability checked");

        Ok(CheckOutcome::from_resolution(resolution))
    }

    async fn claim(&self, username: &str) -> Result<UsernameRecord, AvailabilityError> {
        let start = Instant::now();
        let username = self.validate(username)?;

        // The store decides conflicts; the filter is never trusted here
        if self
            .store_call("exists", self.store.exists(username.as_str()))
            .await?
        {
            self.metrics.record_conflict();
            debug!(username = %username, "claim rejected: already taken");
            return Err(AvailabilityError::Conflict {
                username: username.into_inner(),
            });
        }

        let record = UsernameRecord::new(username);
        let saved = match self.store_call("save", self.store.save(&record)).await {
            Ok(outcome) => outcome,
            Err(err) => {
                // Outcome unknown: the write may still commit after we give up.
                // A stray bit is a false positive, a missing one a false negative.
                self.filter.insert(record.username.as_str());
                return Err(err);
            }
        };
        match saved {
            SaveOutcome::Saved => {}
            SaveOutcome::AlreadyExists => {
                // Lost a race with a concurrent claim of the same name
                self.metrics.record_conflict();
                debug!(username = %record.username, "claim rejected: saved concurrently");
                return Err(AvailabilityError::Conflict {
                    username: record.username.into_inner(),
                });
            }
        }

        // Committed; only now may readers see the bits
        self.filter.insert(record.username.as_str());

        self.metrics.record_claim(start.elapsed());
        info!(username = %record.username, "username claimed");

        Ok(record)
    }
}
