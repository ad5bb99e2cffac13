//! Startup population of the membership filter
//!
//! A fresh filter reports every username as "definitely absent", and filter
//! misses never reach the store. Serving checks before every stored username
//! has been replayed would report taken names as available, so this step is
//! mandatory before traffic is accepted.

use std::time::{Duration, Instant};
use tracing::{debug, info};
use uu_01_membership_filter::MembershipFilter;

use crate::error::AvailabilityError;
use crate::ports::UsernameStore;

/// Usernames fetched per `list_page` call
pub const DEFAULT_PAGE_SIZE: usize = 10_000;

/// Summary of a completed population run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BootstrapReport {
    pub usernames_loaded: u64,
    pub pages: u64,
    pub elapsed: Duration,
}

/// Replay every username in `store` into `filter`.
///
/// Any store error aborts the run; a partially populated filter must not
/// be used to answer checks.
pub async fn populate_filter<S>(
    filter: &MembershipFilter,
    store: &S,
    page_size: usize,
) -> Result<BootstrapReport, AvailabilityError>
where
    S: UsernameStore + ?Sized,
{
    if page_size == 0 {
        return Err(AvailabilityError::InvalidConfig(
            "bootstrap page size cannot be 0".to_string(),
        ));
    }

    let start = Instant::now();
    let mut cursor: Option<String> = None;
    let mut usernames_loaded = 0u64;
    let mut pages = 0u64;

    loop {
        let mut page = store.list_page(cursor.as_deref(), page_size).await?;
        if page.is_empty() {
            break;
        }

        pages += 1;
        for name in &page {
            filter.insert(name);
        }
        usernames_loaded += page.len() as u64;
        debug!(page = pages, loaded = usernames_loaded, "bootstrap page replayed");

        let last_page = page.len() < page_size;
        cursor = page.pop();
        if last_page {
            break;
        }
    }

    let report = BootstrapReport {
        usernames_loaded,
        pages,
        elapsed: start.elapsed(),
    };

    info!(
        usernames = report.usernames_loaded,
        pages = report.pages,
        elapsed_ms = report.elapsed.as_millis() as u64,
        fill_ratio = filter.fill_ratio(),
        estimated_fpr = filter.estimated_fpr(),
        "membership filter populated from store"
    );

    Ok(report)
}
