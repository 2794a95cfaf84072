//! Fetch every page of a paginated listing.
//!
//! Page 1 is fetched alone to learn `totalCount`. The remaining pages are
//! fetched in consecutive batches of at most `batch_size` concurrent tasks;
//! each batch is awaited in full before the next one starts, with
//! `api_delay` between batches. Results are reassembled in page order no
//! matter which task finishes first.
//!
//! Any failed page fails the whole run. Tasks already in flight are allowed
//! to finish; their results are discarded.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::time::Duration;

use cspm_core::Page;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::error::ClientError;

/// Page size for the sequential risk-acceptance listing.
pub const SEQUENTIAL_PAGE_SIZE: u32 = 50;

/// Pause between pages of the sequential listing.
pub const SEQUENTIAL_DELAY: Duration = Duration::from_secs(3);

/// Settings for [`collect_all_pages`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationOptions {
    pub page_size: u32,
    pub batch_size: u32,
    pub api_delay: Duration,
}

impl PaginationOptions {
    pub const DEFAULT_PAGE_SIZE: u32 = 50;
    pub const DEFAULT_BATCH_SIZE: u32 = 3;
    pub const DEFAULT_API_DELAY_SECS: u64 = 1;

    /// Build options from raw user input, substituting defaults for a page
    /// size ≤ 0, a batch size ≤ 0 and a negative delay.
    #[must_use]
    pub fn normalized(page_size: i64, batch_size: i64, api_delay_secs: i64) -> Self {
        let positive = |v: i64, default: u32| {
            if v <= 0 {
                default
            } else {
                u32::try_from(v).unwrap_or(u32::MAX)
            }
        };
        let delay = u64::try_from(api_delay_secs).unwrap_or(Self::DEFAULT_API_DELAY_SECS);
        Self {
            page_size: positive(page_size, Self::DEFAULT_PAGE_SIZE),
            batch_size: positive(batch_size, Self::DEFAULT_BATCH_SIZE),
            api_delay: Duration::from_secs(delay),
        }
    }
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            page_size: Self::DEFAULT_PAGE_SIZE,
            batch_size: Self::DEFAULT_BATCH_SIZE,
            api_delay: Duration::from_secs(Self::DEFAULT_API_DELAY_SECS),
        }
    }
}

/// Fetch all pages with bounded concurrency and merge them in page order.
///
/// `fetch` is called with a 1-based page number and must request
/// `opts.page_size` records per page. `context` names the listing in logs and
/// errors (e.g. the filter or endpoint).
///
/// # Errors
///
/// Returns [`ClientError::Page`] wrapping the first failure. When several
/// pages of the same batch fail, the lowest page number is reported and the
/// others are logged.
pub async fn collect_all_pages<T, F, Fut>(
    context: &str,
    fetch: F,
    opts: PaginationOptions,
) -> Result<Page<T>, ClientError>
where
    T: Send + 'static,
    F: Fn(u32) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = Result<Page<T>, ClientError>> + Send + 'static,
{
    let first = fetch(1).await.map_err(|e| e.at_page(1, context))?;
    let total_count = first.total_count;
    let total_pages = total_count.pages(opts.page_size);
    debug!(
        context,
        total_count = total_count.get(),
        total_pages,
        page_size = opts.page_size,
        batch_size = opts.batch_size,
        "fetched first page"
    );

    if total_pages <= 1 {
        return Ok(first);
    }

    let batch_size = opts.batch_size.max(1);
    let mut pages: BTreeMap<u32, Vec<T>> = BTreeMap::new();
    let mut start = 2_u32;

    while start <= total_pages {
        let end = start.saturating_add(batch_size - 1).min(total_pages);
        run_batch(context, &fetch, start..=end, &mut pages).await?;
        debug!(context, from = start, to = end, total_pages, "batch complete");

        if end >= total_pages {
            break;
        }
        start = end + 1;
        if !opts.api_delay.is_zero() {
            tokio::time::sleep(opts.api_delay).await;
        }
    }

    let mut data = first.data;
    for (_, records) in pages {
        data.extend(records);
    }

    let expected = total_count.get();
    if i64::try_from(data.len()).unwrap_or(i64::MAX) < expected {
        warn!(
            context,
            collected = data.len(),
            expected,
            "server returned fewer records than totalCount"
        );
    }

    Ok(Page { data, total_count })
}

/// Launch one task per page in `range`, wait for all of them, and fold the
/// results into `pages`. This loop is the only writer of `pages`.
async fn run_batch<T, F, Fut>(
    context: &str,
    fetch: &F,
    range: std::ops::RangeInclusive<u32>,
    pages: &mut BTreeMap<u32, Vec<T>>,
) -> Result<(), ClientError>
where
    T: Send + 'static,
    F: Fn(u32) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = Result<Page<T>, ClientError>> + Send + 'static,
{
    let mut set = JoinSet::new();
    let mut task_pages = HashMap::new();

    for page in range {
        let fetch = fetch.clone();
        let handle = set.spawn(async move { (page, fetch(page).await) });
        task_pages.insert(handle.id(), page);
    }

    let mut failures: Vec<(u32, ClientError)> = Vec::new();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((page, Ok(result))) => {
                debug!(context, page, records = result.data.len(), "page fetched");
                pages.insert(page, result.data);
            }
            Ok((page, Err(e))) => failures.push((page, e)),
            Err(join_err) => {
                let page = task_pages.get(&join_err.id()).copied().unwrap_or(0);
                failures.push((page, ClientError::Task(join_err.to_string())));
            }
        }
    }

    failures.sort_by_key(|(page, _)| *page);
    let mut failures = failures.into_iter();
    let Some((page, err)) = failures.next() else {
        return Ok(());
    };
    for (other_page, other) in failures {
        warn!(context, page = other_page, error = %other, "page failed in the same batch");
    }
    Err(err.at_page(page, context))
}

/// Fetch every page one at a time with a fixed pause between requests.
///
/// Used for endpoints with strict rate limits. Page size and delay are
/// [`SEQUENTIAL_PAGE_SIZE`] and [`SEQUENTIAL_DELAY`] in production; they are
/// parameters so callers can choose otherwise.
///
/// # Errors
///
/// Returns [`ClientError::Page`] for the first failing page.
pub async fn collect_pages_sequential<T, F, Fut>(
    context: &str,
    mut fetch: F,
    page_size: u32,
    delay: Duration,
) -> Result<Vec<T>, ClientError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>, ClientError>>,
{
    let first = fetch(1).await.map_err(|e| e.at_page(1, context))?;
    let total_pages = first.total_count.pages(page_size);
    debug!(
        context,
        total_count = first.total_count.get(),
        total_pages,
        "fetched first page"
    );

    let mut data = first.data;
    for page in 2..=total_pages {
        let result = fetch(page).await.map_err(|e| e.at_page(page, context))?;
        data.extend(result.data);
        debug!(context, page, total_pages, collected = data.len(), "page fetched");
        if page < total_pages && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
    Ok(data)
}
