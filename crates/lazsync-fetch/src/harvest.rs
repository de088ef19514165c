//! Discover, plan and fan out over one collection.

use lazsync_types::{Collection, LazsyncError, PagePlan};
use std::sync::Arc;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::pager::{TotalCount, discover_total};
use crate::pool::{CollectionFetcher, DEFAULT_WORKERS, FailurePolicy, PoolReport, WorkerPool};
use crate::request::Params;
use crate::ApiClient;

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u32 = 18;

/// What a probe without a total count means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyCountPolicy {
    /// Treat the collection as empty.
    #[default]
    TreatAsEmpty,
    /// Fail the harvest.
    Reject,
}

/// Harvest settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestConfig {
    /// Items requested per page.
    pub page_size: u32,
    /// Concurrent page fetches.
    pub workers: usize,
    /// What to do when some pages fail.
    pub failure_policy: FailurePolicy,
    /// What to do when the probe reports no count.
    pub empty_count: EmptyCountPolicy,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            workers: DEFAULT_WORKERS,
            failure_policy: FailurePolicy::default(),
            empty_count: EmptyCountPolicy::default(),
        }
    }
}

/// Result of one harvest run.
#[derive(Debug, Clone)]
pub struct Harvest {
    id: Uuid,
    collection: Collection,
    total: TotalCount,
    report: PoolReport,
}

impl Harvest {
    /// Returns the run identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the harvested collection.
    #[must_use]
    pub const fn collection(&self) -> Collection {
        self.collection
    }

    /// Returns the total count reported by the probe.
    #[must_use]
    pub const fn total(&self) -> TotalCount {
        self.total
    }

    /// Returns the pool report.
    #[must_use]
    pub const fn report(&self) -> &PoolReport {
        &self.report
    }

    /// Consumes the harvest, returning the pool report.
    #[must_use]
    pub fn into_report(self) -> PoolReport {
        self.report
    }
}

/// Harvests every page of `collection`.
///
/// `query` is sent with the probe and with every page. The client's pending
/// parameters are left untouched; the harvest works on forks.
///
/// # Errors
///
/// Returns an error if the page size is zero, the probe fails, the count is
/// missing under [`EmptyCountPolicy::Reject`], or pages fail under
/// [`FailurePolicy::AbortOnFailure`].
pub async fn harvest(
    client: &ApiClient,
    collection: Collection,
    query: &Params,
    config: &HarvestConfig,
) -> Result<Harvest, LazsyncError> {
    let id = Uuid::new_v4();
    let span = info_span!("harvest", %id, %collection);
    run(id, client, collection, query, config)
        .instrument(span)
        .await
}

async fn run(
    id: Uuid,
    client: &ApiClient,
    collection: Collection,
    query: &Params,
    config: &HarvestConfig,
) -> Result<Harvest, LazsyncError> {
    PagePlan::new(0, config.page_size)?;

    let mut probe = client.fork();
    probe.extend_api_params(query);
    let total = discover_total(&mut probe, collection.path(), collection.count_field()).await?;

    if !total.is_reported() && config.empty_count == EmptyCountPolicy::Reject {
        return Err(LazsyncError::MissingCount {
            endpoint: collection.path().to_string(),
        });
    }

    let plan = PagePlan::new(total.value(), config.page_size)?;
    info!(
        total = total.value(),
        pages = plan.len(),
        workers = config.workers,
        "harvest planned"
    );

    let fetcher = Arc::new(CollectionFetcher::new(
        client,
        collection.path(),
        query.clone(),
    ));
    let report = WorkerPool::new(config.workers).run(fetcher, plan).await;
    info!(
        fetched = report.fetched_count(),
        failed = report.failed_count(),
        "harvest finished"
    );

    let report = report.apply(config.failure_policy)?;
    Ok(Harvest {
        id,
        collection,
        total,
        report,
    })
}
