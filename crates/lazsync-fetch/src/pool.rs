//! Fixed-size worker pool for page fetching.
//!
//! Every planned page produces exactly one tagged outcome. A fetch that
//! errors or panics is reported as a [`PageFailure`] instead of being dropped,
//! so `fetched + failed == planned` always holds for a finished run.

use async_trait::async_trait;
use futures::FutureExt;
use lazsync_types::{LazsyncError, PagePlan, PageTask};
use serde_json::value::RawValue;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

use crate::request::Params;
use crate::{ApiClient, ApiError, ApiMethod};

/// Default number of concurrent workers.
pub const DEFAULT_WORKERS: usize = 5;

/// Raw payload of one fetched page.
#[derive(Debug, Clone)]
pub struct PagePayload {
    /// The page this payload answers.
    pub task: PageTask,
    /// The envelope's `data`, undecoded.
    pub data: Option<Box<RawValue>>,
}

/// A page that could not be fetched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("page at {task} failed: {reason}")]
pub struct PageFailure {
    /// The page that failed.
    pub task: PageTask,
    /// Failure description.
    pub reason: String,
}

impl PageFailure {
    /// Creates a page failure.
    #[must_use]
    pub fn new(task: PageTask, reason: impl Into<String>) -> Self {
        Self {
            task,
            reason: reason.into(),
        }
    }
}

/// Outcome of one page task.
pub type PageOutcome = Result<PagePayload, PageFailure>;

/// Fetches a single page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the page described by `task`.
    async fn fetch_page(&self, task: PageTask) -> Result<PagePayload, ApiError>;
}

/// Fetches pages of one collection endpoint.
///
/// Each page is fetched through a fork of the template client, so concurrent
/// fetches never share request parameters.
#[derive(Debug)]
pub struct CollectionFetcher {
    template: ApiClient,
    endpoint: String,
    query: Params,
}

impl CollectionFetcher {
    /// Creates a fetcher for `endpoint`, sending `query` with every page.
    #[must_use]
    pub fn new(client: &ApiClient, endpoint: impl Into<String>, query: Params) -> Self {
        Self {
            template: client.fork(),
            endpoint: endpoint.into(),
            query,
        }
    }

    /// Returns the endpoint path.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PageFetcher for CollectionFetcher {
    async fn fetch_page(&self, task: PageTask) -> Result<PagePayload, ApiError> {
        let mut client = self.template.fork();
        client
            .extend_api_params(&self.query)
            .add_api_param("offset", task.offset.to_string())
            .add_api_param("limit", task.limit.to_string());

        let envelope = client.execute(&self.endpoint, ApiMethod::Get, None).await?;
        let envelope = client.ensure_success(envelope)?;
        Ok(PagePayload {
            task,
            data: envelope.data,
        })
    }
}

/// Decides whether a run with failed pages is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Any failed page fails the whole run.
    #[default]
    AbortOnFailure,
    /// Failed pages are reported but the fetched pages are kept.
    AcceptPartial,
}

/// Results of one pool run.
#[derive(Debug, Clone)]
pub struct PoolReport {
    planned: usize,
    outcomes: Vec<PageOutcome>,
}

impl PoolReport {
    /// Creates a report from raw outcomes.
    #[must_use]
    pub const fn from_outcomes(planned: usize, outcomes: Vec<PageOutcome>) -> Self {
        Self { planned, outcomes }
    }

    /// Returns the number of planned pages.
    #[must_use]
    pub const fn planned(&self) -> usize {
        self.planned
    }

    /// Returns all outcomes in completion order.
    #[must_use]
    pub fn outcomes(&self) -> &[PageOutcome] {
        &self.outcomes
    }

    /// Returns the fetched pages in completion order.
    pub fn fetched(&self) -> impl Iterator<Item = &PagePayload> {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok())
    }

    /// Returns the failed pages in completion order.
    pub fn failures(&self) -> impl Iterator<Item = &PageFailure> {
        self.outcomes.iter().filter_map(|o| o.as_ref().err())
    }

    /// Returns the number of fetched pages.
    #[must_use]
    pub fn fetched_count(&self) -> usize {
        self.fetched().count()
    }

    /// Returns the number of failed pages.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    /// Returns true if every planned page was fetched.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed_count() == 0 && self.fetched_count() == self.planned
    }

    /// Returns the fetched pages ordered by offset.
    #[must_use]
    pub fn sorted_pages(&self) -> Vec<&PagePayload> {
        let mut pages: Vec<&PagePayload> = self.fetched().collect();
        pages.sort_by_key(|p| p.task.offset);
        pages
    }

    /// Splits the report into fetched pages (ordered by offset) and failures.
    #[must_use]
    pub fn into_parts(self) -> (Vec<PagePayload>, Vec<PageFailure>) {
        let mut pages = Vec::new();
        let mut failures = Vec::new();
        for outcome in self.outcomes {
            match outcome {
                Ok(page) => pages.push(page),
                Err(failure) => failures.push(failure),
            }
        }
        pages.sort_by_key(|p| p.task.offset);
        (pages, failures)
    }

    /// Applies a failure policy.
    ///
    /// # Errors
    ///
    /// Returns [`LazsyncError::PartialFailure`] under
    /// [`FailurePolicy::AbortOnFailure`] if any page failed.
    pub fn apply(self, policy: FailurePolicy) -> Result<Self, LazsyncError> {
        let failed = self.failed_count();
        if failed > 0 && policy == FailurePolicy::AbortOnFailure {
            return Err(LazsyncError::PartialFailure {
                failed,
                planned: self.planned,
            });
        }
        Ok(self)
    }
}

/// Fixed-size pool of page-fetching workers.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}

impl WorkerPool {
    /// Creates a pool with `workers` workers (at least one).
    #[must_use]
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Returns the worker count.
    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Fetches every page of `plan` and returns once all workers are done.
    ///
    /// The task and result queues are sized to the task count, so neither
    /// enqueue ever waits.
    pub async fn run<F>(&self, fetcher: Arc<F>, plan: PagePlan) -> PoolReport
    where
        F: PageFetcher + ?Sized + 'static,
    {
        let planned = plan.len();
        if planned == 0 {
            return PoolReport::from_outcomes(0, Vec::new());
        }

        let (task_tx, task_rx) = mpsc::channel::<PageTask>(planned);
        for task in plan {
            if task_tx.try_send(task).is_err() {
                break;
            }
        }
        drop(task_tx);
        let task_rx = Arc::new(Mutex::new(task_rx));

        let (result_tx, mut result_rx) = mpsc::channel::<PageOutcome>(planned);
        let workers = self.workers.min(planned);
        debug!(planned, workers, "starting worker pool");

        let mut handles = Vec::with_capacity(workers);
        for worker in 0..workers {
            let tasks = Arc::clone(&task_rx);
            let results = result_tx.clone();
            let fetcher = Arc::clone(&fetcher);
            handles.push(tokio::spawn(async move {
                loop {
                    let Some(task) = tasks.lock().await.recv().await else {
                        break;
                    };
                    let outcome = fetch_one(fetcher.as_ref(), task).await;
                    if results.send(outcome).await.is_err() {
                        break;
                    }
                }
                debug!(worker, "worker finished");
            }));
        }
        drop(result_tx);

        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "worker task ended abnormally");
            }
        }

        let mut outcomes = Vec::with_capacity(planned);
        while let Some(outcome) = result_rx.recv().await {
            outcomes.push(outcome);
        }
        PoolReport::from_outcomes(planned, outcomes)
    }
}

/// Fetches one page, turning errors and panics into a [`PageFailure`].
pub(crate) async fn fetch_one<F>(fetcher: &F, task: PageTask) -> PageOutcome
where
    F: PageFetcher + ?Sized,
{
    match AssertUnwindSafe(fetcher.fetch_page(task)).catch_unwind().await {
        Ok(Ok(payload)) => {
            debug!(%task, "page fetched");
            Ok(payload)
        }
        Ok(Err(e)) => {
            warn!(%task, error = %e, "page fetch failed");
            Err(PageFailure::new(task, e.to_string()))
        }
        Err(panic) => {
            let reason = format!("fetch panicked: {}", panic_message(panic.as_ref()));
            warn!(%task, %reason, "page fetch failed");
            Err(PageFailure::new(task, reason))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::client::tests::client_for;
    use std::collections::HashSet;
    use std::sync::Mutex as StdMutex;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Scripted fetcher recording every offset it is asked for.
    #[derive(Debug, Default)]
    pub(crate) struct MockFetcher {
        pub(crate) fail: HashSet<u64>,
        pub(crate) panic: HashSet<u64>,
        pub(crate) seen: StdMutex<Vec<u64>>,
    }

    #[async_trait]
    impl PageFetcher for MockFetcher {
        async fn fetch_page(&self, task: PageTask) -> Result<PagePayload, ApiError> {
            self.seen.lock().unwrap().push(task.offset);
            tokio::task::yield_now().await;
            if self.panic.contains(&task.offset) {
                panic!("boom at {}", task.offset);
            }
            if self.fail.contains(&task.offset) {
                return Err(ApiError::Status { status: 500 });
            }
            let json = format!(r#"{{"offset":{}}}"#, task.offset);
            Ok(PagePayload {
                task,
                data: Some(RawValue::from_string(json).unwrap()),
            })
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_every_task_has_one_outcome() {
        for workers in [1, 2, 3, 5, 16] {
            let fetcher = Arc::new(MockFetcher {
                fail: HashSet::from([18, 90]),
                ..Default::default()
            });
            let plan = PagePlan::new(200, 18).unwrap();
            let report = WorkerPool::new(workers)
                .run(Arc::clone(&fetcher), plan)
                .await;

            assert_eq!(report.planned(), 12);
            assert_eq!(report.fetched_count() + report.failed_count(), 12);
            assert_eq!(report.failed_count(), 2);

            let mut seen = fetcher.seen.lock().unwrap().clone();
            seen.sort_unstable();
            let expected: Vec<u64> = (0..12).map(|i| i * 18).collect();
            assert_eq!(seen, expected, "workers = {workers}");
        }
    }

    #[tokio::test]
    async fn test_empty_plan() {
        let fetcher = Arc::new(MockFetcher::default());
        let report = WorkerPool::new(5)
            .run(Arc::clone(&fetcher), PagePlan::new(0, 18).unwrap())
            .await;
        assert_eq!(report.planned(), 0);
        assert!(report.outcomes().is_empty());
        assert!(report.is_complete());
        assert!(fetcher.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_panic_becomes_failure() {
        let fetcher = Arc::new(MockFetcher {
            panic: HashSet::from([36]),
            ..Default::default()
        });
        let report = WorkerPool::new(2)
            .run(fetcher, PagePlan::new(90, 18).unwrap())
            .await;

        assert_eq!(report.fetched_count(), 4);
        let failures: Vec<&PageFailure> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].task, PageTask::new(36, 18));
        assert!(failures[0].reason.contains("boom at 36"));
    }

    #[tokio::test]
    async fn test_sorted_pages_and_policy() {
        let fetcher = Arc::new(MockFetcher {
            fail: HashSet::from([0]),
            ..Default::default()
        });
        let report = WorkerPool::new(3)
            .run(fetcher, PagePlan::new(54, 18).unwrap())
            .await;

        let offsets: Vec<u64> = report.sorted_pages().iter().map(|p| p.task.offset).collect();
        assert_eq!(offsets, vec![18, 36]);
        assert!(!report.is_complete());

        let err = report.clone().apply(FailurePolicy::AbortOnFailure).unwrap_err();
        assert!(matches!(
            err,
            LazsyncError::PartialFailure {
                failed: 1,
                planned: 3
            }
        ));

        let (pages, failures) = report
            .apply(FailurePolicy::AcceptPartial)
            .unwrap()
            .into_parts();
        assert_eq!(pages.len(), 2);
        assert_eq!(failures[0].task.offset, 0);
    }

    #[test]
    fn test_worker_count_floor() {
        assert_eq!(WorkerPool::new(0).workers(), 1);
        assert_eq!(WorkerPool::default().workers(), DEFAULT_WORKERS);
    }

    #[tokio::test]
    async fn test_collection_fetcher() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/orders/get"))
            .and(query_param("offset", "18"))
            .and(query_param("limit", "18"))
            .and(query_param("status", "pending"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"code":"0","data":{"countTotal":20,"orders":[{"order_number":1},{"order_number":2}]}}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let mut client = client_for(&server.uri());
        client.set_access_token("token").add_api_param("stale", "x");

        let mut query = Params::new();
        query.insert("status".to_string(), "pending".to_string());
        let fetcher = CollectionFetcher::new(&client, "/orders/get", query);

        let payload = fetcher.fetch_page(PageTask::new(18, 18)).await.unwrap();
        assert_eq!(payload.task.offset, 18);
        assert!(payload.data.unwrap().get().contains("orders"));

        let requests = server.received_requests().await.unwrap();
        let pairs: Vec<(String, String)> = requests[0]
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("access_token".to_string(), "token".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k == "stale"));
    }

    #[tokio::test]
    async fn test_collection_fetcher_application_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"type":"ISP","code":"ServiceTimeout","message":"timeout","request_id":"r4"}"#,
            ))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let fetcher = Arc::new(CollectionFetcher::new(&client, "/orders/get", Params::new()));
        let report = WorkerPool::new(2)
            .run(fetcher, PagePlan::new(36, 18).unwrap())
            .await;

        assert_eq!(report.failed_count(), 2);
        assert!(report.failures().all(|f| f.reason.contains("ServiceTimeout")));
    }
}
