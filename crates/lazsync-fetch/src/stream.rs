//! Streaming page fan-out.

use futures::stream::{self, Stream, StreamExt};
use lazsync_types::PagePlan;

use crate::pool::{PageFetcher, PageOutcome, fetch_one};

/// Creates a stream of page outcomes for `plan`.
///
/// At most `concurrency` pages are in flight at once. Outcomes are yielded
/// as they complete, not in offset order, and every planned page yields
/// exactly one outcome.
///
/// # Arguments
///
/// * `fetcher` - The page fetcher
/// * `plan` - The pages to fetch
/// * `concurrency` - Maximum pages in flight (at least one)
pub fn page_stream<'a, F>(
    fetcher: &'a F,
    plan: PagePlan,
    concurrency: usize,
) -> impl Stream<Item = PageOutcome> + 'a
where
    F: PageFetcher + ?Sized,
{
    stream::iter(plan)
        .map(move |task| fetch_one(fetcher, task))
        .buffer_unordered(concurrency.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::tests::MockFetcher;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_page_stream_yields_every_page() {
        let fetcher = MockFetcher {
            fail: HashSet::from([36]),
            ..Default::default()
        };
        let outcomes: Vec<PageOutcome> =
            page_stream(&fetcher, PagePlan::new(100, 18).unwrap(), 3)
                .collect()
                .await;

        assert_eq!(outcomes.len(), 6);
        assert_eq!(outcomes.iter().filter(|o| o.is_err()).count(), 1);

        let mut offsets: Vec<u64> = outcomes
            .iter()
            .map(|o| match o {
                Ok(page) => page.task.offset,
                Err(failure) => failure.task.offset,
            })
            .collect();
        offsets.sort_unstable();
        assert_eq!(offsets, vec![0, 18, 36, 54, 72, 90]);
    }

    #[tokio::test]
    async fn test_page_stream_zero_concurrency() {
        let fetcher = MockFetcher::default();
        let outcomes: Vec<PageOutcome> = page_stream(&fetcher, PagePlan::new(20, 18).unwrap(), 0)
            .collect()
            .await;
        assert_eq!(outcomes.len(), 2);
    }
}
