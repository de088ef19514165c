//! Page planning and offset iteration.

use serde::{Deserialize, Serialize};

use crate::PagePlanError;

/// One bounded `(offset, limit)` slice of a remote collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PageTask {
    /// Index of the first item in the page.
    pub offset: u64,
    /// Maximum number of items requested.
    pub limit: u32,
}

impl PageTask {
    /// Creates a new page task.
    #[must_use]
    pub const fn new(offset: u64, limit: u32) -> Self {
        Self { offset, limit }
    }
}

impl std::fmt::Display for PageTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "offset {} limit {}", self.offset, self.limit)
    }
}

/// Iterator over the pages needed to cover `total` items.
///
/// Offsets run `0, page_size, 2 * page_size, ...` while `offset < total`.
/// Every page requests the full page size, including the last one; the
/// server is expected to return a short page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePlan {
    next_offset: u64,
    total: u64,
    page_size: u32,
}

impl PagePlan {
    /// Creates a page plan, validating that the page size is non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if `page_size` is zero.
    pub const fn new(total: u64, page_size: u32) -> Result<Self, PagePlanError> {
        if page_size == 0 {
            return Err(PagePlanError::ZeroPageSize);
        }
        Ok(Self {
            next_offset: 0,
            total,
            page_size,
        })
    }

    /// Returns the total number of items being planned for.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Returns the page size.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the number of pages remaining in the plan.
    #[must_use]
    pub const fn remaining_pages(&self) -> usize {
        if self.next_offset >= self.total {
            return 0;
        }
        (self.total - self.next_offset).div_ceil(self.page_size as u64) as usize
    }
}

impl Iterator for PagePlan {
    type Item = PageTask;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_offset >= self.total {
            return None;
        }

        let task = PageTask::new(self.next_offset, self.page_size);
        self.next_offset = self.next_offset.saturating_add(u64::from(self.page_size));
        Some(task)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let pages = self.remaining_pages();
        (pages, Some(pages))
    }
}

impl ExactSizeIterator for PagePlan {}

/// Plans the pages needed to fetch `total` items `page_size` at a time.
///
/// # Errors
///
/// Returns an error if `page_size` is zero.
pub const fn plan_pages(total: u64, page_size: u32) -> Result<PagePlan, PagePlanError> {
    PagePlan::new(total, page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(plan: PagePlan) -> Vec<(u64, u32)> {
        plan.map(|t| (t.offset, t.limit)).collect()
    }

    #[test]
    fn test_plan_with_short_last_page() {
        let plan = plan_pages(45, 18).unwrap();
        assert_eq!(plan.len(), 3);
        assert_eq!(pairs(plan), vec![(0, 18), (18, 18), (36, 18)]);
    }

    #[test]
    fn test_plan_empty() {
        let plan = plan_pages(0, 18).unwrap();
        assert_eq!(plan.len(), 0);
        assert!(pairs(plan).is_empty());
    }

    #[test]
    fn test_plan_exact_single_page() {
        assert_eq!(pairs(plan_pages(18, 18).unwrap()), vec![(0, 18)]);
    }

    #[test]
    fn test_plan_two_pages() {
        assert_eq!(pairs(plan_pages(20, 18).unwrap()), vec![(0, 18), (18, 18)]);
    }

    #[test]
    fn test_zero_page_size() {
        assert_eq!(plan_pages(10, 0), Err(PagePlanError::ZeroPageSize));
    }

    #[test]
    fn test_size_hint_tracks_progress() {
        let mut plan = plan_pages(100, 30).unwrap();
        assert_eq!(plan.len(), 4);
        plan.next();
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.total(), 100);
        assert_eq!(plan.page_size(), 30);
    }
}
