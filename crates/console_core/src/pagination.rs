/// Total page count for a list result.
///
/// With a server-reported total this is `ceil(total / per_page)`. Without
/// one it falls back to `ceil(item_count / per_page)` over the current page
/// only, which undercounts once the list spans more than one page.
pub fn compute_total_pages(reported_total: Option<u64>, item_count: usize, per_page: u32) -> u64 {
    let per_page = u64::from(per_page.max(1));
    let count = reported_total.unwrap_or(item_count as u64);
    count.div_ceil(per_page)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pagination {
    page: u32,
    per_page: u32,
    reported_total: Option<u64>,
    item_count: usize,
}

impl Pagination {
    pub(crate) fn new(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page: per_page.max(1),
            reported_total: None,
            item_count: 0,
        }
    }

    pub(crate) fn page(&self) -> u32 {
        self.page
    }

    pub(crate) fn per_page(&self) -> u32 {
        self.per_page
    }

    pub(crate) fn reported_total(&self) -> Option<u64> {
        self.reported_total
    }

    pub(crate) fn total_pages(&self) -> u64 {
        compute_total_pages(self.reported_total, self.item_count, self.per_page)
    }

    /// Back to page 1 with nothing loaded.
    pub(crate) fn reset(&mut self) {
        self.page = 1;
        self.reported_total = None;
        self.item_count = 0;
    }

    pub(crate) fn first_page(&mut self) {
        self.page = 1;
    }

    /// Returns whether the page size changed.
    pub(crate) fn set_per_page(&mut self, per_page: u32) -> bool {
        if per_page == 0 || per_page == self.per_page {
            return false;
        }
        self.per_page = per_page;
        self.page = 1;
        true
    }

    /// Advances one page. Only a server-reported total bounds the move; the
    /// single-page fallback total would otherwise pin the list to page 1.
    pub(crate) fn next_page(&mut self) -> bool {
        if self.reported_total.is_some() && u64::from(self.page) >= self.total_pages() {
            return false;
        }
        self.page = self.page.saturating_add(1);
        true
    }

    pub(crate) fn prev_page(&mut self) -> bool {
        let previous = self.page.saturating_sub(1).max(1);
        let changed = previous != self.page;
        self.page = previous;
        changed
    }

    pub(crate) fn apply_result(&mut self, reported_total: Option<u64>, item_count: usize) {
        self.reported_total = reported_total;
        self.item_count = item_count;
    }

    pub(crate) fn clear_result(&mut self) {
        self.apply_result(None, 0);
    }

    /// One row disappeared from the displayed page.
    pub(crate) fn remove_item(&mut self) {
        self.item_count = self.item_count.saturating_sub(1);
        if let Some(total) = self.reported_total.as_mut() {
            *total = total.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{compute_total_pages, Pagination};

    #[test]
    fn fallback_counts_only_the_current_page() {
        assert_eq!(compute_total_pages(None, 4, 10), 1);
        assert_eq!(compute_total_pages(None, 0, 10), 0);
        assert_eq!(compute_total_pages(Some(41), 4, 10), 5);
        assert_eq!(compute_total_pages(Some(40), 10, 10), 4);
    }

    #[test]
    fn next_page_is_bounded_by_reported_total_only() {
        let mut pagination = Pagination::new(10);
        pagination.apply_result(Some(15), 10);
        assert!(pagination.next_page());
        assert_eq!(pagination.page(), 2);
        assert!(!pagination.next_page());
        assert_eq!(pagination.page(), 2);

        let mut unbounded = Pagination::new(10);
        unbounded.apply_result(None, 10);
        assert!(unbounded.next_page());
        assert!(unbounded.next_page());
        assert_eq!(unbounded.page(), 3);
    }

    #[test]
    fn prev_page_stops_at_one() {
        let mut pagination = Pagination::new(10);
        assert!(!pagination.prev_page());
        assert_eq!(pagination.page(), 1);
    }

    #[test]
    fn removing_an_item_decrements_the_tracked_total() {
        let mut pagination = Pagination::new(10);
        pagination.apply_result(Some(11), 1);
        assert_eq!(pagination.total_pages(), 2);
        pagination.remove_item();
        assert_eq!(pagination.reported_total(), Some(10));
        assert_eq!(pagination.total_pages(), 1);
    }
}
