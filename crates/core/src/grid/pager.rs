//! Offset pagination and the windowed page-number list.

/// Default number of rows per page.
pub const DEFAULT_ROWS_PER_PAGE: i64 = 15;

/// Page-number window shown by the pager.
///
/// The pager always shows the current page, `left_edge` pages at the start,
/// `right_edge` pages at the end, `left_current` pages before the current
/// page and `right_current` pages after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub left_edge: i64,
    pub right_edge: i64,
    pub left_current: i64,
    pub right_current: i64,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            left_edge: 1,
            right_edge: 1,
            left_current: 1,
            right_current: 2,
        }
    }
}

/// One entry of the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(i64),
    /// A run of skipped page numbers, rendered as `...`.
    Gap,
}

/// Page bounds for a grid request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub total_rows: i64,
    pub per_page: i64,
    pub current_page: i64,
    pub page_count: i64,
}

impl Pager {
    /// Compute page bounds.
    ///
    /// A requested page below 1 or past the last page resets to page 1.
    pub fn new(total_rows: i64, per_page: i64, requested_page: i64) -> Self {
        let total_rows = total_rows.max(0);
        let per_page = per_page.max(1);
        let page_count = (total_rows + per_page - 1) / per_page;
        let current_page = if requested_page < 1 || requested_page > page_count {
            1
        } else {
            requested_page
        };
        Self {
            total_rows,
            per_page,
            current_page,
            page_count,
        }
    }

    /// Row offset of the current page (SQL `OFFSET`).
    pub fn offset(&self) -> i64 {
        self.per_page * (self.current_page - 1)
    }

    /// Maximum rows on the current page (SQL `LIMIT`).
    pub fn limit(&self) -> i64 {
        self.per_page
    }

    /// 1-based number of the first displayed row, or 0 when there are none.
    pub fn first_row(&self) -> i64 {
        if self.total_rows == 0 {
            0
        } else {
            self.offset() + 1
        }
    }

    /// 1-based number of the last displayed row.
    pub fn last_row(&self) -> i64 {
        (self.offset() + self.per_page).min(self.total_rows)
    }

    pub fn has_multiple_pages(&self) -> bool {
        self.page_count > 1
    }

    /// Row counter text shown under the grid.
    pub fn summary(&self) -> String {
        format!(
            "Displaying rows {} thru {} of {}",
            self.first_row(),
            self.last_row(),
            self.total_rows
        )
    }

    /// Page numbers to show, with consecutive skipped pages collapsed into
    /// a single [`PageLink::Gap`].
    pub fn pages(&self, window: &PageWindow) -> Vec<PageLink> {
        let current = self.current_page;
        let mut links = Vec::new();
        let mut last_was_gap = false;

        for page in 1..=self.page_count {
            let shown = page == current
                || page <= window.left_edge
                || page > self.page_count - window.right_edge
                || (current - window.left_current <= page && page < current)
                || (current < page && page <= current + window.right_current);

            if shown {
                links.push(PageLink::Page(page));
                last_was_gap = false;
            } else if !last_was_gap {
                links.push(PageLink::Gap);
                last_was_gap = true;
            }
        }

        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageLink::{Gap, Page};

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(Pager::new(31, 15, 1).page_count, 3);
        assert_eq!(Pager::new(30, 15, 1).page_count, 2);
        assert_eq!(Pager::new(0, 15, 1).page_count, 0);
    }

    #[test]
    fn page_beyond_last_resets_to_first() {
        let pager = Pager::new(30, 15, 3);
        assert_eq!(pager.current_page, 1);
    }

    #[test]
    fn page_below_one_resets_to_first() {
        assert_eq!(Pager::new(30, 15, 0).current_page, 1);
        assert_eq!(Pager::new(30, 15, -4).current_page, 1);
    }

    #[test]
    fn valid_page_is_kept() {
        let pager = Pager::new(31, 15, 3);
        assert_eq!(pager.current_page, 3);
        assert_eq!(pager.offset(), 30);
        assert_eq!(pager.limit(), 15);
    }

    #[test]
    fn zero_per_page_is_clamped() {
        let pager = Pager::new(5, 0, 1);
        assert_eq!(pager.per_page, 1);
        assert_eq!(pager.page_count, 5);
    }

    #[test]
    fn summary_for_middle_page() {
        let pager = Pager::new(40, 15, 2);
        assert_eq!(pager.summary(), "Displaying rows 16 thru 30 of 40");
    }

    #[test]
    fn summary_for_partial_last_page() {
        let pager = Pager::new(40, 15, 3);
        assert_eq!(pager.summary(), "Displaying rows 31 thru 40 of 40");
    }

    #[test]
    fn summary_for_empty_grid() {
        let pager = Pager::new(0, 15, 1);
        assert_eq!(pager.summary(), "Displaying rows 0 thru 0 of 0");
        assert!(!pager.has_multiple_pages());
        assert!(pager.pages(&PageWindow::default()).is_empty());
    }

    #[test]
    fn small_grid_lists_every_page() {
        let pager = Pager::new(45, 15, 2);
        assert_eq!(
            pager.pages(&PageWindow::default()),
            vec![Page(1), Page(2), Page(3)]
        );
    }

    #[test]
    fn window_around_current_page() {
        // 20 pages, current 10: edges 1 and 20, one before, two after.
        let pager = Pager::new(200, 10, 10);
        assert_eq!(
            pager.pages(&PageWindow::default()),
            vec![Page(1), Gap, Page(9), Page(10), Page(11), Page(12), Gap, Page(20)]
        );
    }

    #[test]
    fn window_at_first_page() {
        let pager = Pager::new(200, 10, 1);
        assert_eq!(
            pager.pages(&PageWindow::default()),
            vec![Page(1), Page(2), Page(3), Gap, Page(20)]
        );
    }

    #[test]
    fn window_at_last_page() {
        let pager = Pager::new(200, 10, 20);
        assert_eq!(
            pager.pages(&PageWindow::default()),
            vec![Page(1), Gap, Page(19), Page(20)]
        );
    }

    #[test]
    fn wider_edges_are_respected() {
        let window = PageWindow {
            left_edge: 2,
            right_edge: 3,
            left_current: 0,
            right_current: 0,
        };
        let pager = Pager::new(100, 10, 5);
        assert_eq!(
            pager.pages(&window),
            vec![Page(1), Page(2), Gap, Page(5), Gap, Page(8), Page(9), Page(10)]
        );
    }
}
