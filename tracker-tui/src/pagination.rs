//! Page state for the duration chart.
//!
//! The card list always shows the whole collection; only the chart follows
//! the current page. Pages are 1-indexed and a collection with zero pages
//! simply hides the pagination controls.

use std::ops::Range;

/// Projects per chart page
pub const DEFAULT_PAGE_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    page_size: usize,
    current_page: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PageState {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    #[cfg(test)]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// `ceil(count / page_size)`
    pub fn total_pages(&self, count: usize) -> usize {
        count.div_ceil(self.page_size)
    }

    /// Index range of the current page within a collection of `count` items
    pub fn page_range(&self, count: usize) -> Range<usize> {
        let start = (self.current_page - 1)
            .saturating_mul(self.page_size)
            .min(count);
        let end = (start + self.page_size).min(count);
        start..end
    }

    pub fn page_slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.page_range(items.len())]
    }

    /// Move to `requested`. Out-of-range requests are ignored and return
    /// `false`.
    pub fn change_page(&mut self, requested: usize, count: usize) -> bool {
        if requested < 1 || requested > self.total_pages(count) {
            return false;
        }
        self.current_page = requested;
        true
    }

    /// Keep the current page valid after items were removed
    pub fn clamp_after_delete(&mut self, count: usize) {
        let total = self.total_pages(count);
        if self.current_page > total {
            self.current_page = total.max(1);
        }
    }

    /// Show the page holding the newest item
    pub fn jump_to_last(&mut self, count: usize) {
        self.current_page = self.total_pages(count).max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        let state = PageState::new(3);
        assert_eq!(state.total_pages(0), 0);
        assert_eq!(state.total_pages(1), 1);
        assert_eq!(state.total_pages(3), 1);
        assert_eq!(state.total_pages(4), 2);
    }

    #[test]
    fn test_total_pages_is_monotonic() {
        let state = PageState::new(3);
        let mut last = 0;
        for count in 0..50 {
            let pages = state.total_pages(count);
            assert!(pages >= last);
            last = pages;
        }
    }

    #[test]
    fn test_four_items_split_over_two_pages() {
        let items = [1, 2, 3, 4];
        let mut state = PageState::new(3);
        assert_eq!(state.page_slice(&items), &[1, 2, 3]);
        assert!(state.change_page(2, items.len()));
        assert_eq!(state.page_slice(&items), &[4]);
    }

    #[test]
    fn test_out_of_range_page_is_ignored() {
        let mut state = PageState::new(3);
        assert!(!state.change_page(0, 4));
        assert!(!state.change_page(3, 4));
        assert_eq!(state.current_page(), 1);
        assert!(state.change_page(2, 4));
        assert!(!state.change_page(3, 4));
        assert_eq!(state.current_page(), 2);
    }

    #[test]
    fn test_clamp_after_deleting_last_page_item() {
        let mut state = PageState::new(3);
        state.change_page(2, 4);
        state.clamp_after_delete(3);
        assert_eq!(state.current_page(), 1);

        // Nothing left: page stays at 1
        state.clamp_after_delete(0);
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn test_jump_to_last() {
        let mut state = PageState::new(3);
        state.jump_to_last(7);
        assert_eq!(state.current_page(), 3);
        state.jump_to_last(0);
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn test_empty_slice_is_safe() {
        let items: [u8; 0] = [];
        assert!(PageState::default().page_slice(&items).is_empty());
        assert_eq!(PageState::new(0).page_size(), 1);
    }
}
