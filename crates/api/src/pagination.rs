//! Pagination over id lists.

use crate::context::Window;

impl Window {
    /// Returns the slice of `ids` selected by this window.
    ///
    /// Only top-level documents are paginated, and a zero limit selects
    /// everything. Out-of-range offsets yield an empty slice.
    pub fn slice<'a, T>(&self, ids: &'a [T], top_level: bool) -> &'a [T] {
        if self.is_unlimited() || !top_level {
            return ids;
        }
        let start = self.offset.min(ids.len());
        let end = start.saturating_add(self.limit).min(ids.len());
        &ids[start..end]
    }
}

/// A window of ids together with the catalog-wide total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// Count of the whole catalog for the type, not of `items`.
    pub total_count: u64,
}

/// Applies `window` to `ids`.
pub fn paginate<T>(ids: &[T], window: Window, top_level: bool, total_count: u64) -> Page<'_, T> {
    Page {
        items: window.slice(ids, top_level),
        total_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_slice_window() {
        let ids = [1, 2, 3, 4, 5];
        assert_eq!(Window::new(1, 2).slice(&ids, true), &[2, 3]);
        assert_eq!(Window::new(3, 10).slice(&ids, true), &[4, 5]);
        assert_eq!(Window::new(9, 2).slice(&ids, true), &[] as &[i32]);
    }

    #[test]
    fn test_unlimited_and_fragments_are_untouched() {
        let ids = [1, 2, 3];
        assert_eq!(Window::new(2, 0).slice(&ids, true), &ids);
        assert_eq!(Window::new(1, 1).slice(&ids, false), &ids);
    }

    #[test]
    fn test_paginate_keeps_catalog_total() {
        let ids = [101, 102, 103];
        let page = paginate(&ids, Window::new(1, 1), true, 250);
        assert_eq!(page.items, &[102]);
        assert_eq!(page.total_count, 250);
    }

    proptest! {
        #[test]
        fn window_is_a_contiguous_subslice(
            ids in proptest::collection::vec(any::<u64>(), 0..40),
            offset in 0usize..50,
            limit in 1usize..50,
        ) {
            let window = Window::new(offset, limit);
            let page = window.slice(&ids, true);
            let start = offset.min(ids.len());
            let expected = &ids[start..(start + limit).min(ids.len())];
            prop_assert_eq!(page, expected);
            prop_assert!(page.len() <= limit);
        }
    }
}
