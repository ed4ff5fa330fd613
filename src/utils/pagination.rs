/// Number of numbered page buttons shown at once
pub const MAX_VISIBLE_PAGES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Previous { target: u32, enabled: bool },
    Page { number: u32, current: bool },
    Ellipsis,
    Next { target: u32, enabled: bool },
}

/// Build the pager for `current` out of `total` pages.
///
/// Returns an empty list when there is a single page or none. The window
/// holds up to five pages centred on the current one; the first and last
/// pages are always reachable, with an ellipsis when the window skips pages.
pub fn page_items(current: u32, total: u32) -> Vec<PageItem> {
    if total <= 1 {
        return Vec::new();
    }
    let current = current.clamp(1, total);

    let mut start = current.saturating_sub(2).max(1);
    let end = (start + MAX_VISIBLE_PAGES - 1).min(total);
    if end - start + 1 < MAX_VISIBLE_PAGES {
        start = end.saturating_sub(MAX_VISIBLE_PAGES - 1).max(1);
    }

    let mut items = vec![PageItem::Previous {
        target: current.saturating_sub(1).max(1),
        enabled: current > 1,
    }];

    if start > 1 {
        items.push(PageItem::Page { number: 1, current: false });
        if start > 2 {
            items.push(PageItem::Ellipsis);
        }
    }

    for number in start..=end {
        items.push(PageItem::Page {
            number,
            current: number == current,
        });
    }

    if end < total {
        if end < total - 1 {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page { number: total, current: false });
    }

    items.push(PageItem::Next {
        target: (current + 1).min(total),
        enabled: current < total,
    });
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(items: &[PageItem]) -> Vec<Option<u32>> {
        items
            .iter()
            .filter_map(|item| match item {
                PageItem::Page { number, .. } => Some(Some(*number)),
                PageItem::Ellipsis => Some(None),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_hidden_for_single_page() {
        assert!(page_items(1, 1).is_empty());
        assert!(page_items(1, 0).is_empty());
    }

    #[test]
    fn test_small_total_shows_all_pages() {
        let items = page_items(2, 3);
        assert_eq!(numbers(&items), vec![Some(1), Some(2), Some(3)]);
        assert_eq!(items[0], PageItem::Previous { target: 1, enabled: true });
        assert_eq!(items[items.len() - 1], PageItem::Next { target: 3, enabled: true });
    }

    #[test]
    fn test_window_in_the_middle() {
        let items = page_items(10, 20);
        assert_eq!(
            numbers(&items),
            vec![Some(1), None, Some(8), Some(9), Some(10), Some(11), Some(12), None, Some(20)]
        );
        assert!(items.contains(&PageItem::Page { number: 10, current: true }));
    }

    #[test]
    fn test_window_at_edges() {
        let first = page_items(1, 20);
        assert_eq!(first[0], PageItem::Previous { target: 1, enabled: false });
        assert_eq!(numbers(&first), vec![Some(1), Some(2), Some(3), Some(4), Some(5), None, Some(20)]);

        let last = page_items(20, 20);
        assert_eq!(numbers(&last), vec![Some(1), None, Some(16), Some(17), Some(18), Some(19), Some(20)]);
        assert_eq!(last[last.len() - 1], PageItem::Next { target: 20, enabled: false });
    }

    #[test]
    fn test_no_ellipsis_for_adjacent_edge() {
        // window 2..=6 touches page 1 directly
        assert_eq!(
            numbers(&page_items(4, 7)),
            vec![Some(1), Some(2), Some(3), Some(4), Some(5), Some(6), Some(7)]
        );
    }
}
