//! Property-based tests for the page-number row and page arithmetic

use facetry::pagination::{compute_page_window, total_pages, PageToken};
use facetry::query::PageSize;
use proptest::prelude::*;

fn pages(tokens: &[PageToken]) -> Vec<u32> {
    tokens.iter().filter_map(PageToken::page).collect()
}

proptest! {
    #[test]
    fn prop_pages_strictly_increase(total in 1u32..300, current_seed in 0u32..300, window in 1u32..16) {
        let current = current_seed % total + 1;
        let tokens = compute_page_window(current, total, window);
        let numbers = pages(&tokens);
        prop_assert!(numbers.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn prop_edges_and_current_always_present(total in 1u32..300, current_seed in 0u32..300, window in 1u32..16) {
        let current = current_seed % total + 1;
        let tokens = compute_page_window(current, total, window);
        let numbers = pages(&tokens);

        prop_assert_eq!(numbers.first().copied(), Some(1));
        prop_assert_eq!(numbers.last().copied(), Some(total));

        let currents: Vec<u32> = tokens
            .iter()
            .filter_map(|t| match t {
                PageToken::Current(n) => Some(*n),
                _ => None,
            })
            .collect();
        prop_assert_eq!(currents, vec![current]);
    }

    #[test]
    fn prop_ellipsis_only_between_gaps(total in 1u32..300, current_seed in 0u32..300, window in 1u32..16) {
        let current = current_seed % total + 1;
        let tokens = compute_page_window(current, total, window);

        prop_assert!(!matches!(tokens.first(), Some(PageToken::Ellipsis)));
        prop_assert!(!matches!(tokens.last(), Some(PageToken::Ellipsis)));
        for (i, token) in tokens.iter().enumerate() {
            if *token == PageToken::Ellipsis {
                let before = tokens[i - 1].page().unwrap();
                let after = tokens[i + 1].page().unwrap();
                prop_assert!(after > before + 1);
            } else if i > 0 {
                if let (Some(prev), Some(page)) = (tokens[i - 1].page(), token.page()) {
                    prop_assert_eq!(page, prev + 1);
                }
            }
        }
    }

    #[test]
    fn prop_window_never_exceeds_size(total in 1u32..300, current_seed in 0u32..300, window in 1u32..16) {
        let current = current_seed % total + 1;
        let numbers = pages(&compute_page_window(current, total, window));
        // the window plus at most the two edge pages
        prop_assert!(numbers.len() as u32 <= window + 2);
        prop_assert!(numbers.len() as u32 >= window.min(total));
    }

    #[test]
    fn prop_total_pages_cover_remaining_items(total in 0u64..10_000, offset in 0u32..50, size in 1u32..100) {
        let pages = total_pages(total, offset, PageSize::Limited(size));
        let remaining = total.saturating_sub(u64::from(offset));
        prop_assert!(u64::from(pages) * u64::from(size) >= remaining);
        if pages > 0 {
            prop_assert!(u64::from(pages - 1) * u64::from(size) < remaining);
        } else {
            prop_assert_eq!(remaining, 0);
        }
    }
}
