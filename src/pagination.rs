//! Pagination Calculator
//!
//! Turns (current page, total pages, window size) into the sequence of page links a
//! widget renders, collapsing long runs into ellipsis markers.

use crate::query::PageSize;
use serde::{Deserialize, Serialize};

/// Pagination defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Page size substituted for missing or invalid facet values
    pub default_page_size: u32,
    /// Numbered links shown around the current page
    pub default_window: u32,
    /// Upper bound applied to facet page sizes
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            default_window: 5,
            max_page_size: 100,
        }
    }
}

impl PaginationConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.default_page_size == 0 {
            return Err("pagination.default_page_size must be positive".to_string());
        }
        if self.default_window == 0 {
            return Err("pagination.default_window must be positive".to_string());
        }
        if self.max_page_size < self.default_page_size {
            return Err(format!(
                "pagination.max_page_size ({}) is below default_page_size ({})",
                self.max_page_size, self.default_page_size
            ));
        }
        Ok(())
    }
}

/// One renderable element of the page-number row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PageToken {
    Number(u32),
    Current(u32),
    Ellipsis,
}

impl PageToken {
    pub fn page(&self) -> Option<u32> {
        match self {
            PageToken::Number(n) | PageToken::Current(n) => Some(*n),
            PageToken::Ellipsis => None,
        }
    }
}

/// Window size used when a caller passes zero
pub const DEFAULT_WINDOW: u32 = 5;

/// Compute the page-number row for `current` of `total_pages`.
///
/// The first and last page are always reachable; ellipses stand in for skipped runs.
/// `current` is clamped into range and a zero window falls back to [`DEFAULT_WINDOW`].
pub fn compute_page_window(current: u32, total_pages: u32, window_size: u32) -> Vec<PageToken> {
    if total_pages == 0 {
        return Vec::new();
    }
    let window = if window_size == 0 {
        DEFAULT_WINDOW
    } else {
        window_size
    };
    let current = current.clamp(1, total_pages);

    let mut start = current.saturating_sub(window / 2).max(1);
    let end = total_pages.min(start.saturating_add(window - 1));
    if end - start + 1 < window {
        start = (end + 1).saturating_sub(window).max(1);
    }

    let mut tokens = Vec::with_capacity(window as usize + 4);
    if start > 1 {
        tokens.push(PageToken::Number(1));
        if start > 2 {
            tokens.push(PageToken::Ellipsis);
        }
    }
    for page in start..=end {
        tokens.push(if page == current {
            PageToken::Current(page)
        } else {
            PageToken::Number(page)
        });
    }
    if end < total_pages {
        if end < total_pages - 1 {
            tokens.push(PageToken::Ellipsis);
        }
        tokens.push(PageToken::Number(total_pages));
    }
    tokens
}

/// Number of pages needed for `total_matched` items.
///
/// Items skipped by `offset` are not paginated over. An unbounded page size yields a
/// single page whenever anything is left to show.
pub fn total_pages(total_matched: u64, offset: u32, page_size: PageSize) -> u32 {
    let remaining = total_matched.saturating_sub(u64::from(offset));
    if remaining == 0 {
        return 0;
    }
    match page_size {
        PageSize::Unbounded => 1,
        PageSize::Limited(0) => 1,
        PageSize::Limited(size) => {
            let pages = remaining.div_ceil(u64::from(size));
            u32::try_from(pages).unwrap_or(u32::MAX)
        }
    }
}

/// Page row plus neighbours for previous/next links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub current: u32,
    pub total: u32,
    pub tokens: Vec<PageToken>,
    pub prev: Option<u32>,
    pub next: Option<u32>,
}

impl PageWindow {
    /// A `current` past the last page keeps the row for navigating back but marks
    /// no page as current.
    pub fn new(current: u32, total: u32, window_size: u32) -> Self {
        let mut tokens = compute_page_window(current, total, window_size);
        if current > total {
            for token in &mut tokens {
                if let PageToken::Current(page) = *token {
                    *token = PageToken::Number(page);
                }
            }
        }
        let prev = (current > 1 && total > 0).then(|| (current - 1).min(total));
        let next = (current < total).then(|| current + 1);
        Self {
            current,
            total,
            tokens,
            prev,
            next,
        }
    }

    /// Nothing to paginate between.
    pub fn is_single_page(&self) -> bool {
        self.total <= 1
    }
}
