//! End-to-end resolution of content widgets against the in-memory executor

use crate::integration::test_utils::{blog_executor, fixed_now};
use facetry::context::{ArchiveScope, QueryStringFacets, RequestContext};
use facetry::error::ExecutorError;
use facetry::executor::{QueryExecutor, QueryResult};
use facetry::facet::{FacetConfig, OrderBy, SourceKind};
use facetry::pagination::PageToken;
use facetry::query::{QuerySpec, SortDirection};
use facetry::resolver::ContentResolver;
use facetry::types::{AuthorId, ItemId};

fn ids(raw: &[u64]) -> Vec<ItemId> {
    raw.iter().copied().map(ItemId).collect()
}

fn ctx() -> RequestContext {
    RequestContext::new(fixed_now())
}

#[test]
fn test_paginated_listing_second_page() {
    let resolver = ContentResolver::new(blog_executor());
    let facets = FacetConfig::builder()
        .item_type("post")
        .page_size(5)
        .paginated(true)
        .build();

    let resolved = resolver.resolve(&facets, &ctx().with_page(2));

    assert_eq!(resolved.ids(), ids(&[7, 6, 5, 4, 3]));
    assert_eq!(resolved.total_matched, 12);
    assert_eq!(resolved.total_pages, 3);
    assert_eq!(resolved.items[0].position, 5);

    let pages = resolved.pages.expect("paginated widget has page links");
    assert_eq!(
        pages.tokens,
        vec![
            PageToken::Number(1),
            PageToken::Current(2),
            PageToken::Number(3)
        ]
    );
    assert_eq!(pages.prev, Some(1));
    assert_eq!(pages.next, Some(3));
}

#[test]
fn test_page_from_query_string() {
    let resolver = ContentResolver::new(blog_executor());
    let facets = FacetConfig::builder().page_size(5).paginated(true).build();
    let ctx = ctx().with_query(QueryStringFacets::parse("?paged=3"));

    let resolved = resolver.resolve(&facets, &ctx);

    assert_eq!(resolved.current_page, 3);
    assert_eq!(resolved.ids(), ids(&[2, 1]));
}

#[test]
fn test_taxonomy_filter_excluding_current_item() {
    let resolver = ContentResolver::new(blog_executor());
    let facets = FacetConfig::builder()
        .taxonomy("category", [5u64])
        .exclude_current(true)
        .build();

    let resolved = resolver.resolve(&facets, &ctx().with_current_item(4u64));

    assert_eq!(resolved.ids(), ids(&[12, 10, 8, 6, 2]));
    assert_eq!(resolved.total_pages, 1);
    assert!(resolved.pages.is_none());
}

#[test]
fn test_manual_selection_keeps_hand_picked_order() {
    let resolver = ContentResolver::new(blog_executor());
    let facets = FacetConfig::builder()
        .manual([3u64, 9, 1])
        .order_by(OrderBy::ManualOrder)
        .build();

    let resolved = resolver.resolve(&facets, &ctx());

    assert_eq!(resolved.ids(), ids(&[3, 9, 1]));
}

#[test]
fn test_empty_manual_selection_shows_nothing() {
    let resolver = ContentResolver::new(blog_executor());
    let facets = FacetConfig::builder()
        .manual(Vec::<u64>::new())
        .paginated(true)
        .build();

    let resolved = resolver.resolve(&facets, &ctx());

    assert!(resolved.is_empty());
    assert_eq!(resolved.total_matched, 0);
    assert_eq!(resolved.total_pages, 0);
    assert!(resolved.pages.is_none());
}

#[test]
fn test_archive_context_ignores_configured_exclusions() {
    let resolver = ContentResolver::new(blog_executor());
    let facets = FacetConfig::builder()
        .source(SourceKind::FromArchiveContext)
        .exclude([8u64])
        .offset(3)
        .exclude_current(true)
        .build();
    let ctx = ctx()
        .with_archive(ArchiveScope::Author(AuthorId(2)))
        .with_current_item(9u64);

    let resolved = resolver.resolve(&facets, &ctx);

    // configured exclusions and offset do not apply; the current item still does
    assert_eq!(resolved.ids(), ids(&[12, 11, 10, 8, 7]));
}

#[test]
fn test_offset_items_are_not_paginated_over() {
    let resolver = ContentResolver::new(blog_executor());
    let facets = FacetConfig::builder()
        .offset(2)
        .page_size(4)
        .paginated(true)
        .build();

    let first = resolver.resolve(&facets, &ctx());
    assert_eq!(first.ids(), ids(&[10, 9, 8, 7]));
    assert_eq!(first.total_pages, 3);

    let last = resolver.resolve(&facets, &ctx().with_page(3));
    assert_eq!(last.ids(), ids(&[2, 1]));

    let beyond = resolver.resolve(&facets, &ctx().with_page(4));
    assert!(beyond.is_empty());
    assert_eq!(beyond.total_matched, 12);
    assert_eq!(beyond.total_pages, 3);
}

#[test]
fn test_explicit_ascending_menu_order() {
    let resolver = ContentResolver::new(blog_executor());
    let facets = FacetConfig::builder()
        .order_by(OrderBy::MenuOrder)
        .direction(SortDirection::Ascending)
        .page_size(3)
        .paginated(true)
        .build();

    let resolved = resolver.resolve(&facets, &ctx());

    assert_eq!(resolved.ids(), ids(&[12, 11, 10]));
}

#[test]
fn test_random_order_is_stable_within_a_day() {
    let resolver = ContentResolver::new(blog_executor());
    let facets = FacetConfig::builder().order_by(OrderBy::Random).build();

    let first = resolver.resolve(&facets, &ctx());
    let second = resolver.resolve(&facets, &ctx());
    assert_eq!(first.ids(), second.ids());

    let mut sorted = first.ids();
    sorted.sort();
    assert_eq!(sorted, (1..=12).map(ItemId).collect::<Vec<_>>());
}

struct Unavailable;

impl QueryExecutor for Unavailable {
    fn execute(&self, _spec: &QuerySpec) -> Result<QueryResult, ExecutorError> {
        Err(ExecutorError::Backend("connection refused".to_string()))
    }
}

#[test]
fn test_backend_failure_renders_nothing() {
    let resolver = ContentResolver::new(Unavailable);
    let facets = FacetConfig::builder().paginated(true).build();

    let resolved = resolver.resolve(&facets, &ctx());

    assert!(resolved.is_empty());
    assert_eq!(resolved.total_pages, 0);
}

#[test]
fn test_borrowed_executor_is_accepted() {
    let executor = blog_executor();
    let resolver = ContentResolver::new(&executor);
    let facets = FacetConfig::builder().page_size(2).paginated(true).build();

    assert_eq!(resolver.resolve(&facets, &ctx()).ids(), ids(&[12, 11]));
}
