//! Property-based tests for determinism guarantees

use chrono::{TimeZone, Utc};
use facetry::context::RequestContext;
use facetry::facet::{FacetConfig, OrderBy, SourceKind};
use facetry::query::{compile, SortDirection, TimeWindow};
use facetry::types::ItemId;
use proptest::prelude::*;

const ORDERS: [OrderBy; 12] = [
    OrderBy::Date,
    OrderBy::Modified,
    OrderBy::Title,
    OrderBy::MenuOrder,
    OrderBy::CommentCount,
    OrderBy::Id,
    OrderBy::Random,
    OrderBy::ManualOrder,
    OrderBy::Price,
    OrderBy::Popularity,
    OrderBy::Rating,
    OrderBy::EventDate,
];

fn facet_strategy() -> impl Strategy<Value = FacetConfig> {
    (
        0usize..3,
        0usize..ORDERS.len(),
        prop::option::of(any::<bool>()),
        prop::collection::vec(0u64..50, 0..6),
        prop::collection::vec(1u64..50, 0..4),
        0u32..20,
        0u32..30,
        any::<bool>(),
        0usize..3,
    )
        .prop_map(
            |(source, order, ascending, manual, exclude, offset, size, paginated, window)| {
                let mut builder = FacetConfig::builder()
                    .order_by(ORDERS[order])
                    .exclude(exclude)
                    .offset(offset)
                    .page_size(size)
                    .paginated(paginated)
                    .exclude_current(true)
                    .time_window([TimeWindow::All, TimeWindow::Upcoming, TimeWindow::Past][window]);
                builder = match source {
                    0 => builder.manual(manual),
                    1 => builder.source(SourceKind::FromRepository),
                    _ => builder.source(SourceKind::FromArchiveContext),
                };
                if let Some(ascending) = ascending {
                    builder = builder.direction(if ascending {
                        SortDirection::Ascending
                    } else {
                        SortDirection::Descending
                    });
                }
                builder.build()
            },
        )
}

fn context_strategy() -> impl Strategy<Value = RequestContext> {
    (0i64..2_000_000_000, prop::option::of(1u64..50), 1u32..20).prop_map(
        |(secs, current, page)| {
            let now = Utc.timestamp_opt(secs, 0).unwrap();
            let mut ctx = RequestContext::new(now).with_page(page);
            if let Some(current) = current {
                ctx = ctx.with_current_item(current);
            }
            ctx
        },
    )
}

/// Same facets and context always compile to the same spec
#[test]
fn test_compile_determinism_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(facet_strategy(), context_strategy()), |(facets, ctx)| {
            let first = compile(&facets, &ctx);
            let second = compile(&facets.clone(), &ctx.clone());

            assert_eq!(first, second);
            assert_eq!(first.to_canonical_json(), second.to_canonical_json());

            Ok(())
        })
        .unwrap();
}

/// A manual source never widens to "everything"
#[test]
fn test_manual_source_restricts_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(prop::collection::vec(0u64..50, 0..8), context_strategy()),
            |(manual, ctx)| {
                let facets = FacetConfig::builder().manual(manual.clone()).build();
                let spec = compile(&facets, &ctx);

                let include = spec.include_ids.clone().expect("manual source sets include ids");
                assert!(!include.is_empty());
                if manual.iter().all(|id| *id == 0) {
                    assert!(spec.matches_nothing());
                } else {
                    assert!(include.iter().all(|id| manual.contains(&id.0)));
                    assert!(!include.contains(&ItemId::NONE));
                }

                Ok(())
            },
        )
        .unwrap();
}

/// Page and offset of the compiled spec are within sane bounds
#[test]
fn test_compiled_page_bounds_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(facet_strategy(), context_strategy()), |(facets, ctx)| {
            let spec = compile(&facets, &ctx);

            assert!(spec.page >= 1);
            if !facets.pagination_enabled {
                assert_eq!(spec.page, 1);
            }
            if facets.source_kind == SourceKind::FromArchiveContext {
                assert_eq!(spec.offset, 0);
            }

            Ok(())
        })
        .unwrap();
}
