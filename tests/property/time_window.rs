//! Property-based tests for the upcoming/past partition

use chrono::{Duration, TimeZone, Utc};
use facetry::context::RequestContext;
use facetry::executor::{InMemoryExecutor, QueryExecutor, StoredItem};
use facetry::facet::{FacetConfig, OrderBy};
use facetry::query::{compile, TimeWindow};
use proptest::prelude::*;

fn matched(executor: &InMemoryExecutor, window: TimeWindow, ctx: &RequestContext) -> u64 {
    let facets = FacetConfig::builder()
        .item_type("event")
        .order_by(OrderBy::EventDate)
        .time_window(window)
        .build();
    executor
        .execute(&compile(&facets, ctx))
        .map(|result| result.total_matched)
        .unwrap_or(0)
}

proptest! {
    /// Every dated event lands in exactly one of Upcoming and Past, the boundary
    /// instant included.
    #[test]
    fn prop_windows_partition(now_secs in 0i64..2_000_000_000, delta in -86_400i64..86_400) {
        let now = Utc.timestamp_opt(now_secs, 0).unwrap();
        let end = now + Duration::seconds(delta);
        let executor = InMemoryExecutor::new(vec![
            StoredItem::new(1u64, "event", "Event", now)
                .with_meta("_event_start_date", (end - Duration::hours(2)).to_rfc3339())
                .with_meta("_event_end_date", end.to_rfc3339()),
        ]);
        let ctx = RequestContext::new(now);

        let upcoming = matched(&executor, TimeWindow::Upcoming, &ctx);
        let past = matched(&executor, TimeWindow::Past, &ctx);
        let all = matched(&executor, TimeWindow::All, &ctx);

        prop_assert_eq!(upcoming + past, 1);
        prop_assert_eq!(all, 1);
        prop_assert_eq!(upcoming == 1, delta >= 0);
    }
}
