use std::collections::BTreeMap;

use log::debug;

use super::model::{AggregatedSeries, FilteredView, Metric};

/// Sum `metric` per year across the view.
///
/// Every distinct year in the view gets exactly one entry, ascending. Rows
/// sharing a year are added together; blank values contribute nothing, so a
/// year whose values are all blank totals `0.0`.
pub fn aggregate(view: &FilteredView, metric: Metric) -> AggregatedSeries {
    let mut totals: BTreeMap<i32, f64> = BTreeMap::new();
    for record in &view.records {
        let total = totals.entry(record.year).or_insert(0.0);
        if let Some(v) = record.value(metric) {
            *total += v;
        }
    }

    debug!(
        "Aggregated '{}' for {} into {} years",
        metric.column_name(),
        view.entity,
        totals.len()
    );

    AggregatedSeries {
        metric,
        points: totals.into_iter().collect(),
    }
}
