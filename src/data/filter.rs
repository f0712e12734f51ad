use log::debug;

use super::model::{Dataset, FilterCriteria, FilteredView, YearRange};

// ---------------------------------------------------------------------------
// Entity year bounds
// ---------------------------------------------------------------------------

/// Earliest and latest year recorded for `entity`, or `None` if the entity
/// has no records. Drives the range the year selector may offer.
pub fn year_bounds(dataset: &Dataset, entity: &str) -> Option<YearRange> {
    dataset
        .records()
        .iter()
        .filter(|r| r.entity == entity)
        .fold(None, |acc: Option<YearRange>, r| match acc {
            None => Some(YearRange::single(r.year)),
            Some(mut range) => {
                range.extend(r.year);
                Some(range)
            }
        })
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Return the records of `criteria.entity()` whose year lies within the
/// criteria's bounds.
///
/// * Unknown entity → empty view.
/// * Bounds outside the entity's own range are clamped to it; a range that
///   misses the entity's years entirely yields an empty view.
/// * Record order is preserved.
pub fn filter(dataset: &Dataset, criteria: &FilterCriteria) -> FilteredView {
    let entity = criteria.entity();

    let Some(bounds) = year_bounds(dataset, entity) else {
        debug!("No records for entity '{entity}'");
        return FilteredView::empty(entity);
    };

    let Some(range) = bounds.intersect(&criteria.year_range()) else {
        debug!(
            "Requested years {} fall outside {entity}'s range {bounds}",
            criteria.year_range()
        );
        return FilteredView::empty(entity);
    };

    let records: Vec<_> = dataset
        .records()
        .iter()
        .filter(|r| r.entity == entity && range.contains(r.year))
        .cloned()
        .collect();

    debug!("Filtered {entity} {range}: {} records", records.len());

    FilteredView {
        entity: entity.to_string(),
        range: Some(range),
        records,
    }
}
