use super::model::{FilteredView, SelectedColumn, SelectedTable, SeriesKind};

/// Narrow the view to its year column plus one relabelled column per
/// enabled series.
///
/// Columns appear in the order given; a kind repeated in `enabled_series`
/// only produces one column. Rows stay one per record. With no series
/// enabled the result holds just the years.
pub fn select_series(view: &FilteredView, enabled_series: &[SeriesKind]) -> SelectedTable {
    let years = view.records.iter().map(|r| r.year).collect();

    let mut columns: Vec<SelectedColumn> = Vec::with_capacity(enabled_series.len());
    for &kind in enabled_series {
        if columns.iter().any(|c| c.kind == kind) {
            continue;
        }
        let source = kind.source();
        columns.push(SelectedColumn {
            kind,
            values: view.records.iter().map(|r| r.value(source)).collect(),
        });
    }

    SelectedTable { years, columns }
}
