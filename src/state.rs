use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, warn};

use wastewater_dashboard::data::filter::year_bounds;
use wastewater_dashboard::data::model::{Dataset, FilterCriteria, SeriesKind, YearRange};
use wastewater_dashboard::data::pipeline::DashboardData;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// The only mutable input is `criteria`; everything in `charts` is
/// recomputed from it after each change.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset, shared read-only.
    pub dataset: Option<Arc<Dataset>>,

    /// Where the dataset came from.
    pub source: Option<PathBuf>,

    /// Current selection; `None` while the dataset is empty.
    pub criteria: Option<FilterCriteria>,

    /// Year bounds of the selected entity.
    pub entity_years: Option<YearRange>,

    /// Chart inputs for the current selection (cached).
    pub charts: Option<DashboardData>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded dataset and select an entity: `preferred` if the
    /// dataset has it, otherwise the first one.
    pub fn set_dataset(&mut self, dataset: Dataset, source: Option<PathBuf>, preferred: Option<&str>) {
        let dataset = Arc::new(dataset);

        let entity = match preferred {
            Some(name) if dataset.contains_entity(name) => Some(name.to_string()),
            Some(name) => {
                warn!("Entity '{name}' not in dataset, falling back to the first entity");
                dataset.entities().first().cloned()
            }
            None => dataset.entities().first().cloned(),
        };

        self.criteria = entity.and_then(|e| FilterCriteria::for_entity(&dataset, &e).ok());
        self.status_message = if dataset.is_empty() {
            Some("Dataset has no records.".to_string())
        } else {
            None
        };
        self.dataset = Some(dataset);
        self.source = source;
        self.refresh();
    }

    /// Switch entity. The year range resets to the new entity's bounds.
    pub fn select_entity(&mut self, entity: &str) {
        let (Some(dataset), Some(criteria)) = (self.dataset.clone(), self.criteria.clone()) else {
            return;
        };
        match criteria.with_entity(&dataset, entity) {
            Ok(next) => self.criteria = Some(next),
            Err(e) => {
                warn!("{e}");
                self.status_message = Some(e.to_string());
            }
        }
        self.refresh();
    }

    /// Move the lower bound; the upper bound follows if it would be passed.
    pub fn set_year_min(&mut self, year: i32) {
        if let Some(max) = self.criteria.as_ref().map(|c| c.year_max().max(year)) {
            self.set_year_range(year, max);
        }
    }

    /// Move the upper bound; the lower bound follows if it would be passed.
    pub fn set_year_max(&mut self, year: i32) {
        if let Some(min) = self.criteria.as_ref().map(|c| c.year_min().min(year)) {
            self.set_year_range(min, year);
        }
    }

    fn set_year_range(&mut self, year_min: i32, year_max: i32) {
        let Some(criteria) = self.criteria.clone() else {
            return;
        };
        match criteria.with_year_range(year_min, year_max) {
            Ok(next) => self.criteria = Some(next),
            Err(e) => warn!("{e}"),
        }
        self.refresh();
    }

    /// Toggle one wastewater series in the trends chart.
    pub fn set_series(&mut self, kind: SeriesKind, enabled: bool) {
        if let Some(c) = &mut self.criteria {
            c.set_series(kind, enabled);
        }
        self.refresh();
    }

    /// Recompute bounds and chart data after any selection change.
    pub fn refresh(&mut self) {
        let (Some(dataset), Some(criteria)) = (&self.dataset, &self.criteria) else {
            self.entity_years = None;
            self.charts = None;
            return;
        };
        self.entity_years = year_bounds(dataset, criteria.entity());
        let charts = DashboardData::compute(dataset, criteria);
        debug!(
            "Refreshed {} {}–{}: {} records",
            criteria.entity(),
            criteria.year_min(),
            criteria.year_max(),
            charts.view.len()
        );
        self.charts = Some(charts);
    }
}
