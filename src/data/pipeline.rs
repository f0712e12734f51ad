use super::aggregate::aggregate;
use super::filter::filter;
use super::model::{AggregatedSeries, Dataset, FilterCriteria, FilteredView, Metric, SelectedTable};

/// Everything the dashboard charts need for one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    /// Filtered rows; feeds the death-count / urban-wastewater chart.
    pub view: FilteredView,
    /// Year plus the enabled wastewater series; feeds the trends chart.
    pub trends: SelectedTable,
    pub agricultural: AggregatedSeries,
    pub total_inland: AggregatedSeries,
}

impl DashboardData {
    /// Run filter → {select_series, aggregate ×2} for `criteria`.
    pub fn compute(dataset: &Dataset, criteria: &FilterCriteria) -> Self {
        let view = filter(dataset, criteria);
        let trends = super::series::select_series(&view, criteria.enabled_series());
        let agricultural = aggregate(&view, Metric::AgriculturalDischarge);
        let total_inland = aggregate(&view, Metric::TotalInlandDischarge);
        DashboardData {
            view,
            trends,
            agricultural,
            total_inland,
        }
    }

    /// `true` when the selection matched no records.
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }
}
