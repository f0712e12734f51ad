use std::collections::BTreeSet;
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CriteriaError;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const ENTITY_COLUMN: &str = "Entity";
pub const YEAR_COLUMN: &str = "Year";

// ---------------------------------------------------------------------------
// Metric – one numeric column of the source table
// ---------------------------------------------------------------------------

/// The numeric columns every dataset must carry.
///
/// Volumes are in millions of cubic metres; the death count is a plain count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    PrematureDeathCount,
    AgriculturalDischarge,
    IndustrialUntreated,
    UrbanUntreated,
    TotalInlandDischarge,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::PrematureDeathCount,
        Metric::AgriculturalDischarge,
        Metric::IndustrialUntreated,
        Metric::UrbanUntreated,
        Metric::TotalInlandDischarge,
    ];

    /// Header of the source column this metric is read from.
    pub fn column_name(self) -> &'static str {
        match self {
            Metric::PrematureDeathCount => "Premature_Death_Count",
            Metric::AgriculturalDischarge => {
                "Agricultural (incl. forestry + fisheries) wastewater, all sources, direct discharges(million m3)"
            }
            Metric::IndustrialUntreated => {
                "Industrial wastewater, all sources, discharged without treatment(million m3)"
            }
            Metric::UrbanUntreated => {
                "Urban wastewater, all sources, discharged without treatment(million m3)"
            }
            Metric::TotalInlandDischarge => "Total discharges to Inland waters(million m3)",
        }
    }

    /// Short human-readable name used on chart axes and legends.
    pub fn label(self) -> &'static str {
        match self {
            Metric::PrematureDeathCount => "Premature Death Count",
            Metric::AgriculturalDischarge => "Agricultural Wastewater (million m³)",
            Metric::IndustrialUntreated => "Industrial Wastewater (million m³)",
            Metric::UrbanUntreated => "Urban Wastewater (million m³)",
            Metric::TotalInlandDischarge => "Total Discharges to Inland Waters (million m³)",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// SeriesKind – a toggleable wastewater series
// ---------------------------------------------------------------------------

/// A wastewater series the user can switch on and off in the trends chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeriesKind {
    Agricultural,
    Industrial,
}

impl SeriesKind {
    pub const ALL: [SeriesKind; 2] = [SeriesKind::Agricultural, SeriesKind::Industrial];

    /// The metric whose column feeds this series.
    pub fn source(self) -> Metric {
        match self {
            SeriesKind::Agricultural => Metric::AgriculturalDischarge,
            SeriesKind::Industrial => Metric::IndustrialUntreated,
        }
    }

    /// Column header after relabelling for display.
    pub fn label(self) -> &'static str {
        match self {
            SeriesKind::Agricultural => "Agricultural Wastewater",
            SeriesKind::Industrial => "Industrial Wastewater",
        }
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

/// A single row: one entity, one year, and every metric (possibly blank).
///
/// Field names follow the source headers so the same struct reads CSV and
/// JSON rows and writes sample files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Entity")]
    pub entity: String,
    #[serde(rename = "Year", deserialize_with = "deserialize_year")]
    pub year: i32,
    #[serde(rename = "Premature_Death_Count")]
    pub premature_death_count: Option<f64>,
    #[serde(
        rename = "Agricultural (incl. forestry + fisheries) wastewater, all sources, direct discharges(million m3)"
    )]
    pub agricultural_discharge: Option<f64>,
    #[serde(rename = "Industrial wastewater, all sources, discharged without treatment(million m3)")]
    pub industrial_untreated: Option<f64>,
    #[serde(rename = "Urban wastewater, all sources, discharged without treatment(million m3)")]
    pub urban_untreated: Option<f64>,
    #[serde(rename = "Total discharges to Inland waters(million m3)")]
    pub total_inland_discharge: Option<f64>,
}

impl Record {
    /// A record with every metric blank.
    pub fn new(entity: impl Into<String>, year: i32) -> Self {
        Self {
            entity: entity.into(),
            year,
            premature_death_count: None,
            agricultural_discharge: None,
            industrial_untreated: None,
            urban_untreated: None,
            total_inland_discharge: None,
        }
    }

    /// Builder-style setter, mostly for loaders and tests.
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        *self.slot(metric) = Some(value);
        self
    }

    /// Value of `metric`; `None` for blank cells and NaN.
    pub fn value(&self, metric: Metric) -> Option<f64> {
        let v = match metric {
            Metric::PrematureDeathCount => self.premature_death_count,
            Metric::AgriculturalDischarge => self.agricultural_discharge,
            Metric::IndustrialUntreated => self.industrial_untreated,
            Metric::UrbanUntreated => self.urban_untreated,
            Metric::TotalInlandDischarge => self.total_inland_discharge,
        };
        v.filter(|x| !x.is_nan())
    }

    pub(crate) fn slot(&mut self, metric: Metric) -> &mut Option<f64> {
        match metric {
            Metric::PrematureDeathCount => &mut self.premature_death_count,
            Metric::AgriculturalDischarge => &mut self.agricultural_discharge,
            Metric::IndustrialUntreated => &mut self.industrial_untreated,
            Metric::UrbanUntreated => &mut self.urban_untreated,
            Metric::TotalInlandDischarge => &mut self.total_inland_discharge,
        }
    }
}

/// Year from an integral float, as pandas writes `2000.0` once the column
/// holds a NaN. Fractional and out-of-range values give `None`.
pub fn whole_year(value: f64) -> Option<i32> {
    let in_range = value >= i32::MIN as f64 && value <= i32::MAX as f64;
    (value.fract() == 0.0 && in_range).then_some(value as i32)
}

fn deserialize_year<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum YearCell {
        Whole(i64),
        Float(f64),
    }

    match YearCell::deserialize(deserializer)? {
        YearCell::Whole(y) => {
            i32::try_from(y).map_err(|_| D::Error::custom(format!("year {y} is out of range")))
        }
        YearCell::Float(y) => {
            whole_year(y).ok_or_else(|| D::Error::custom(format!("year {y} is not a whole number")))
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// All records in file order, plus the entity list for the selector.
///
/// Built once and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
    /// Distinct entities in order of first appearance.
    entities: Vec<String>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut entities = Vec::new();
        for r in &records {
            if seen.insert(r.entity.as_str()) {
                entities.push(r.entity.clone());
            }
        }
        Dataset { records, entities }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    pub fn contains_entity(&self, entity: &str) -> bool {
        self.entities.iter().any(|e| e == entity)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// YearRange
// ---------------------------------------------------------------------------

/// Inclusive year interval with `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearRange {
    min: i32,
    max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Result<Self, CriteriaError> {
        if min > max {
            return Err(CriteriaError::InvertedRange {
                year_min: min,
                year_max: max,
            });
        }
        Ok(Self { min, max })
    }

    /// A range covering exactly one year.
    pub fn single(year: i32) -> Self {
        Self {
            min: year,
            max: year,
        }
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }

    /// Grow the range so it covers `year`.
    pub fn extend(&mut self, year: i32) {
        self.min = self.min.min(year);
        self.max = self.max.max(year);
    }

    /// Overlap of two ranges, `None` when they are disjoint.
    pub fn intersect(&self, other: &YearRange) -> Option<YearRange> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        (min <= max).then_some(YearRange { min, max })
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}–{}", self.min, self.max)
    }
}

// ---------------------------------------------------------------------------
// FilterCriteria – the user's current selection
// ---------------------------------------------------------------------------

/// Entity, inclusive year bounds, and the enabled series in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    entity: String,
    years: YearRange,
    enabled_series: Vec<SeriesKind>,
}

impl FilterCriteria {
    /// Build criteria from explicit bounds. Duplicate series are dropped,
    /// keeping the first occurrence.
    pub fn new(
        entity: impl Into<String>,
        year_min: i32,
        year_max: i32,
        enabled_series: impl IntoIterator<Item = SeriesKind>,
    ) -> Result<Self, CriteriaError> {
        let mut series = Vec::new();
        for kind in enabled_series {
            if !series.contains(&kind) {
                series.push(kind);
            }
        }
        Ok(Self {
            entity: entity.into(),
            years: YearRange::new(year_min, year_max)?,
            enabled_series: series,
        })
    }

    /// Full year range of `entity` with every series enabled.
    pub fn for_entity(dataset: &Dataset, entity: &str) -> Result<Self, CriteriaError> {
        let years = super::filter::year_bounds(dataset, entity)
            .ok_or_else(|| CriteriaError::UnknownEntity(entity.to_string()))?;
        Ok(Self {
            entity: entity.to_string(),
            years,
            enabled_series: SeriesKind::ALL.to_vec(),
        })
    }

    /// Switch entity; the year range resets to the new entity's bounds and
    /// the series toggles carry over.
    pub fn with_entity(self, dataset: &Dataset, entity: &str) -> Result<Self, CriteriaError> {
        let years = super::filter::year_bounds(dataset, entity)
            .ok_or_else(|| CriteriaError::UnknownEntity(entity.to_string()))?;
        Ok(Self {
            entity: entity.to_string(),
            years,
            enabled_series: self.enabled_series,
        })
    }

    pub fn with_year_range(self, year_min: i32, year_max: i32) -> Result<Self, CriteriaError> {
        Ok(Self {
            years: YearRange::new(year_min, year_max)?,
            ..self
        })
    }

    /// Enable or disable one series. A newly enabled series goes last.
    pub fn set_series(&mut self, kind: SeriesKind, enabled: bool) {
        let present = self.enabled_series.contains(&kind);
        if enabled && !present {
            self.enabled_series.push(kind);
        } else if !enabled && present {
            self.enabled_series.retain(|k| *k != kind);
        }
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn year_range(&self) -> YearRange {
        self.years
    }

    pub fn year_min(&self) -> i32 {
        self.years.min
    }

    pub fn year_max(&self) -> i32 {
        self.years.max
    }

    pub fn enabled_series(&self) -> &[SeriesKind] {
        &self.enabled_series
    }

    pub fn is_enabled(&self, kind: SeriesKind) -> bool {
        self.enabled_series.contains(&kind)
    }
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// Records of one entity inside a year range, in dataset order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView {
    pub entity: String,
    /// Range actually applied after clamping; `None` when nothing matched
    /// the entity or the requested range missed it entirely.
    pub range: Option<YearRange>,
    pub records: Vec<Record>,
}

impl FilteredView {
    pub fn empty(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            range: None,
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One `(year, value)` pair per record, skipping blank values.
    pub fn points(&self, metric: Metric) -> Vec<(i32, f64)> {
        self.records
            .iter()
            .filter_map(|r| r.value(metric).map(|v| (r.year, v)))
            .collect()
    }
}

/// Per-year totals of one metric, ascending by year.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedSeries {
    pub metric: Metric,
    pub points: Vec<(i32, f64)>,
}

impl AggregatedSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn value_for(&self, year: i32) -> Option<f64> {
        self.points
            .binary_search_by_key(&year, |(y, _)| *y)
            .ok()
            .map(|i| self.points[i].1)
    }

    /// Sum over every year.
    pub fn total(&self) -> f64 {
        self.points.iter().map(|(_, v)| v).sum()
    }
}

/// A relabelled series column of a [`SelectedTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedColumn {
    pub kind: SeriesKind,
    pub values: Vec<Option<f64>>,
}

impl SelectedColumn {
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

/// The year column plus one column per enabled series, one row per record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectedTable {
    pub years: Vec<i32>,
    pub columns: Vec<SelectedColumn>,
}

impl SelectedTable {
    /// Column headers, `Year` first.
    pub fn header(&self) -> Vec<&'static str> {
        std::iter::once(YEAR_COLUMN)
            .chain(self.columns.iter().map(|c| c.label()))
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.years.len()
    }

    /// Including the year column.
    pub fn column_count(&self) -> usize {
        1 + self.columns.len()
    }

    /// `false` when only the year column is present.
    pub fn has_series(&self) -> bool {
        !self.columns.is_empty()
    }

    pub fn column(&self, kind: SeriesKind) -> Option<&SelectedColumn> {
        self.columns.iter().find(|c| c.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_headers_match_metric_columns() {
        let json = serde_json::to_value(Record::new("A", 2000)).unwrap();
        let keys: BTreeSet<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        for m in Metric::ALL {
            assert!(keys.contains(m.column_name()), "{}", m.column_name());
        }
        assert!(keys.contains(ENTITY_COLUMN) && keys.contains(YEAR_COLUMN));
        assert_eq!(keys.len(), 2 + Metric::ALL.len());
    }

    #[test]
    fn whole_year_accepts_integral_floats_only() {
        assert_eq!(whole_year(2000.0), Some(2000));
        assert_eq!(whole_year(2000.5), None);
        assert_eq!(whole_year(f64::NAN), None);
        assert_eq!(whole_year(1e12), None);
    }

    #[test]
    fn json_year_may_be_written_as_float() {
        let mut row = serde_json::to_value(Record::new("A", 0)).unwrap();
        row["Year"] = serde_json::json!(2001.0);
        let r: Record = serde_json::from_value(row.clone()).unwrap();
        assert_eq!(r.year, 2001);

        row["Year"] = serde_json::json!(2001.5);
        assert!(serde_json::from_value::<Record>(row).is_err());
    }

    #[test]
    fn series_kinds_bind_to_their_columns() {
        assert_eq!(SeriesKind::Agricultural.source(), Metric::AgriculturalDischarge);
        assert_eq!(SeriesKind::Industrial.source(), Metric::IndustrialUntreated);
        assert_eq!(SeriesKind::Agricultural.label(), "Agricultural Wastewater");
    }

    #[test]
    fn record_value_treats_nan_as_missing() {
        let r = Record::new("A", 2000)
            .with(Metric::UrbanUntreated, f64::NAN)
            .with(Metric::PrematureDeathCount, 12.0);
        assert_eq!(r.value(Metric::UrbanUntreated), None);
        assert_eq!(r.value(Metric::PrematureDeathCount), Some(12.0));
        assert_eq!(r.value(Metric::TotalInlandDischarge), None);
    }

    #[test]
    fn dataset_lists_entities_in_first_appearance_order() {
        let ds = Dataset::from_records(vec![
            Record::new("Peru", 2000),
            Record::new("Chad", 2000),
            Record::new("Peru", 2001),
        ]);
        assert_eq!(ds.entities(), ["Peru".to_string(), "Chad".to_string()]);
        assert!(ds.contains_entity("Chad"));
        assert!(!ds.contains_entity("Fiji"));
    }

    #[test]
    fn inverted_criteria_are_rejected() {
        let err = FilterCriteria::new("A", 2005, 2000, SeriesKind::ALL).unwrap_err();
        assert_eq!(
            err,
            CriteriaError::InvertedRange {
                year_min: 2005,
                year_max: 2000
            }
        );
        assert!(FilterCriteria::new("A", 2003, 2003, Vec::<SeriesKind>::new()).is_ok());
    }

    #[test]
    fn criteria_deduplicate_series_and_keep_order() {
        let c = FilterCriteria::new(
            "A",
            2000,
            2001,
            [SeriesKind::Industrial, SeriesKind::Agricultural, SeriesKind::Industrial],
        )
        .unwrap();
        assert_eq!(
            c.enabled_series(),
            [SeriesKind::Industrial, SeriesKind::Agricultural]
        );
    }

    #[test]
    fn toggling_series_appends_and_removes() {
        let mut c = FilterCriteria::new("A", 2000, 2001, SeriesKind::ALL).unwrap();
        c.set_series(SeriesKind::Agricultural, false);
        assert_eq!(c.enabled_series(), [SeriesKind::Industrial]);
        c.set_series(SeriesKind::Agricultural, true);
        assert_eq!(
            c.enabled_series(),
            [SeriesKind::Industrial, SeriesKind::Agricultural]
        );
        c.set_series(SeriesKind::Agricultural, true);
        assert_eq!(c.enabled_series().len(), 2);
    }

    #[test]
    fn year_range_intersection() {
        let a = YearRange::new(2000, 2005).unwrap();
        let b = YearRange::new(2003, 2010).unwrap();
        assert_eq!(a.intersect(&b), Some(YearRange::new(2003, 2005).unwrap()));
        let c = YearRange::new(2006, 2010).unwrap();
        assert_eq!(a.intersect(&c), None);
        assert_eq!(a.intersect(&YearRange::single(2005)), Some(YearRange::single(2005)));
    }

    #[test]
    fn aggregated_series_lookup() {
        let s = AggregatedSeries {
            metric: Metric::TotalInlandDischarge,
            points: vec![(2000, 1.0), (2002, 2.5)],
        };
        assert_eq!(s.value_for(2002), Some(2.5));
        assert_eq!(s.value_for(2001), None);
        assert_eq!(s.total(), 3.5);
    }
}
