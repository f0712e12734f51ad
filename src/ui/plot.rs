use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use wastewater_dashboard::data::model::{AggregatedSeries, FilteredView, Metric, SelectedTable};

use crate::color::MetricColors;

const CHART_HEIGHT: f32 = 260.0;
const VOLUME_AXIS: &str = "Volume (million m³)";

fn placeholder(ui: &mut Ui, text: &str) {
    ui.add_space(8.0);
    ui.weak(text);
    ui.add_space(8.0);
}

fn line_with_markers(plot_ui: &mut egui_plot::PlotUi, points: &[(i32, f64)], name: &str, color: Color32) {
    let coords: Vec<[f64; 2]> = points.iter().map(|&(y, v)| [y as f64, v]).collect();
    plot_ui.line(
        Line::new(PlotPoints::from(coords.clone()))
            .name(name)
            .color(color)
            .width(2.0),
    );
    plot_ui.points(
        Points::new(PlotPoints::from(coords))
            .name(name)
            .color(color)
            .radius(3.0),
    );
}

/// Split `(year, value)` points into stacking layers: layer `k` holds the
/// `k`-th point of each year, so rows sharing a year stack instead of
/// hiding each other.
fn stack_layers(points: &[(i32, f64)]) -> Vec<Vec<(i32, f64)>> {
    let mut depth: BTreeMap<i32, usize> = BTreeMap::new();
    let mut layers: Vec<Vec<(i32, f64)>> = Vec::new();
    for &(year, value) in points {
        let k = depth.entry(year).or_insert(0);
        if layers.len() <= *k {
            layers.push(Vec::new());
        }
        layers[*k].push((year, value));
        *k += 1;
    }
    layers
}

// ---------------------------------------------------------------------------
// Premature deaths vs. urban wastewater
// ---------------------------------------------------------------------------

/// Death counts as bars above the urban untreated wastewater line, with the
/// year axes linked so panning one moves the other. Records sharing a year
/// stack into one bar.
pub fn health_chart(ui: &mut Ui, view: &FilteredView, colors: &MetricColors) {
    ui.strong("Premature Death Count and Urban Wastewater Discharged");
    if view.is_empty() {
        placeholder(ui, "No data for this selection.");
        return;
    }

    let deaths = Metric::PrematureDeathCount;
    let mut charts: Vec<BarChart> = Vec::new();
    for layer in stack_layers(&view.points(deaths)) {
        let bars: Vec<Bar> = layer
            .into_iter()
            .map(|(year, v)| Bar::new(year as f64, v).width(0.6))
            .collect();
        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(deaths.label())
            .color(colors.color_for(deaths))
            .stack_on(&below);
        charts.push(chart);
    }

    Plot::new("deaths_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .link_axis("health_years", [true, false])
        .y_axis_label(deaths.label())
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });

    let urban = Metric::UrbanUntreated;
    Plot::new("urban_plot")
        .height(CHART_HEIGHT * 0.6)
        .legend(Legend::default())
        .link_axis("health_years", [true, false])
        .x_axis_label("Year")
        .y_axis_label(urban.label())
        .show(ui, |plot_ui| {
            line_with_markers(plot_ui, &view.points(urban), urban.label(), colors.color_for(urban));
        });
}

// ---------------------------------------------------------------------------
// Wastewater discharge trends
// ---------------------------------------------------------------------------

/// One line per enabled series of the selected table.
pub fn trends_chart(ui: &mut Ui, table: &SelectedTable, colors: &MetricColors) {
    ui.strong("Wastewater Discharge Trends");
    if !table.has_series() {
        placeholder(ui, "Enable a wastewater series in the sidebar to plot trends.");
        return;
    }
    if table.row_count() == 0 {
        placeholder(ui, "No data for this selection.");
        return;
    }

    Plot::new("trends_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label(VOLUME_AXIS)
        .show(ui, |plot_ui| {
            for column in &table.columns {
                let points: PlotPoints = table
                    .years
                    .iter()
                    .zip(&column.values)
                    .filter_map(|(&year, v)| v.map(|v| [year as f64, v]))
                    .collect();
                plot_ui.line(
                    Line::new(points)
                        .name(column.label())
                        .color(colors.series_color(column.kind))
                        .width(2.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Per-year totals
// ---------------------------------------------------------------------------

/// Line with markers for one aggregated metric.
pub fn aggregate_chart(ui: &mut Ui, id: &str, series: &AggregatedSeries, colors: &MetricColors) {
    if series.is_empty() {
        placeholder(ui, "No data for this selection.");
        return;
    }

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("Total Volume (million m³)")
        .show(ui, |plot_ui| {
            line_with_markers(
                plot_ui,
                &series.points,
                series.metric.label(),
                colors.color_for(series.metric),
            );
        });
}
