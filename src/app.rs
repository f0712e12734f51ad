use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::color::MetricColors;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

const INTRO: [(&str, &str); 4] = [
    (
        "Health",
        "Proper wastewater management is essential for preventing the spread of diseases and \
         contaminants, safeguarding public health and well-being.",
    ),
    (
        "Environment",
        "Effective treatment and disposal of wastewater mitigate environmental pollution, \
         preserving ecosystems, and maintaining biodiversity.",
    ),
    (
        "Carbon Density",
        "Managing wastewater reduces carbon emissions, contributing to efforts to mitigate \
         climate change and promote environmental sustainability.",
    ),
    (
        "Society",
        "By conserving resources and protecting water sources, wastewater management \
         contributes to a more sustainable society, ensuring access to clean water for future \
         generations.",
    ),
];

const HEALTH_CAPTION: &str = "The graph above visualizes the relationship between urban wastewater \
    discharge and premature death counts. This highlights the direct health impacts of inadequate \
    water treatment and urban planning.";

const TRENDS_CAPTION: &str = "The line chart demonstrates the annual trends in agricultural and \
    industrial wastewater discharges. This data helps in understanding how different sectors \
    contribute to overall water pollution over time.";

const AGRICULTURAL_CAPTION: &str = "This plot traces the volume of agricultural wastewater \
    discharged into inland waters annually. The fluctuations indicate changes in agricultural \
    practices and environmental policy impacts over the years.";

const TOTAL_CAPTION: &str = "This line chart provides insights into the total volume of discharges \
    to inland waters over time, reflecting the cumulative impact of all water-related activities \
    on inland water bodies.";

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
    colors: MetricColors,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            colors: MetricColors::default(),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selection ----
        egui::SidePanel::left("selection_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| self.dashboard(ui));
        });
    }
}

impl DashboardApp {
    fn dashboard(&self, ui: &mut Ui) {
        ui.heading(RichText::new("Wastewater Health Impact Dashboard").size(26.0));
        for (title, text) in INTRO {
            ui.horizontal_wrapped(|ui: &mut Ui| {
                ui.label(RichText::new(format!("• {title}:")).strong());
                ui.label(text);
            });
        }
        ui.separator();

        let (Some(criteria), Some(charts)) = (&self.state.criteria, &self.state.charts) else {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a file to view the dashboard  (File → Open…)");
            });
            return;
        };

        ui.heading(format!("Data for {}", criteria.entity()));
        ui.add_space(4.0);

        plot::health_chart(ui, &charts.view, &self.colors);
        ui.label(HEALTH_CAPTION);
        ui.add_space(12.0);

        plot::trends_chart(ui, &charts.trends, &self.colors);
        ui.label(TRENDS_CAPTION);
        ui.add_space(12.0);

        ui.columns(2, |columns| {
            let ui = &mut columns[0];
            ui.strong("Agricultural Discharges to Inland Waters Over Time");
            plot::aggregate_chart(ui, "agricultural_totals", &charts.agricultural, &self.colors);
            ui.label(AGRICULTURAL_CAPTION);

            let ui = &mut columns[1];
            ui.strong("Total Discharges to Inland Waters Over Time");
            plot::aggregate_chart(ui, "inland_totals", &charts.total_inland, &self.colors);
            ui.label(TOTAL_CAPTION);
        });
        ui.add_space(12.0);

        egui::CollapsingHeader::new("Selected series table")
            .default_open(false)
            .show(ui, |ui: &mut Ui| table::series_table(ui, &charts.trends));
    }
}
