mod app;
mod color;
mod state;
mod ui;

use anyhow::{Context, Result};
use app::DashboardApp;
use clap::Parser;
use eframe::egui;
use state::AppState;
use wastewater_dashboard::config::Config;

fn main() -> Result<()> {
    env_logger::init();
    let config = Config::parse();

    // Without data there is nothing to render, so a bad file stops startup.
    let dataset = wastewater_dashboard::data::load(&config.data)
        .with_context(|| format!("loading dataset {}", config.data.display()))?;

    let mut state = AppState::default();
    state.set_dataset(dataset, Some(config.data.clone()), config.entity.as_deref());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.width, config.height])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Wastewater Health Impact Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard window: {e}"))
}
