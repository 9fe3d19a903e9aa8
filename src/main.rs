mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::Result;
use app::SalaryDashboardApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::from_env();
    log::info!("Starting salary dashboard with source {}", config.source);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Salary Dashboard – Data Jobs",
        options,
        Box::new(move |_cc| Ok(Box::new(SalaryDashboardApp::new(&config)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard window: {e}"))
}
