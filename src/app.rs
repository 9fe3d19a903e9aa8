use eframe::egui::{self, ScrollArea, Ui};

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SalaryDashboardApp {
    pub state: AppState,
}

impl SalaryDashboardApp {
    /// Create the app and load the configured source. A load failure leaves
    /// the app running with the error in the status bar.
    pub fn new(config: &DashboardConfig) -> Self {
        let mut state = AppState::new(config);
        state.load(config.source.clone());
        Self { state }
    }
}

impl eframe::App for SalaryDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard(ui, &self.state);
        });
    }
}

fn dashboard(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No salary data loaded  (File → Open…)");
        });
        return;
    }

    let snapshot = &state.snapshot;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Data-science salary analysis");
            ui.label("Explore salaries in the data field over recent years. Use the filters on the left to refine the analysis.");
            ui.add_space(6.0);

            panels::metrics_row(ui, &snapshot.metrics);
            ui.separator();

            ui.columns(2, |cols: &mut [Ui]| {
                charts::top_roles_chart(&mut cols[0], snapshot);
                charts::salary_histogram_chart(&mut cols[1], snapshot);
            });
            ui.add_space(8.0);
            ui.columns(2, |cols: &mut [Ui]| {
                charts::remote_mode_donut(&mut cols[0], snapshot, state.remote_colors.as_ref());
                charts::country_chart(&mut cols[1], snapshot);
            });
            ui.separator();

            table::records_table(ui, snapshot.view.rows());
        });
}
