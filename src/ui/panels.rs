use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use super::{format_usd, group_thousands};
use crate::data::aggregate::SummaryMetrics;
use crate::data::loader::DataSource;
use crate::data::model::{FieldValue, FilterColumn};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state inside the loop.
    let options: Vec<(FilterColumn, Vec<FieldValue>)> = FilterColumn::ALL
        .iter()
        .map(|&col| (col, dataset.options(col).to_vec()))
        .collect();
    let roles = dataset.roles().to_vec();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Featured role for the per-country chart ----
            ui.strong("Role by country");
            let current_role = state.featured_role.clone();
            egui::ComboBox::from_id_salt("featured_role")
                .selected_text(&current_role)
                .show_ui(ui, |ui: &mut Ui| {
                    for role in &roles {
                        if ui.selectable_label(current_role == *role, role).clicked() {
                            state.set_featured_role(role.clone());
                        }
                    }
                });
            ui.separator();

            // ---- Per-column filter widgets (collapsible) ----
            for (col, all_values) in &options {
                let n_selected = state.selection.selected_count(*col);
                let n_total = all_values.len();
                let header_text = format!("{col}  ({n_selected}/{n_total})");

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(col.source_name())
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(*col);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(*col);
                            }
                        });

                        for val in all_values {
                            let mut checked = state.selection.is_selected(*col, val);
                            if ui.checkbox(&mut checked, val.to_string()).changed() {
                                state.toggle_filter_value(*col, val);
                            }
                        }
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// Metrics row
// ---------------------------------------------------------------------------

/// Headline numbers across the top of the central panel.
pub fn metrics_row(ui: &mut Ui, metrics: &SummaryMetrics) {
    ui.strong("Overall metrics (annual salary in USD)");
    let cards = [
        ("Mean salary", format_usd(metrics.mean_salary)),
        ("Median salary", format_usd(metrics.median_salary)),
        ("Max salary", format_usd(metrics.max_salary)),
        ("Records", group_thousands(metrics.record_count as u64)),
        ("Most common contract", metrics.modal_contract_type.clone()),
        ("Most common remote mode", metrics.modal_remote_mode.clone()),
        ("Most common role", metrics.modal_role.clone()),
    ];

    ui.columns(cards.len(), |cols: &mut [Ui]| {
        for (ui, (label, value)) in cols.iter_mut().zip(cards.iter()) {
            ui.label(RichText::new(*label).weak());
            ui.label(RichText::new(value).size(20.0).strong());
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
            if ui
                .add_enabled(state.dataset.is_some(), egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} visible",
                group_thousands(ds.len() as u64),
                group_thousands(state.snapshot.view.len() as u64)
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open salary data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(DataSource::File(path));
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered records")
        .set_file_name("filtered_salaries.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_filtered(&path) {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
