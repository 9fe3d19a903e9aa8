use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use super::format_usd;
use crate::data::model::SalaryRecord;

const HEADERS: [&str; 9] = [
    "Year",
    "Seniority",
    "Contract",
    "Remote mode",
    "Company size",
    "Currency",
    "Country",
    "Role",
    "Salary (USD)",
];

const ROW_HEIGHT: f32 = 18.0;

/// Raw filtered records.
pub fn records_table(ui: &mut Ui, rows: &[SalaryRecord]) {
    ui.label(RichText::new("Record details").strong().size(15.0));
    if rows.is_empty() {
        ui.label("No records match the current filters.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(true)
        .max_scroll_height(400.0)
        .columns(Column::auto().at_least(60.0), HEADERS.len() - 1)
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let r = &rows[row.index()];
                let cells = [
                    r.year.to_string(),
                    r.seniority.clone(),
                    r.contract_type.clone(),
                    r.remote_mode.clone(),
                    r.company_size.clone(),
                    r.currency.clone(),
                    r.residence_country.clone(),
                    r.role_title.clone(),
                    format_usd(r.salary_usd),
                ];
                for cell in cells {
                    row.col(|ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}
