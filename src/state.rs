use std::path::Path;

use anyhow::{Context, Result};

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::aggregate::DashboardSnapshot;
use crate::data::filter::FilterSelection;
use crate::data::loader::{self, DataSource};
use crate::data::model::{Dataset, FieldValue, FilterColumn};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Where the current dataset came from (used by File → Reload).
    pub source: Option<DataSource>,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<Dataset>,

    /// Per-column filter selections.
    pub selection: FilterSelection,

    /// Role whose mean salary is charted per country.
    pub featured_role: String,

    /// Engine outputs for the current selection (recomputed on change).
    pub snapshot: DashboardSnapshot,

    /// Colours of the remote-mode donut, fixed per dataset.
    pub remote_colors: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            featured_role: config.featured_role.clone(),
            ..Default::default()
        }
    }

    /// Load `source` and make it the current dataset. On failure the previous
    /// dataset is dropped so no stale charts are shown.
    pub fn load(&mut self, source: DataSource) {
        match loader::load(&source) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load {source}: {e}");
                self.dataset = None;
                self.snapshot = DashboardSnapshot::default();
                self.status_message = Some(format!("Error: {e}"));
            }
        }
        self.source = Some(source);
    }

    /// Load the current source again.
    pub fn reload(&mut self) {
        if let Some(source) = self.source.clone() {
            self.load(source);
        }
    }

    /// Ingest a newly loaded dataset with every filter value selected.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.selection = FilterSelection::all(&dataset);

        if dataset.is_empty() {
            log::warn!("Loaded dataset has no records");
        }

        if !dataset.roles().iter().any(|r| *r == self.featured_role) {
            log::warn!(
                "Featured role '{}' does not occur in the dataset",
                self.featured_role
            );
        }

        let remote_modes = dataset.options(FilterColumn::RemoteMode);
        self.remote_colors = Some(ColorMap::new(remote_modes.iter().filter_map(|v| match v {
            FieldValue::Text(s) => Some(s.as_str()),
            FieldValue::Integer(_) => None,
        })));

        self.dataset = Some(dataset);
        self.status_message = None;
        self.recompute();
    }

    /// Recompute the snapshot after a selection change.
    pub fn recompute(&mut self) {
        if let Some(ds) = &self.dataset {
            self.snapshot = DashboardSnapshot::compute(ds, &self.selection, &self.featured_role);
        }
    }

    /// Toggle a single value in a column's filter.
    pub fn toggle_filter_value(&mut self, column: FilterColumn, value: &FieldValue) {
        self.selection.toggle(column, value);
        self.recompute();
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: FilterColumn) {
        if let Some(ds) = &self.dataset {
            self.selection.select_all(ds, column);
            self.recompute();
        }
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: FilterColumn) {
        self.selection.select_none(column);
        self.recompute();
    }

    /// Change the role charted per country.
    pub fn set_featured_role(&mut self, role: String) {
        self.featured_role = role;
        self.recompute();
    }

    /// Write the filtered rows to `path` as CSV.
    pub fn export_filtered(&self, path: &Path) -> Result<()> {
        loader::write_csv(path, self.snapshot.view.rows())
            .with_context(|| format!("exporting to {}", path.display()))?;
        log::info!(
            "Exported {} records to {}",
            self.snapshot.view.len(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    fn loaded_state() -> AppState {
        let mut state = AppState::new(&DashboardConfig::default());
        state.set_dataset(Dataset::from_records(vec![
            record(2023, "junior", "full-time", "remote", "USA", "Data Scientist", 60.0),
            record(2024, "senior", "contract", "hybrid", "BRA", "Data Scientist", 90.0),
            record(2024, "senior", "full-time", "remote", "USA", "Analyst", 120.0),
        ]));
        state
    }

    #[test]
    fn test_set_dataset_selects_everything() {
        let state = loaded_state();
        assert_eq!(state.snapshot.metrics.record_count, 3);
        assert_eq!(state.snapshot.country_means.len(), 2);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn test_set_empty_dataset() {
        let mut state = loaded_state();
        state.set_dataset(Dataset::from_records(Vec::new()));
        assert!(state.dataset.as_ref().is_some_and(Dataset::is_empty));
        assert_eq!(state.snapshot.metrics.record_count, 0);
        assert!(state.snapshot.view.is_empty());
    }

    #[test]
    fn test_filter_changes_recompute() {
        let mut state = loaded_state();
        state.toggle_filter_value(FilterColumn::Year, &FieldValue::Integer(2023));
        assert_eq!(state.snapshot.metrics.record_count, 2);

        state.select_none(FilterColumn::Seniority);
        assert_eq!(state.snapshot.metrics, Default::default());
        assert!(state.snapshot.histogram.is_empty());

        state.select_all(FilterColumn::Seniority);
        state.select_all(FilterColumn::Year);
        assert_eq!(state.snapshot.metrics.record_count, 3);
    }

    #[test]
    fn test_featured_role_change() {
        let mut state = loaded_state();
        state.set_featured_role("Analyst".to_string());
        assert_eq!(state.snapshot.featured_role, "Analyst");
        assert_eq!(state.snapshot.country_means.keys().collect::<Vec<_>>(), vec!["USA"]);
    }

    #[test]
    fn test_failed_load_clears_dataset() {
        let mut state = loaded_state();
        state.load(DataSource::File("does-not-exist.csv".into()));
        assert!(state.dataset.is_none());
        assert_eq!(state.snapshot.metrics.record_count, 0);
        assert!(state.status_message.as_deref().unwrap_or("").starts_with("Error"));
    }

    #[test]
    fn test_export_filtered() {
        let mut state = loaded_state();
        state.toggle_filter_value(FilterColumn::ResidenceCountry, &FieldValue::from("BRA"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filtered.csv");
        state.export_filtered(&path).unwrap();

        let exported = loader::load_file(&path).unwrap();
        assert_eq!(exported.len(), 2);
        assert!(exported.records().iter().all(|r| r.residence_country == "USA"));
    }
}
