use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::model::{Dataset, FieldValue, FilterColumn, OptionOrder, SalaryRecord};

// ---------------------------------------------------------------------------
// Option lists
// ---------------------------------------------------------------------------

/// Every distinct value of `column` in `records`.
///
/// Sorted ascending unless the column is a nominal display list
/// ([`OptionOrder::FirstSeen`]), in which case the first-seen order is kept.
pub fn distinct_values(records: &[SalaryRecord], column: FilterColumn) -> Vec<FieldValue> {
    match column.option_order() {
        OptionOrder::Sorted => records
            .iter()
            .map(|r| r.value(column))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
        OptionOrder::FirstSeen => {
            let mut seen = HashSet::new();
            records
                .iter()
                .map(|r| r.value(column))
                .filter(|v| seen.insert(v.clone()))
                .collect()
        }
    }
}

// ---------------------------------------------------------------------------
// Filter predicate: which values are allowed per column
// ---------------------------------------------------------------------------

/// Per-column selection state: maps column → set of allowed values.
///
/// A column that is absent or whose set is empty allows nothing, so the
/// filtered view is empty. Use [`FilterSelection::all`] for the
/// "everything selected" default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    allowed: BTreeMap<FilterColumn, BTreeSet<FieldValue>>,
}

impl FilterSelection {
    /// Selection with every value of every filterable column allowed.
    pub fn all(dataset: &Dataset) -> Self {
        let allowed = FilterColumn::ALL
            .iter()
            .map(|&col| (col, dataset.options(col).iter().cloned().collect()))
            .collect();
        FilterSelection { allowed }
    }

    pub fn is_selected(&self, column: FilterColumn, value: &FieldValue) -> bool {
        self.allowed
            .get(&column)
            .is_some_and(|set| set.contains(value))
    }

    /// Number of allowed values for `column`.
    pub fn selected_count(&self, column: FilterColumn) -> usize {
        self.allowed.get(&column).map_or(0, BTreeSet::len)
    }

    /// Replace the allowed set of `column`.
    pub fn set(&mut self, column: FilterColumn, values: impl IntoIterator<Item = FieldValue>) {
        self.allowed.insert(column, values.into_iter().collect());
    }

    /// Toggle a single value in a column's allowed set.
    pub fn toggle(&mut self, column: FilterColumn, value: &FieldValue) {
        let selected = self.allowed.entry(column).or_default();
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
    }

    /// Allow every value of `column` present in `dataset`.
    pub fn select_all(&mut self, dataset: &Dataset, column: FilterColumn) {
        self.set(column, dataset.options(column).iter().cloned());
    }

    /// Allow nothing in `column`.
    pub fn select_none(&mut self, column: FilterColumn) {
        self.allowed.insert(column, BTreeSet::new());
    }

    fn allows(&self, record: &SalaryRecord) -> bool {
        FilterColumn::ALL.iter().all(|&col| match self.allowed.get(&col) {
            Some(selected) if !selected.is_empty() => selected.contains(&record.value(col)),
            // Nothing selected for this column → hide everything
            _ => false,
        })
    }
}

// ---------------------------------------------------------------------------
// FilteredView
// ---------------------------------------------------------------------------

/// Rows of the dataset passing every column filter, in loaded order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredView {
    rows: Vec<SalaryRecord>,
}

impl FilteredView {
    pub fn rows(&self) -> &[SalaryRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Materialize the rows of `dataset` that pass `selection`.
///
/// A row passes when, for every filterable column, its value is a member of
/// the column's allowed set. An empty view is a valid result.
pub fn apply_filters(dataset: &Dataset, selection: &FilterSelection) -> FilteredView {
    let rows = dataset
        .records()
        .iter()
        .filter(|r| selection.allows(r))
        .cloned()
        .collect();
    FilteredView { rows }
}
