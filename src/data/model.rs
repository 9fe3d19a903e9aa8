use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FieldValue – a single cell in a filterable column
// ---------------------------------------------------------------------------

/// A cell of a filterable column. The fiscal year is the only integer column,
/// everything else is categorical text.
///
/// The derived `Ord` sorts integers numerically and text lexicographically,
/// which is the order the filter option lists are shown in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

// ---------------------------------------------------------------------------
// FilterColumn – the columns exposed as multi-select filters
// ---------------------------------------------------------------------------

/// How the option list of a filter column is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionOrder {
    /// Ascending by [`FieldValue`] ordering.
    Sorted,
    /// Order of first appearance in the loaded dataset.
    FirstSeen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterColumn {
    Year,
    Seniority,
    ContractType,
    RemoteMode,
    CompanySize,
    Currency,
    ResidenceCountry,
}

impl FilterColumn {
    /// All filterable columns, in sidebar order.
    pub const ALL: [FilterColumn; 7] = [
        FilterColumn::Year,
        FilterColumn::Seniority,
        FilterColumn::ContractType,
        FilterColumn::RemoteMode,
        FilterColumn::CompanySize,
        FilterColumn::Currency,
        FilterColumn::ResidenceCountry,
    ];

    /// Human readable label used in the filter panel.
    pub fn label(self) -> &'static str {
        match self {
            FilterColumn::Year => "Fiscal year",
            FilterColumn::Seniority => "Seniority",
            FilterColumn::ContractType => "Contract type",
            FilterColumn::RemoteMode => "Remote mode",
            FilterColumn::CompanySize => "Company size",
            FilterColumn::Currency => "Currency",
            FilterColumn::ResidenceCountry => "Country",
        }
    }

    /// Column name in the source file.
    pub fn source_name(self) -> &'static str {
        match self {
            FilterColumn::Year => columns::YEAR,
            FilterColumn::Seniority => columns::SENIORITY,
            FilterColumn::ContractType => columns::CONTRACT_TYPE,
            FilterColumn::RemoteMode => columns::REMOTE_MODE,
            FilterColumn::CompanySize => columns::COMPANY_SIZE,
            FilterColumn::Currency => columns::CURRENCY,
            FilterColumn::ResidenceCountry => columns::RESIDENCE_COUNTRY,
        }
    }

    pub fn option_order(self) -> OptionOrder {
        match self {
            // Country codes are a nominal display list.
            FilterColumn::ResidenceCountry => OptionOrder::FirstSeen,
            _ => OptionOrder::Sorted,
        }
    }
}

impl fmt::Display for FilterColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Source column names of the salary dataset.
pub mod columns {
    pub const YEAR: &str = "ano";
    pub const SENIORITY: &str = "senioridade";
    pub const CONTRACT_TYPE: &str = "contrato";
    pub const REMOTE_MODE: &str = "remoto";
    pub const COMPANY_SIZE: &str = "tamanho_empresa";
    pub const CURRENCY: &str = "moeda";
    pub const RESIDENCE_COUNTRY: &str = "residencia_iso3";
    pub const ROLE_TITLE: &str = "cargo";
    pub const SALARY_USD: &str = "usd";

    /// Every column a source file must provide.
    pub const REQUIRED: [&str; 9] = [
        YEAR,
        SENIORITY,
        CONTRACT_TYPE,
        REMOTE_MODE,
        COMPANY_SIZE,
        CURRENCY,
        RESIDENCE_COUNTRY,
        ROLE_TITLE,
        SALARY_USD,
    ];
}

// ---------------------------------------------------------------------------
// SalaryRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// One salary observation. Serde names follow the source file so the same
/// struct reads CSV/JSON and writes exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRecord {
    #[serde(rename = "ano")]
    pub year: i64,
    #[serde(rename = "senioridade")]
    pub seniority: String,
    #[serde(rename = "contrato")]
    pub contract_type: String,
    #[serde(rename = "remoto")]
    pub remote_mode: String,
    #[serde(rename = "tamanho_empresa")]
    pub company_size: String,
    #[serde(rename = "moeda")]
    pub currency: String,
    #[serde(rename = "residencia_iso3")]
    pub residence_country: String,
    #[serde(rename = "cargo")]
    pub role_title: String,
    #[serde(rename = "usd")]
    pub salary_usd: f64,
}

impl SalaryRecord {
    /// Value of a filterable column for this row.
    pub fn value(&self, column: FilterColumn) -> FieldValue {
        match column {
            FilterColumn::Year => FieldValue::Integer(self.year),
            FilterColumn::Seniority => FieldValue::Text(self.seniority.clone()),
            FilterColumn::ContractType => FieldValue::Text(self.contract_type.clone()),
            FilterColumn::RemoteMode => FieldValue::Text(self.remote_mode.clone()),
            FilterColumn::CompanySize => FieldValue::Text(self.company_size.clone()),
            FilterColumn::Currency => FieldValue::Text(self.currency.clone()),
            FilterColumn::ResidenceCountry => FieldValue::Text(self.residence_country.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed filter option lists.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<SalaryRecord>,
    /// For each filterable column the ordered list of distinct values.
    options: BTreeMap<FilterColumn, Vec<FieldValue>>,
    /// Sorted distinct role titles.
    roles: Vec<String>,
}

impl Dataset {
    /// Build option indices from the loaded records.
    pub fn from_records(records: Vec<SalaryRecord>) -> Self {
        let options = FilterColumn::ALL
            .iter()
            .map(|&col| (col, super::filter::distinct_values(&records, col)))
            .collect();

        let mut roles: Vec<String> = records.iter().map(|r| r.role_title.clone()).collect();
        roles.sort();
        roles.dedup();

        Dataset {
            records,
            options,
            roles,
        }
    }

    pub fn records(&self) -> &[SalaryRecord] {
        &self.records
    }

    /// Filter option list for `column`; covers the whole dataset regardless
    /// of any selection.
    pub fn options(&self, column: FilterColumn) -> &[FieldValue] {
        self.options.get(&column).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
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
