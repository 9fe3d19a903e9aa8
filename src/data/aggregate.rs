use std::collections::{BTreeMap, HashMap};

use super::filter::{apply_filters, FilterSelection, FilteredView};
use super::model::{Dataset, SalaryRecord};

/// Number of roles shown in the "top roles by mean salary" chart.
pub const TOP_ROLES: usize = 10;
/// Number of equal-width bins of the salary histogram.
pub const HISTOGRAM_BINS: usize = 30;
/// Role charted per country when none is configured.
pub const DEFAULT_FEATURED_ROLE: &str = "Data Scientist";

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// Headline numbers of a filtered view.
///
/// `Default` is the empty-view fallback: numbers are zero, categories empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryMetrics {
    pub mean_salary: f64,
    pub median_salary: f64,
    pub max_salary: f64,
    pub record_count: usize,
    pub modal_contract_type: String,
    pub modal_remote_mode: String,
    pub modal_role: String,
}

pub fn summary_metrics(rows: &[SalaryRecord]) -> SummaryMetrics {
    if rows.is_empty() {
        return SummaryMetrics::default();
    }

    let salaries: Vec<f64> = rows.iter().map(|r| r.salary_usd).collect();

    SummaryMetrics {
        mean_salary: mean(&salaries),
        median_salary: median(&salaries),
        max_salary: salaries.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        record_count: rows.len(),
        modal_contract_type: mode(rows.iter().map(|r| r.contract_type.as_str())),
        modal_remote_mode: mode(rows.iter().map(|r| r.remote_mode.as_str())),
        modal_role: mode(rows.iter().map(|r| r.role_title.as_str())),
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Most frequent value; among tied values the one seen first wins.
/// Empty input gives an empty string.
fn mode<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let mut first_seen: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in values {
        let count = counts.entry(v).or_insert(0);
        if *count == 0 {
            first_seen.push(v);
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for v in first_seen {
        let count = counts[v];
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((v, count));
        }
    }
    best.map(|(v, _)| v.to_string()).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Group-by views
// ---------------------------------------------------------------------------

/// Mean salary of one role.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleSalary {
    pub role: String,
    pub mean_salary: f64,
}

/// Mean salary per key, for the rows `key` maps to `Some`.
fn group_mean<'a>(
    rows: &'a [SalaryRecord],
    key: impl Fn(&'a SalaryRecord) -> Option<&'a str>,
) -> BTreeMap<String, f64> {
    let mut acc: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for r in rows {
        if let Some(k) = key(r) {
            let entry = acc.entry(k).or_insert((0.0, 0));
            entry.0 += r.salary_usd;
            entry.1 += 1;
        }
    }
    acc.into_iter()
        .map(|(k, (sum, n))| (k.to_string(), sum / n as f64))
        .collect()
}

/// The `n` roles with the highest mean salary, listed ascending by mean so a
/// horizontal bar chart shows the best-paid role on top.
///
/// Roles with equal means are ranked by name.
pub fn top_roles_by_salary(rows: &[SalaryRecord], n: usize) -> Vec<RoleSalary> {
    let mut roles: Vec<RoleSalary> = group_mean(rows, |r| Some(r.role_title.as_str()))
        .into_iter()
        .map(|(role, mean_salary)| RoleSalary { role, mean_salary })
        .collect();

    roles.sort_by(|a, b| {
        b.mean_salary
            .total_cmp(&a.mean_salary)
            .then_with(|| a.role.cmp(&b.role))
    });
    roles.truncate(n);
    roles.reverse();
    roles
}

/// Mean salary per residence country over the rows whose role is `role`.
/// Countries without such rows are absent.
pub fn mean_salary_by_country_for_role(rows: &[SalaryRecord], role: &str) -> BTreeMap<String, f64> {
    group_mean(rows, |r| {
        (r.role_title == role).then_some(r.residence_country.as_str())
    })
}

/// Number of rows per remote mode.
pub fn remote_mode_distribution(rows: &[SalaryRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for r in rows {
        *counts.entry(r.remote_mode.clone()).or_insert(0) += 1;
    }
    counts
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Half-open salary interval `[start, end)` and the number of rows in it.
/// The last bin of a histogram also holds `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Split the observed salary range into `bins` equal-width intervals and
/// count the rows in each.
///
/// When every salary is equal the range has no width and a single bin
/// `[v, v]` holds all rows. The same single bin is used when the range
/// overflows `f64`.
pub fn salary_histogram(rows: &[SalaryRecord], bins: usize) -> Vec<HistogramBin> {
    if rows.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (min, max) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
        (lo.min(r.salary_usd), hi.max(r.salary_usd))
    });

    let width = (max - min) / bins as f64;
    // Zero-width range, or one too wide to represent.
    if width <= 0.0 || !width.is_finite() {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: rows.len(),
        }];
    }

    let mut counts = vec![0usize; bins];
    for r in rows {
        let idx = ((r.salary_usd - min) / width).floor() as usize;
        counts[idx.min(bins - 1)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min + width * i as f64,
            end: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Snapshot – every output for one selection
// ---------------------------------------------------------------------------

/// All display-ready outputs of one (dataset, selection) pair.
#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    pub view: FilteredView,
    pub metrics: SummaryMetrics,
    pub top_roles: Vec<RoleSalary>,
    pub histogram: Vec<HistogramBin>,
    pub remote_modes: BTreeMap<String, usize>,
    pub featured_role: String,
    pub country_means: BTreeMap<String, f64>,
}

impl DashboardSnapshot {
    /// Recompute everything from scratch.
    pub fn compute(dataset: &Dataset, selection: &FilterSelection, featured_role: &str) -> Self {
        let view = apply_filters(dataset, selection);
        let rows = view.rows();
        log::debug!(
            "Recomputed dashboard: {} of {} records visible",
            rows.len(),
            dataset.len()
        );

        DashboardSnapshot {
            metrics: summary_metrics(rows),
            top_roles: top_roles_by_salary(rows, TOP_ROLES),
            histogram: salary_histogram(rows, HISTOGRAM_BINS),
            remote_modes: remote_mode_distribution(rows),
            featured_role: featured_role.to_string(),
            country_means: mean_salary_by_country_for_role(rows, featured_role),
            view,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;
    use crate::data::model::FilterColumn;
    use rstest::rstest;

    fn five_rows() -> Vec<SalaryRecord> {
        vec![
            record(2024, "senior", "full-time", "remote", "USA", "Data Scientist", 100.0),
            record(2024, "senior", "full-time", "remote", "USA", "Data Scientist", 200.0),
            record(2024, "junior", "contract", "hybrid", "BRA", "Data Scientist", 50.0),
            record(2023, "junior", "contract", "on-site", "USA", "Analyst", 80.0),
            record(2023, "senior", "full-time", "hybrid", "USA", "Analyst", 120.0),
        ]
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-2,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_country_means_for_role() {
        let means = mean_salary_by_country_for_role(&five_rows(), "Data Scientist");
        assert_eq!(means.len(), 2);
        assert_close(means["USA"], 150.0);
        assert_close(means["BRA"], 50.0);
    }

    #[test]
    fn test_country_means_for_missing_role() {
        assert!(mean_salary_by_country_for_role(&five_rows(), "Data Engineer").is_empty());
    }

    #[test]
    fn test_top_roles_ascending() {
        let top = top_roles_by_salary(&five_rows(), 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].role, "Analyst");
        assert_close(top[0].mean_salary, 100.0);
        assert_eq!(top[1].role, "Data Scientist");
        assert_close(top[1].mean_salary, 116.67);
    }

    #[test]
    fn test_top_roles_keeps_highest() {
        let top = top_roles_by_salary(&five_rows(), 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].role, "Data Scientist");
    }

    #[test]
    fn test_top_roles_limit_and_membership() {
        let rows: Vec<SalaryRecord> = (0..15)
            .map(|i| {
                let role = format!("Role {i:02}");
                record(2024, "mid", "full-time", "remote", "USA", &role, 1000.0 + i as f64)
            })
            .collect();

        let top = top_roles_by_salary(&rows, TOP_ROLES);
        assert_eq!(top.len(), TOP_ROLES);
        assert!(top.windows(2).all(|w| w[0].mean_salary <= w[1].mean_salary));
        assert!(top
            .iter()
            .all(|t| rows.iter().any(|r| r.role_title == t.role)));
        assert_eq!(top.last().map(|t| t.role.as_str()), Some("Role 14"));
        assert_eq!(top[0].role, "Role 05");
    }

    #[test]
    fn test_empty_view_fallback() {
        let metrics = summary_metrics(&[]);
        assert_eq!(metrics.mean_salary, 0.0);
        assert_eq!(metrics.median_salary, 0.0);
        assert_eq!(metrics.max_salary, 0.0);
        assert_eq!(metrics.record_count, 0);
        assert_eq!(metrics.modal_contract_type, "");
        assert_eq!(metrics.modal_remote_mode, "");
        assert_eq!(metrics.modal_role, "");

        assert!(top_roles_by_salary(&[], TOP_ROLES).is_empty());
        assert!(salary_histogram(&[], HISTOGRAM_BINS).is_empty());
        assert!(remote_mode_distribution(&[]).is_empty());
        assert!(mean_salary_by_country_for_role(&[], DEFAULT_FEATURED_ROLE).is_empty());
    }

    #[test]
    fn test_summary_metrics() {
        let metrics = summary_metrics(&five_rows());
        assert_close(metrics.mean_salary, 110.0);
        assert_close(metrics.median_salary, 100.0);
        assert_close(metrics.max_salary, 200.0);
        assert_eq!(metrics.record_count, 5);
        assert_eq!(metrics.modal_contract_type, "full-time");
        assert_eq!(metrics.modal_role, "Data Scientist");
        // remote and hybrid both appear twice; remote is seen first.
        assert_eq!(metrics.modal_remote_mode, "remote");
    }

    #[rstest]
    #[case(vec!["b", "a", "a", "b"], "b")]
    #[case(vec!["a", "b", "b"], "b")]
    #[case(vec!["z"], "z")]
    #[case(vec!["c", "b", "a"], "c")]
    fn test_mode_first_seen_tie_break(#[case] values: Vec<&str>, #[case] expected: &str) {
        assert_eq!(mode(values.into_iter()), expected);
    }

    #[test]
    fn test_median_even_count() {
        assert_close(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_histogram_single_row() {
        let rows = vec![record(2024, "mid", "full-time", "remote", "USA", "Analyst", 42.0)];
        let bins = salary_histogram(&rows, HISTOGRAM_BINS);
        let non_empty: Vec<&HistogramBin> = bins.iter().filter(|b| b.count > 0).collect();
        assert_eq!(non_empty.len(), 1);
        assert_eq!(non_empty[0].count, 1);
        assert!(non_empty[0].start <= 42.0 && 42.0 <= non_empty[0].end);
    }

    #[test]
    fn test_histogram_bins_cover_range() {
        let rows = five_rows();
        let bins = salary_histogram(&rows, 3);
        assert_eq!(bins.len(), 3);
        assert_close(bins[0].start, 50.0);
        assert_close(bins[2].end, 200.0);
        assert!(bins.iter().all(|b| (b.width() - 50.0).abs() < 1e-9));
        // [50,100): 50, 80 | [100,150): 100, 120 | [150,200]: 200
        let counts: Vec<usize> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 2, 1]);
        assert_eq!(counts.iter().sum::<usize>(), rows.len());
    }

    #[test]
    fn test_histogram_range_beyond_f64() {
        let rows = vec![
            record(2024, "senior", "full-time", "remote", "USA", "Analyst", -1e308),
            record(2024, "senior", "full-time", "remote", "USA", "Analyst", 1e308),
        ];
        let bins = salary_histogram(&rows, HISTOGRAM_BINS);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 2);
        assert_eq!((bins[0].start, bins[0].end), (-1e308, 1e308));
    }

    #[test]
    fn test_remote_distribution_sums_to_count() {
        let rows = five_rows();
        let dist = remote_mode_distribution(&rows);
        assert_eq!(dist["remote"], 2);
        assert_eq!(dist["hybrid"], 2);
        assert_eq!(dist["on-site"], 1);
        assert_eq!(dist.values().sum::<usize>(), summary_metrics(&rows).record_count);
    }

    #[test]
    fn test_snapshot_follows_selection() {
        let ds = Dataset::from_records(five_rows());
        let mut sel = FilterSelection::all(&ds);
        sel.set(FilterColumn::ResidenceCountry, [crate::data::model::FieldValue::from("USA")]);

        let snap = DashboardSnapshot::compute(&ds, &sel, DEFAULT_FEATURED_ROLE);
        assert_eq!(snap.view.len(), 4);
        assert_eq!(snap.metrics.record_count, 4);
        assert_eq!(snap.remote_modes.values().sum::<usize>(), 4);
        assert_eq!(snap.country_means.keys().collect::<Vec<_>>(), vec!["USA"]);
        assert_eq!(snap.featured_role, DEFAULT_FEATURED_ROLE);
    }
}
