/// Data layer: core types, loading, filtering and aggregation.
///
/// Nothing in here knows about egui; the UI only consumes plain values.
///
/// Architecture:
/// ```text
///  URL / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch + parse → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<SalaryRecord>, filter option lists
///   └──────────┘
///        │   FilterSelection
///        ▼
///   ┌──────────┐
///   │  filter   │  membership predicates → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  metrics, top roles, histogram, counts, per-country means
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
