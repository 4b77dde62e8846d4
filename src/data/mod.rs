/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  district_month_features.csv / enrolment_intelligence.csv / age_state_summary.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse the three CSVs → Datasets
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  exact `state` match → per-table subsets
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  trend sum, risk counts, age melt, high-risk rows
///   └───────────┘
/// ```
///
/// The whole chain re-runs on every state selection; nothing here retains
/// state between runs.

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
