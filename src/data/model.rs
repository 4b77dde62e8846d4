use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RiskLevel – categorical district risk label assigned by upstream analysis
// ---------------------------------------------------------------------------

/// Risk label carried by `enrolment_intelligence.csv`. Any other string in
/// the `risk_level` column is a load error, not a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// AgeGroup – the three wide columns of the age summary table
// ---------------------------------------------------------------------------

/// Age bucket labels, named exactly after the source columns so melted
/// output stays comparable with the upstream export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeGroup {
    Age0To5,
    Age5To17,
    Age18Plus,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 3] = [AgeGroup::Age0To5, AgeGroup::Age5To17, AgeGroup::Age18Plus];

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Age0To5 => "age_0_5",
            AgeGroup::Age5To17 => "age_5_17",
            AgeGroup::Age18Plus => "age_18_greater",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Record types – one struct per source table
// ---------------------------------------------------------------------------

/// One row of `district_month_features.csv`: one (district, year, month).
/// Extra feature columns in the file are ignored on deserialization.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DistrictMonthRecord {
    pub state: String,
    pub district: String,
    pub year: i32,
    pub month: u32,
    pub enrolments: i64,
}

/// One row of `enrolment_intelligence.csv`: one district, with the
/// upstream-computed behaviour metrics and risk assessment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IntelligenceRecord {
    pub state: String,
    pub district: String,
    pub mean_enrolments: f64,
    pub volatility: f64,
    /// Cluster label kept as text; the upstream export writes plain ids.
    pub cluster: String,
    pub risk_level: RiskLevel,
    pub risk_score: f64,
}

/// One row of `age_state_summary.csv`: one state, wide age-bucket counts.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgeStateSummaryRecord {
    pub state: String,
    pub age_0_5: i64,
    pub age_5_17: i64,
    pub age_18_greater: i64,
}

// ---------------------------------------------------------------------------
// Datasets – the three loaded tables
// ---------------------------------------------------------------------------

/// The full set of loaded tables for one render cycle.
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub district_month: Vec<DistrictMonthRecord>,
    pub intelligence: Vec<IntelligenceRecord>,
    pub age_summary: Vec<AgeStateSummaryRecord>,
}

impl Datasets {
    /// Sorted distinct `state` values across all three tables. Drives the
    /// state selector; the union means a state present in only one table is
    /// still selectable and its other outputs render empty.
    pub fn state_list(&self) -> Vec<String> {
        let mut states: BTreeSet<&str> = BTreeSet::new();
        states.extend(self.district_month.iter().map(|r| r.state.as_str()));
        states.extend(self.intelligence.iter().map(|r| r.state.as_str()));
        states.extend(self.age_summary.iter().map(|r| r.state.as_str()));
        states.into_iter().map(str::to_owned).collect()
    }

    /// Sorted distinct cluster labels, for building the scatter color map.
    pub fn cluster_labels(&self) -> BTreeSet<String> {
        self.intelligence
            .iter()
            .map(|r| r.cluster.clone())
            .collect()
    }
}
