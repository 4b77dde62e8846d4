use std::path::PathBuf;

use crate::color::CategoryColors;
use crate::data::aggregate::{
    age_composition, high_risk_districts, monthly_trend, risk_distribution, AgeSlice, HighRiskRow,
    RiskCount, TrendPoint,
};
use crate::data::filter::rows_for_state;
use crate::data::loader;
use crate::data::model::{Datasets, IntelligenceRecord};

// ---------------------------------------------------------------------------
// DashboardView – everything derived for one selected state
// ---------------------------------------------------------------------------

/// The aggregated inputs behind the five dashboard artifacts. A pure
/// function of (loaded tables, selected state); rendering reads this
/// without recomputing anything.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub trend: Vec<TrendPoint>,
    pub risk: Vec<RiskCount>,
    /// Filtered intelligence rows, plotted directly as the cluster scatter.
    pub clusters: Vec<IntelligenceRecord>,
    pub ages: Vec<AgeSlice>,
    pub high_risk: Vec<HighRiskRow>,
}

impl DashboardView {
    /// Filter each table to `state`, then aggregate. Tables without a match
    /// produce empty sections; the others still populate.
    pub fn build(datasets: &Datasets, state: &str) -> Self {
        let district_month = rows_for_state(&datasets.district_month, state);
        let intelligence = rows_for_state(&datasets.intelligence, state);
        let age_summary = rows_for_state(&datasets.age_summary, state);

        DashboardView {
            trend: monthly_trend(&district_month),
            risk: risk_distribution(&intelligence),
            ages: age_composition(&age_summary),
            high_risk: high_risk_districts(&intelligence),
            clusters: intelligence,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Directory holding the three CSVs.
    pub data_dir: PathBuf,

    /// Loaded tables (None until the first successful load).
    pub datasets: Option<Datasets>,

    /// Sorted distinct states across the loaded tables.
    pub states: Vec<String>,

    /// Currently selected state (None only when nothing is loaded).
    pub selected_state: Option<String>,

    /// Aggregated view for the selected state.
    pub view: Option<DashboardView>,

    /// Cluster label → colour, built from the whole intelligence table so
    /// a cluster keeps its colour across state selections.
    pub cluster_colors: CategoryColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            data_dir: loader::default_data_dir(),
            datasets: None,
            states: Vec::new(),
            selected_state: None,
            view: None,
            cluster_colors: CategoryColors::default(),
            status_message: None,
        }
    }
}

impl AppState {
    /// One full render cycle: re-read the CSVs from `data_dir` and rebuild
    /// the view for `selected` (or the first available state). Runs at
    /// startup and on every selection or directory change; a failed load
    /// drops the stale view and surfaces the error.
    pub fn run_pipeline(&mut self, selected: Option<String>) {
        match loader::load_dir(&self.data_dir) {
            Ok(datasets) => {
                log::info!(
                    "loaded {} district-month rows, {} intelligence rows, {} age rows from {}",
                    datasets.district_month.len(),
                    datasets.intelligence.len(),
                    datasets.age_summary.len(),
                    self.data_dir.display()
                );
                self.set_datasets(datasets, selected);
            }
            Err(e) => {
                log::error!("failed to load data: {e:#}");
                self.datasets = None;
                self.states.clear();
                self.selected_state = None;
                self.view = None;
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    fn set_datasets(&mut self, datasets: Datasets, selected: Option<String>) {
        self.states = datasets.state_list();
        self.cluster_colors = CategoryColors::new(&datasets.cluster_labels());

        // Keep the requested state only if it still exists in the data.
        let selected = selected
            .filter(|s| self.states.iter().any(|known| known == s))
            .or_else(|| self.states.first().cloned());

        self.view = selected
            .as_deref()
            .map(|s| DashboardView::build(&datasets, s));
        self.selected_state = selected;
        self.datasets = Some(datasets);
        self.status_message = None;
    }

    /// Selection change from the sidebar.
    pub fn select_state(&mut self, state: String) {
        self.run_pipeline(Some(state));
    }

    /// Point the app at a different data directory.
    pub fn set_data_dir(&mut self, dir: PathBuf) {
        self.data_dir = dir;
        self.run_pipeline(None);
    }

    /// Re-run the current cycle without changing the selection.
    pub fn reload(&mut self) {
        let selected = self.selected_state.clone();
        self.run_pipeline(selected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{AgeStateSummaryRecord, DistrictMonthRecord, RiskLevel};

    fn datasets() -> Datasets {
        Datasets {
            district_month: vec![
                DistrictMonthRecord {
                    state: "Karnataka".to_string(),
                    district: "Mysuru".to_string(),
                    year: 2023,
                    month: 1,
                    enrolments: 100,
                },
                DistrictMonthRecord {
                    state: "Goa".to_string(),
                    district: "North Goa".to_string(),
                    year: 2023,
                    month: 1,
                    enrolments: 40,
                },
            ],
            intelligence: vec![IntelligenceRecord {
                state: "Goa".to_string(),
                district: "North Goa".to_string(),
                mean_enrolments: 40.0,
                volatility: 4.0,
                cluster: "0".to_string(),
                risk_level: RiskLevel::High,
                risk_score: 0.8,
            }],
            age_summary: vec![AgeStateSummaryRecord {
                state: "Karnataka".to_string(),
                age_0_5: 10,
                age_5_17: 20,
                age_18_greater: 30,
            }],
        }
    }

    #[test]
    fn view_scopes_every_section_to_the_state() {
        let view = DashboardView::build(&datasets(), "Goa");
        assert!(view.trend.iter().all(|p| p.total_enrolments == 40));
        assert_eq!(view.clusters.len(), 1);
        assert_eq!(view.high_risk.len(), 1);
        assert_eq!(view.high_risk[0].district, "North Goa");
        // Goa has no age summary row: that section is empty, others are not.
        assert!(view.ages.is_empty());
    }

    #[test]
    fn state_missing_from_intelligence_renders_empty_risk_sections() {
        let view = DashboardView::build(&datasets(), "Karnataka");
        assert_eq!(view.trend.len(), 1);
        assert_eq!(view.ages.len(), 3);
        assert!(view.risk.is_empty());
        assert!(view.clusters.is_empty());
        assert!(view.high_risk.is_empty());
    }

    #[test]
    fn unknown_state_yields_a_fully_empty_view() {
        let view = DashboardView::build(&datasets(), "Kerala");
        assert!(view.trend.is_empty());
        assert!(view.risk.is_empty());
        assert!(view.clusters.is_empty());
        assert!(view.ages.is_empty());
        assert!(view.high_risk.is_empty());
    }
}
