use super::model::{AgeStateSummaryRecord, DistrictMonthRecord, IntelligenceRecord};

// ---------------------------------------------------------------------------
// State filter: exact-match subset of a table
// ---------------------------------------------------------------------------

/// A record carrying the shared `state` key.
pub trait StateKeyed {
    fn state(&self) -> &str;
}

impl StateKeyed for DistrictMonthRecord {
    fn state(&self) -> &str {
        &self.state
    }
}

impl StateKeyed for IntelligenceRecord {
    fn state(&self) -> &str {
        &self.state
    }
}

impl StateKeyed for AgeStateSummaryRecord {
    fn state(&self) -> &str {
        &self.state
    }
}

/// Rows whose `state` equals `state` exactly (case-sensitive, no trimming).
/// A state with no matches yields an empty subset, never an error; source
/// row order is preserved.
pub fn rows_for_state<T: StateKeyed + Clone>(rows: &[T], state: &str) -> Vec<T> {
    rows.iter()
        .filter(|r| r.state() == state)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(state: &str, district: &str) -> DistrictMonthRecord {
        DistrictMonthRecord {
            state: state.to_string(),
            district: district.to_string(),
            year: 2023,
            month: 1,
            enrolments: 1,
        }
    }

    #[test]
    fn returns_only_matching_rows() {
        let rows = vec![
            row("Karnataka", "Mysuru"),
            row("Goa", "North Goa"),
            row("Karnataka", "Udupi"),
        ];
        let subset = rows_for_state(&rows, "Karnataka");
        assert_eq!(subset.len(), 2);
        assert!(subset.iter().all(|r| r.state == "Karnataka"));
        // Source order preserved.
        assert_eq!(subset[0].district, "Mysuru");
        assert_eq!(subset[1].district, "Udupi");
    }

    #[test]
    fn unmatched_state_yields_empty_subset() {
        let rows = vec![row("Karnataka", "Mysuru")];
        assert!(rows_for_state(&rows, "Kerala").is_empty());
    }

    #[test]
    fn match_is_case_sensitive() {
        let rows = vec![row("Karnataka", "Mysuru")];
        assert!(rows_for_state(&rows, "karnataka").is_empty());
    }
}
