use std::collections::BTreeMap;

use super::model::{
    AgeGroup, AgeStateSummaryRecord, DistrictMonthRecord, IntelligenceRecord, RiskLevel,
};

// ---------------------------------------------------------------------------
// Monthly trend: group by (year, month), sum enrolments
// ---------------------------------------------------------------------------

/// One (year, month) group of the trend line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendPoint {
    pub year: i32,
    pub month: u32,
    pub total_enrolments: i64,
}

/// Sum enrolments per (year, month), ascending by (year, month). The key is
/// unique per group, so no tie-break is needed.
pub fn monthly_trend(rows: &[DistrictMonthRecord]) -> Vec<TrendPoint> {
    let mut totals: BTreeMap<(i32, u32), i64> = BTreeMap::new();
    for r in rows {
        *totals.entry((r.year, r.month)).or_default() += r.enrolments;
    }
    totals
        .into_iter()
        .map(|((year, month), total_enrolments)| TrendPoint {
            year,
            month,
            total_enrolments,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Risk distribution: district count per risk level
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskCount {
    pub level: RiskLevel,
    pub count: usize,
}

/// Count rows per distinct risk level, ordered by descending count with ties
/// broken by the level label ascending lexically, so equal inputs always
/// chart the same way. Levels absent from the input are absent from the
/// output.
pub fn risk_distribution(rows: &[IntelligenceRecord]) -> Vec<RiskCount> {
    let mut counts: BTreeMap<RiskLevel, usize> = BTreeMap::new();
    for r in rows {
        *counts.entry(r.risk_level).or_default() += 1;
    }
    let mut distribution: Vec<RiskCount> = counts
        .into_iter()
        .map(|(level, count)| RiskCount { level, count })
        .collect();
    distribution.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.level.label().cmp(b.level.label()))
    });
    distribution
}

// ---------------------------------------------------------------------------
// Age composition: melt the wide age columns to (group, value) rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeSlice {
    pub group: AgeGroup,
    pub enrolments: i64,
}

/// Wide-to-long reshape of the age summary. The table holds one row per
/// state, but multiple matching rows are summed rather than trusted. Zero
/// input rows melt to zero output rows.
pub fn age_composition(rows: &[AgeStateSummaryRecord]) -> Vec<AgeSlice> {
    if rows.is_empty() {
        return Vec::new();
    }
    let mut totals = [0i64; 3];
    for r in rows {
        totals[0] += r.age_0_5;
        totals[1] += r.age_5_17;
        totals[2] += r.age_18_greater;
    }
    AgeGroup::ALL
        .into_iter()
        .zip(totals)
        .map(|(group, enrolments)| AgeSlice { group, enrolments })
        .collect()
}

// ---------------------------------------------------------------------------
// High-risk detail: High rows projected for the table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct HighRiskRow {
    pub district: String,
    pub mean_enrolments: f64,
    pub volatility: f64,
    pub risk_score: f64,
}

/// Rows with `risk_level == High`, source order preserved, projected to the
/// four detail-table columns.
pub fn high_risk_districts(rows: &[IntelligenceRecord]) -> Vec<HighRiskRow> {
    rows.iter()
        .filter(|r| r.risk_level == RiskLevel::High)
        .map(|r| HighRiskRow {
            district: r.district.clone(),
            mean_enrolments: r.mean_enrolments,
            volatility: r.volatility,
            risk_score: r.risk_score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dm(district: &str, year: i32, month: u32, enrolments: i64) -> DistrictMonthRecord {
        DistrictMonthRecord {
            state: "Karnataka".to_string(),
            district: district.to_string(),
            year,
            month,
            enrolments,
        }
    }

    fn intel(district: &str, cluster: &str, risk_level: RiskLevel) -> IntelligenceRecord {
        IntelligenceRecord {
            state: "Karnataka".to_string(),
            district: district.to_string(),
            mean_enrolments: 100.0,
            volatility: 10.0,
            cluster: cluster.to_string(),
            risk_level,
            risk_score: 0.5,
        }
    }

    #[test]
    fn trend_sums_rows_sharing_a_month() {
        let rows = vec![dm("D1", 2023, 1, 100), dm("D1", 2023, 1, 50)];
        let trend = monthly_trend(&rows);
        assert_eq!(
            trend,
            vec![TrendPoint {
                year: 2023,
                month: 1,
                total_enrolments: 150
            }]
        );
    }

    #[test]
    fn trend_orders_by_year_then_month() {
        let rows = vec![
            dm("D1", 2024, 1, 10),
            dm("D1", 2023, 12, 20),
            dm("D2", 2023, 2, 30),
        ];
        let keys: Vec<(i32, u32)> = monthly_trend(&rows)
            .iter()
            .map(|p| (p.year, p.month))
            .collect();
        assert_eq!(keys, vec![(2023, 2), (2023, 12), (2024, 1)]);
    }

    #[test]
    fn trend_total_matches_input_sum() {
        let rows = vec![
            dm("D1", 2023, 1, 100),
            dm("D2", 2023, 1, 40),
            dm("D1", 2023, 2, 7),
        ];
        let grouped: i64 = monthly_trend(&rows).iter().map(|p| p.total_enrolments).sum();
        let raw: i64 = rows.iter().map(|r| r.enrolments).sum();
        assert_eq!(grouped, raw);
    }

    #[test]
    fn empty_input_yields_empty_trend() {
        assert!(monthly_trend(&[]).is_empty());
    }

    #[test]
    fn risk_distribution_counts_and_orders_by_count() {
        let rows = vec![
            intel("D1", "0", RiskLevel::High),
            intel("D2", "0", RiskLevel::Medium),
            intel("D3", "0", RiskLevel::High),
            intel("D4", "0", RiskLevel::Low),
            intel("D5", "0", RiskLevel::High),
            intel("D6", "0", RiskLevel::Medium),
        ];
        let distribution = risk_distribution(&rows);
        assert_eq!(
            distribution,
            vec![
                RiskCount { level: RiskLevel::High, count: 3 },
                RiskCount { level: RiskLevel::Medium, count: 2 },
                RiskCount { level: RiskLevel::Low, count: 1 },
            ]
        );
        let total: usize = distribution.iter().map(|c| c.count).sum();
        assert_eq!(total, rows.len());
    }

    #[test]
    fn risk_distribution_breaks_count_ties_lexically() {
        let rows = vec![
            intel("D1", "0", RiskLevel::Medium),
            intel("D2", "0", RiskLevel::Low),
            intel("D3", "0", RiskLevel::High),
        ];
        let levels: Vec<RiskLevel> = risk_distribution(&rows).iter().map(|c| c.level).collect();
        // All counts are 1; "High" < "Low" < "Medium".
        assert_eq!(levels, vec![RiskLevel::High, RiskLevel::Low, RiskLevel::Medium]);
    }

    #[test]
    fn risk_distribution_of_nothing_is_empty() {
        assert!(risk_distribution(&[]).is_empty());
    }

    #[test]
    fn age_composition_melts_one_row() {
        let rows = vec![AgeStateSummaryRecord {
            state: "X".to_string(),
            age_0_5: 10,
            age_5_17: 20,
            age_18_greater: 30,
        }];
        let slices = age_composition(&rows);
        let labeled: Vec<(&str, i64)> =
            slices.iter().map(|s| (s.group.label(), s.enrolments)).collect();
        assert_eq!(
            labeled,
            vec![("age_0_5", 10), ("age_5_17", 20), ("age_18_greater", 30)]
        );
        let total: i64 = slices.iter().map(|s| s.enrolments).sum();
        assert_eq!(total, 60);
    }

    #[test]
    fn age_composition_sums_duplicate_state_rows() {
        let row = AgeStateSummaryRecord {
            state: "X".to_string(),
            age_0_5: 10,
            age_5_17: 20,
            age_18_greater: 30,
        };
        let slices = age_composition(&[row.clone(), row]);
        let values: Vec<i64> = slices.iter().map(|s| s.enrolments).collect();
        assert_eq!(values, vec![20, 40, 60]);
    }

    #[test]
    fn age_composition_of_nothing_is_empty() {
        assert!(age_composition(&[]).is_empty());
    }

    #[test]
    fn high_risk_keeps_exactly_the_high_rows_in_order() {
        let rows = vec![
            intel("D1", "0", RiskLevel::High),
            intel("D2", "0", RiskLevel::Low),
            intel("D3", "0", RiskLevel::High),
        ];
        let detail = high_risk_districts(&rows);
        let districts: Vec<&str> = detail.iter().map(|r| r.district.as_str()).collect();
        assert_eq!(districts, vec!["D1", "D3"]);
    }

    #[test]
    fn no_high_rows_means_empty_detail() {
        let rows = vec![intel("D1", "0", RiskLevel::Low)];
        assert!(high_risk_districts(&rows).is_empty());
    }
}
