use std::fs;
use std::path::Path;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Deterministic sample data for the dashboard: the three analytics CSVs
// under ./output, generated from a seeded PRNG so reruns are identical.
// ---------------------------------------------------------------------------

/// Minimal deterministic PRNG (PCG-style LCG with output mixing).
struct SampleRng {
    state: u64,
}

impl SampleRng {
    fn new(seed: u64) -> Self {
        SampleRng {
            state: seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407),
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let x = self.state;
        (x ^ (x >> 31)).wrapping_mul(0x9e3779b97f4a7c15)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

#[derive(Serialize)]
struct DistrictMonthRow<'a> {
    state: &'a str,
    district: &'a str,
    year: i32,
    month: u32,
    enrolments: i64,
}

#[derive(Serialize)]
struct IntelligenceRow<'a> {
    state: &'a str,
    district: &'a str,
    mean_enrolments: f64,
    volatility: f64,
    cluster: u32,
    risk_level: &'static str,
    risk_score: f64,
}

#[derive(Serialize)]
struct AgeSummaryRow<'a> {
    state: &'a str,
    age_0_5: i64,
    age_5_17: i64,
    age_18_greater: i64,
}

const STATES: &[(&str, &[&str])] = &[
    (
        "Karnataka",
        &["Bengaluru Urban", "Mysuru", "Belagavi", "Kalaburagi"],
    ),
    ("Maharashtra", &["Mumbai", "Pune", "Nagpur", "Nashik"]),
    ("Bihar", &["Patna", "Gaya", "Muzaffarpur"]),
    ("Goa", &["North Goa", "South Goa"]),
];

const YEARS: [i32; 2] = [2022, 2023];

fn main() {
    let mut rng = SampleRng::new(42);

    let out_dir = Path::new("output");
    fs::create_dir_all(out_dir).expect("creating output directory");

    // ---- district_month_features.csv + the per-district series ----
    let mut month_writer = csv::Writer::from_path(out_dir.join("district_month_features.csv"))
        .expect("creating district_month_features.csv");

    // (state, district, monthly series) for the derived tables below
    let mut series: Vec<(&str, &str, Vec<i64>)> = Vec::new();

    for &(state, districts) in STATES {
        for &district in districts {
            let base = 200.0 + rng.next_f64() * 2800.0;
            let noise = 0.05 + rng.next_f64() * 0.30;

            let mut monthly = Vec::with_capacity(YEARS.len() * 12);
            for year in YEARS {
                for month in 1..=12u32 {
                    // Mild festival-season bump towards the end of the year.
                    let seasonal = 1.0 + 0.15 * ((month as f64 / 12.0) * std::f64::consts::PI).sin();
                    let value = rng.gauss(base * seasonal, base * noise).max(0.0) as i64;
                    month_writer
                        .serialize(DistrictMonthRow {
                            state,
                            district,
                            year,
                            month,
                            enrolments: value,
                        })
                        .expect("writing district-month row");
                    monthly.push(value);
                }
            }
            series.push((state, district, monthly));
        }
    }
    month_writer.flush().expect("flushing district_month_features.csv");

    // ---- enrolment_intelligence.csv, derived from the series ----
    let stats: Vec<(&str, &str, f64, f64)> = series
        .iter()
        .map(|(state, district, monthly)| {
            let mean = monthly.iter().sum::<i64>() as f64 / monthly.len() as f64;
            let variance = monthly
                .iter()
                .map(|&v| (v as f64 - mean).powi(2))
                .sum::<f64>()
                / monthly.len() as f64;
            (*state, *district, mean, variance.sqrt())
        })
        .collect();

    // Cluster by mean-enrolment tercile across all districts.
    let mut means: Vec<f64> = stats.iter().map(|s| s.2).collect();
    means.sort_by(f64::total_cmp);
    let t1 = means[means.len() / 3];
    let t2 = means[means.len() * 2 / 3];

    let max_ratio = stats
        .iter()
        .map(|s| s.3 / s.2)
        .fold(f64::MIN, f64::max)
        .max(1e-9);

    let mut intel_writer = csv::Writer::from_path(out_dir.join("enrolment_intelligence.csv"))
        .expect("creating enrolment_intelligence.csv");

    for &(state, district, mean, volatility) in &stats {
        let cluster = if mean < t1 {
            0
        } else if mean < t2 {
            1
        } else {
            2
        };
        let risk_score = (volatility / mean) / max_ratio;
        let risk_level = if risk_score >= 0.66 {
            "High"
        } else if risk_score >= 0.33 {
            "Medium"
        } else {
            "Low"
        };
        intel_writer
            .serialize(IntelligenceRow {
                state,
                district,
                mean_enrolments: (mean * 10.0).round() / 10.0,
                volatility: (volatility * 1000.0).round() / 1000.0,
                cluster,
                risk_level,
                risk_score: (risk_score * 1000.0).round() / 1000.0,
            })
            .expect("writing intelligence row");
    }
    intel_writer.flush().expect("flushing enrolment_intelligence.csv");

    // ---- age_state_summary.csv: state totals split into age buckets ----
    let mut age_writer = csv::Writer::from_path(out_dir.join("age_state_summary.csv"))
        .expect("creating age_state_summary.csv");

    for &(state, _) in STATES {
        let total: i64 = series
            .iter()
            .filter(|(s, _, _)| *s == state)
            .flat_map(|(_, _, monthly)| monthly.iter())
            .sum();
        let young = (total as f64 * (0.12 + rng.next_f64() * 0.06)) as i64;
        let school = (total as f64 * (0.25 + rng.next_f64() * 0.10)) as i64;
        age_writer
            .serialize(AgeSummaryRow {
                state,
                age_0_5: young,
                age_5_17: school,
                age_18_greater: total - young - school,
            })
            .expect("writing age summary row");
    }
    age_writer.flush().expect("flushing age_state_summary.csv");

    let district_count: usize = STATES.iter().map(|(_, d)| d.len()).sum();
    println!(
        "Wrote {} district-month rows, {} districts, {} states to {}",
        district_count * YEARS.len() * 12,
        district_count,
        STATES.len(),
        out_dir.display()
    );
}
