use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::model::Datasets;

// ---------------------------------------------------------------------------
// Fixed input file names
// ---------------------------------------------------------------------------

pub const DISTRICT_MONTH_FILE: &str = "district_month_features.csv";
pub const INTELLIGENCE_FILE: &str = "enrolment_intelligence.csv";
pub const AGE_SUMMARY_FILE: &str = "age_state_summary.csv";

/// Header-level schema problem, detected before any row is deserialized.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("{file}: missing required column '{column}'")]
    MissingColumn { file: String, column: String },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// The `output` directory next to the executable, falling back to the
/// current working directory when the executable path is unavailable.
pub fn default_data_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("output")
}

/// Load the three analytics tables from `data_dir`. One-shot: any missing
/// file, missing column, or malformed row fails the whole load.
pub fn load_dir(data_dir: &Path) -> Result<Datasets> {
    let district_month = load_table(
        &data_dir.join(DISTRICT_MONTH_FILE),
        &["state", "district", "year", "month", "enrolments"],
    )?;
    let intelligence = load_table(
        &data_dir.join(INTELLIGENCE_FILE),
        &[
            "state",
            "district",
            "mean_enrolments",
            "volatility",
            "cluster",
            "risk_level",
            "risk_score",
        ],
    )?;
    let age_summary = load_table(
        &data_dir.join(AGE_SUMMARY_FILE),
        &["state", "age_0_5", "age_5_17", "age_18_greater"],
    )?;

    Ok(Datasets {
        district_month,
        intelligence,
        age_summary,
    })
}

// ---------------------------------------------------------------------------
// CSV plumbing
// ---------------------------------------------------------------------------

/// Read one comma-delimited, header-row CSV into typed records.
///
/// The header is checked for every `required` column up front so a renamed
/// or dropped column surfaces as a single clear error instead of a
/// per-row deserialization failure. Columns beyond the required set are
/// carried by the file but ignored here.
fn load_table<T: DeserializeOwned>(path: &Path, required: &[&str]) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("reading header row of {}", path.display()))?
        .clone();

    for &column in required {
        if !headers.iter().any(|h| h == column) {
            return Err(SchemaError::MissingColumn {
                file: path.display().to_string(),
                column: column.to_string(),
            }
            .into());
        }
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.deserialize().enumerate() {
        // row_no is 0-based over data rows; +2 gives the 1-based file line.
        let row: T =
            result.with_context(|| format!("{} line {}", path.display(), row_no + 2))?;
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISTRICT_MONTH_CSV: &str = "\
state,district,year,month,enrolments
Karnataka,Bengaluru Urban,2023,1,1200
Karnataka,Mysuru,2023,2,480
Goa,North Goa,2023,1,90
";

    const INTELLIGENCE_CSV: &str = "\
state,district,mean_enrolments,volatility,cluster,risk_level,risk_score
Karnataka,Bengaluru Urban,840.0,120.5,0,High,0.91
Karnataka,Mysuru,310.0,22.0,1,Low,0.12
Goa,North Goa,88.0,9.5,1,Medium,0.44
";

    const AGE_SUMMARY_CSV: &str = "\
state,age_0_5,age_5_17,age_18_greater
Karnataka,4100,9800,22100
Goa,310,720,1600
";

    fn write_dir(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        for (name, body) in files {
            std::fs::write(dir.path().join(name), body).expect("write fixture");
        }
        dir
    }

    fn full_dir() -> tempfile::TempDir {
        write_dir(&[
            (DISTRICT_MONTH_FILE, DISTRICT_MONTH_CSV),
            (INTELLIGENCE_FILE, INTELLIGENCE_CSV),
            (AGE_SUMMARY_FILE, AGE_SUMMARY_CSV),
        ])
    }

    #[test]
    fn loads_all_three_tables_with_typed_fields() {
        let dir = full_dir();
        let datasets = load_dir(dir.path()).expect("load");

        assert_eq!(datasets.district_month.len(), 3);
        assert_eq!(datasets.intelligence.len(), 3);
        assert_eq!(datasets.age_summary.len(), 2);

        let first = &datasets.district_month[0];
        assert_eq!(first.state, "Karnataka");
        assert_eq!((first.year, first.month, first.enrolments), (2023, 1, 1200));

        let bengaluru = &datasets.intelligence[0];
        assert_eq!(bengaluru.risk_level, crate::data::model::RiskLevel::High);
        assert_eq!(bengaluru.cluster, "0");
        assert!((bengaluru.volatility - 120.5).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = write_dir(&[
            (DISTRICT_MONTH_FILE, DISTRICT_MONTH_CSV),
            (INTELLIGENCE_FILE, INTELLIGENCE_CSV),
        ]);
        let err = load_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains(AGE_SUMMARY_FILE));
    }

    #[test]
    fn missing_column_names_the_column() {
        let dir = write_dir(&[
            (DISTRICT_MONTH_FILE, "state,district,year,month\nGoa,North Goa,2023,1\n"),
            (INTELLIGENCE_FILE, INTELLIGENCE_CSV),
            (AGE_SUMMARY_FILE, AGE_SUMMARY_CSV),
        ]);
        let err = load_dir(dir.path()).unwrap_err();
        let schema = err.downcast_ref::<SchemaError>().expect("schema error");
        let SchemaError::MissingColumn { column, .. } = schema;
        assert_eq!(column, "enrolments");
    }

    #[test]
    fn extra_columns_are_ignored() {
        let dir = write_dir(&[
            (
                DISTRICT_MONTH_FILE,
                "state,district,year,month,enrolments,rolling_mean\n\
                 Karnataka,Mysuru,2023,2,480,455.0\n",
            ),
            (INTELLIGENCE_FILE, INTELLIGENCE_CSV),
            (AGE_SUMMARY_FILE, AGE_SUMMARY_CSV),
        ]);
        let datasets = load_dir(dir.path()).expect("load");
        assert_eq!(datasets.district_month.len(), 1);
        assert_eq!(datasets.district_month[0].enrolments, 480);
    }

    #[test]
    fn malformed_row_reports_file_and_line() {
        let dir = write_dir(&[
            (
                DISTRICT_MONTH_FILE,
                "state,district,year,month,enrolments\nKarnataka,Mysuru,2023,two,480\n",
            ),
            (INTELLIGENCE_FILE, INTELLIGENCE_CSV),
            (AGE_SUMMARY_FILE, AGE_SUMMARY_CSV),
        ]);
        let err = load_dir(dir.path()).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains(DISTRICT_MONTH_FILE));
        assert!(message.contains("line 2"));
    }
}
