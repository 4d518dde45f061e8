//! Reads the machine-readable report left behind by the test runner and
//! extracts the pass/total counts.
//!
//! A missing artifact and a present-but-wrong-shaped artifact are different
//! situations and map to different errors: the first means the run never got
//! far enough to report, the second means the runner spoke but not in the
//! agreed format.

use std::{fs, path::Path};

use serde_json::Value;

use crate::error::{GradingError, Result};

/// File the runner is asked to leave its report in, relative to the isolated
/// working directory.
pub const REPORT_FILE: &str = "report.json";

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct TestCounts {
    pub passed: u64,
    pub total: u64,
}

/// Extracts `summary.passed` and `summary.total` from a parsed report.
pub fn parse_summary(report: &Value) -> Result<TestCounts> {
    let summary = report
        .get("summary")
        .ok_or_else(|| GradingError::MalformedReport("missing 'summary' object".to_string()))?;
    let passed = integer_field(summary, "passed")?;
    let total = integer_field(summary, "total")?;
    Ok(TestCounts { passed, total })
}

fn integer_field(summary: &Value, name: &str) -> Result<u64> {
    summary.get(name).and_then(Value::as_u64).ok_or_else(|| {
        GradingError::MalformedReport(format!("'summary.{name}' missing or not an integer"))
    })
}

/// Loads the report artifact at `path`.
///
/// An absent file is `MissingReport`; a file that is not valid JSON is
/// classified as malformed, same as one lacking the summary fields.
pub fn load(path: &Path) -> Result<TestCounts> {
    if !path.exists() {
        return Err(GradingError::MissingReport(path.to_path_buf()));
    }
    let raw = fs::read_to_string(path)?;
    let report: Value =
        serde_json::from_str(&raw).map_err(|err| GradingError::MalformedReport(err.to_string()))?;
    parse_summary(&report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod parse_summary_tests {
        use super::*;

        #[test]
        fn should_extract_counts() {
            let report = json!({"summary": {"passed": 2, "total": 2}, "duration": 0.3});
            assert_eq!(
                parse_summary(&report).unwrap(),
                TestCounts {
                    passed: 2,
                    total: 2
                }
            );
        }

        #[test]
        fn should_reject_a_report_without_summary() {
            let report = json!({"tests": []});
            assert!(matches!(
                parse_summary(&report),
                Err(GradingError::MalformedReport(_))
            ));
        }

        #[test]
        fn should_reject_non_integer_counts() {
            let report = json!({"summary": {"passed": "2", "total": 2}});
            assert!(matches!(
                parse_summary(&report),
                Err(GradingError::MalformedReport(_))
            ));

            let report = json!({"summary": {"passed": 2, "total": -1}});
            assert!(matches!(
                parse_summary(&report),
                Err(GradingError::MalformedReport(_))
            ));
        }

        #[test]
        fn should_reject_a_summary_missing_one_field() {
            let report = json!({"summary": {"total": 4}});
            assert!(matches!(
                parse_summary(&report),
                Err(GradingError::MalformedReport(_))
            ));
        }
    }

    mod load_tests {
        use super::*;
        use std::fs;

        #[test_log::test]
        fn should_load_a_valid_report_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join(REPORT_FILE);
            fs::write(&path, r#"{"summary": {"passed": 3, "total": 4}}"#).unwrap();

            assert_eq!(
                load(&path).unwrap(),
                TestCounts {
                    passed: 3,
                    total: 4
                }
            );
        }

        #[test_log::test]
        fn should_distinguish_an_absent_report() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join(REPORT_FILE);

            assert!(matches!(load(&path), Err(GradingError::MissingReport(_))));
        }

        #[test_log::test]
        fn should_treat_invalid_json_as_malformed() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join(REPORT_FILE);
            fs::write(&path, "=== 2 passed in 0.12s ===").unwrap();

            assert!(matches!(load(&path), Err(GradingError::MalformedReport(_))));
        }
    }
}
