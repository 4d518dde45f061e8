//! The outcome data model and the run's sole persisted artifact.
//!
//! Every value here is created once and never mutated afterwards; the result
//! file is written a single time, after the whole roster has been processed.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{error::Result, report::TestCounts, score};

/// What happened when one assignment file was graded.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// The suite ran and reported counts. The suite itself may still have
    /// failing cases; that shows in `passed` vs `total`, not here.
    Success,
    /// No reference test matches this assignment. Not an error: unexpected
    /// submission content is skipped.
    NoTest,
    /// The runner finished without leaving a report artifact.
    Failed,
    /// A report artifact exists but lacks the expected summary fields.
    MalformedReport,
    /// Something else broke while grading this one assignment.
    Error,
}

/// Structured record of grading one assignment file for one candidate.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct AssignmentOutcome {
    pub assignment_name: String,
    pub status: AssignmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    pub score: f64,
    /// Captured process text, kept verbatim for audit.
    pub output: String,
}

impl AssignmentOutcome {
    pub fn success(assignment_name: String, counts: TestCounts, stdout: String) -> Self {
        Self {
            assignment_name,
            status: AssignmentStatus::Success,
            passed: Some(counts.passed),
            total: Some(counts.total),
            score: score::score(counts.passed),
            output: stdout,
        }
    }

    pub fn no_test(assignment_name: String) -> Self {
        Self::zero(assignment_name, AssignmentStatus::NoTest, String::new())
    }

    pub fn failed(assignment_name: String, diagnostics: String) -> Self {
        Self::zero(assignment_name, AssignmentStatus::Failed, diagnostics)
    }

    pub fn malformed_report(assignment_name: String, diagnostics: String) -> Self {
        Self::zero(assignment_name, AssignmentStatus::MalformedReport, diagnostics)
    }

    pub fn errored(assignment_name: String, message: String) -> Self {
        Self::zero(assignment_name, AssignmentStatus::Error, message)
    }

    fn zero(assignment_name: String, status: AssignmentStatus, output: String) -> Self {
        Self {
            assignment_name,
            status,
            passed: None,
            total: None,
            score: 0.0,
            output,
        }
    }
}

/// One entry per roster row, in roster order. `error` is set only when the
/// whole candidate pipeline aborted before producing any outcome.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct CandidateResult {
    pub candidate_id: String,
    pub results: Vec<AssignmentOutcome>,
    pub total_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CandidateResult {
    pub fn evaluated(candidate_id: String, results: Vec<AssignmentOutcome>) -> Self {
        let total_score = results.iter().map(|outcome| outcome.score).sum();
        Self {
            candidate_id,
            results,
            total_score,
            error: None,
        }
    }

    pub fn aborted(candidate_id: String, error: String) -> Self {
        Self {
            candidate_id,
            results: vec![],
            total_score: 0.0,
            error: Some(error),
        }
    }
}

/// Persists the ordered result set as pretty-printed JSON, creating the
/// parent directory if needed.
pub fn write_results(path: &Path, results: &[CandidateResult]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(results)?;
    fs::write(path, json)?;
    Ok(())
}
