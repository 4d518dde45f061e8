use std::{io, path::PathBuf};

use thiserror::Error;

/// Everything that can go wrong while grading.
///
/// Assignment-level failures are recovered inside `CandidateEvaluator` and
/// turned into an outcome status; candidate-level failures are recovered at
/// the pipeline boundary. Only roster and setup failures abort a run.
#[derive(Debug, Error)]
pub enum GradingError {
    /// The remote copy step failed (auth, unreachable host, missing path).
    #[error("fetch from {host} failed: {reason}")]
    Fetch { host: String, reason: String },

    /// The fetched tree lacks the expected submission subdirectory. Distinct
    /// from a transport-level fetch failure.
    #[error("no submission directory at {}", .0.display())]
    MissingSubmission(PathBuf),

    /// The test run finished but produced no report artifact on disk.
    #[error("test run produced no report at {}", .0.display())]
    MissingReport(PathBuf),

    /// A report artifact exists but does not have the promised shape.
    #[error("malformed test report: {0}")]
    MalformedReport(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("roster: {0}")]
    Roster(#[from] csv::Error),

    #[error("serializing results: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    /// Catch-all wrapper tying an error to the candidate whose turn it
    /// interrupted.
    #[error("candidate {candidate_id}: {source}")]
    Candidate {
        candidate_id: String,
        #[source]
        source: Box<GradingError>,
    },
}

pub type Result<T> = std::result::Result<T, GradingError>;
