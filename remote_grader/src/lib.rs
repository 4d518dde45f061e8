//! Grading automation over remote machines.
//!
//! Pulls each candidate's submission from its host, stages every assignment
//! file with its matching reference test in an isolated working directory,
//! runs the external test suite there, and aggregates pass/fail counts into
//! scores. One run produces a single persisted result set with exactly one
//! entry per roster candidate.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod fetch;
pub mod pipeline;
pub mod report;
pub mod results;
pub mod roster;
pub mod score;
pub mod workspace;

pub use config::EvalConfig;
pub use error::GradingError;
pub use fetch::{Fetcher, ScpFetcher};
pub use pipeline::Pipeline;
pub use results::{AssignmentOutcome, AssignmentStatus, CandidateResult};
pub use roster::{CandidateRecord, load_roster};
