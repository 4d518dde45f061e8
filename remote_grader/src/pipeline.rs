//! Top-level orchestration: fetch, evaluate and score every candidate on the
//! roster, strictly sequentially.
//!
//! Per-candidate failures are caught at the candidate boundary and recorded
//! as an aborted result; nothing that happens during one candidate's turn can
//! affect another's. The result set is persisted once, only after the whole
//! roster loop completes.

use std::path::Path;

use log::{error, info};
use tempfile::TempDir;

use crate::{
    config::EvalConfig,
    error::{GradingError, Result},
    evaluator::CandidateEvaluator,
    fetch::Fetcher,
    results::{self, CandidateResult},
    roster::CandidateRecord,
    score,
};

pub struct Pipeline<'a, F: Fetcher> {
    config: &'a EvalConfig,
    fetcher: F,
}

impl<'a, F: Fetcher> Pipeline<'a, F> {
    pub fn new(config: &'a EvalConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    /// Processes the roster in order. Every entry yields exactly one result,
    /// evaluated or aborted; the aggregate is written to the configured
    /// results path before returning.
    ///
    /// External calls block with no timeout, so a hung host or hung suite
    /// stalls the batch.
    /// TODO (enhance): put a deadline on the fetch and runner subprocesses.
    pub fn run(&self, roster: &[CandidateRecord]) -> Result<Vec<CandidateResult>> {
        let staging = TempDir::new()?;
        let mut results = Vec::with_capacity(roster.len());

        for candidate in roster {
            let result = match self.run_candidate(candidate, staging.path()) {
                Ok(result) => result,
                Err(err) => {
                    let message = err.to_string();
                    error!(
                        "{}",
                        GradingError::Candidate {
                            candidate_id: candidate.candidate_id.clone(),
                            source: Box::new(err),
                        }
                    );
                    CandidateResult::aborted(candidate.candidate_id.clone(), message)
                }
            };
            results.push(result);
        }

        results::write_results(&self.config.results_path, &results)?;

        info!("Evaluation summary:");
        for result in &results {
            info!(
                "{}: {}/{}",
                result.candidate_id,
                result.total_score,
                score::NOMINAL_MAX
            );
        }
        Ok(results)
    }

    fn run_candidate(
        &self,
        candidate: &CandidateRecord,
        staging_root: &Path,
    ) -> Result<CandidateResult> {
        let dest = staging_root.join(&candidate.candidate_id);
        self.fetcher
            .fetch(&candidate.host_address, &self.config.remote_path, &dest)?;

        let submission_dir = dest.join(self.config.submission_dir_name());
        if !submission_dir.is_dir() {
            return Err(GradingError::MissingSubmission(submission_dir));
        }

        CandidateEvaluator::new(self.config).evaluate(&candidate.candidate_id, &submission_dir)
    }
}
