//! Run configuration.
//!
//! Everything the pipeline needs to know is carried in one explicit struct
//! handed to it at construction; there are no process-wide settings.

use std::path::PathBuf;

use crate::error::{GradingError, Result};

pub const DEFAULT_SSH_USER: &str = "ubuntu";
pub const DEFAULT_RUNNER: &str = "pytest -v";
pub const DEFAULT_ASSIGNMENT_EXT: &str = "py";
pub const DEFAULT_RESULTS_PATH: &str = "results/evaluation_results.json";

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct EvalConfig {
    /// User for the remote copy.
    pub ssh_user: String,
    /// Identity file handed to the transport.
    pub identity_file: PathBuf,
    /// Path pulled from every candidate machine.
    pub remote_path: String,
    /// Directory holding the reference tests, one `test_<assignment>.<ext>`
    /// file per assignment type.
    pub tests_dir: PathBuf,
    /// Extension of candidate-authored assignment files.
    pub assignment_ext: String,
    /// Runner command invoked inside each isolated working directory. Split
    /// shell-style, so quoting works: `"pytest -v -p no:cacheprovider"`.
    pub runner: String,
    /// Where the aggregated result set is written.
    pub results_path: PathBuf,
}

impl EvalConfig {
    /// Reference-test file name for an assignment stem, by the
    /// `test_<assignment>` naming convention.
    pub fn test_file_name(&self, assignment_stem: &str) -> String {
        format!("test_{assignment_stem}.{}", self.assignment_ext)
    }

    pub fn reference_test_path(&self, assignment_stem: &str) -> PathBuf {
        self.tests_dir.join(self.test_file_name(assignment_stem))
    }

    /// Name of the subdirectory the remote copy materializes under the
    /// staging path: the last component of the remote path.
    pub fn submission_dir_name(&self) -> &str {
        self.remote_path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or("")
    }

    /// Splits the runner command into argv.
    pub fn runner_argv(&self) -> Result<Vec<String>> {
        match shlex::split(&self.runner) {
            Some(argv) if !argv.is_empty() => Ok(argv),
            _ => Err(GradingError::Config(format!(
                "runner command {:?} is empty or unbalanced",
                self.runner
            ))),
        }
    }
}

/// Convenience for assembling a config in tests and simple callers.
pub fn default_identity_file() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(".ssh")
        .join("id_rsa")
}

#[cfg(test)]
pub(crate) fn test_config(
    tests_dir: &std::path::Path,
    results_path: &std::path::Path,
    runner: String,
) -> EvalConfig {
    EvalConfig {
        ssh_user: DEFAULT_SSH_USER.to_string(),
        identity_file: default_identity_file(),
        remote_path: "/home/ubuntu/submission".to_string(),
        tests_dir: tests_dir.to_path_buf(),
        assignment_ext: DEFAULT_ASSIGNMENT_EXT.to_string(),
        runner,
        results_path: results_path.to_path_buf(),
    }
}
