//! Invokes the external test runner inside an isolated working directory.

use std::{path::Path, process::Command};

use log::{debug, info};

use crate::{
    config::EvalConfig,
    error::{GradingError, Result},
    report,
};

/// Captured output of one runner invocation. A non-zero exit is an expected
/// outcome here (a failing suite), not a pipeline defect.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: Option<i32>,
}

/// Runs the configured suite runner with the workspace as working directory,
/// asking it to drop its report at [`report::REPORT_FILE`]. Blocks until the
/// runner finishes.
pub fn run_suite(config: &EvalConfig, workdir: &Path, test_rel_path: &Path) -> Result<RunOutput> {
    let argv = config.runner_argv()?;
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| GradingError::Config("runner command is empty".to_string()))?;

    info!("🚀 Running test suite '{}'", test_rel_path.display());
    let mut cmd = Command::new(program);
    cmd.args(args)
        .arg(test_rel_path)
        .arg("--json-report")
        .arg(format!("--json-report-file={}", report::REPORT_FILE))
        .current_dir(workdir);
    debug!("runner command: {cmd:?}");

    let output = cmd.output()?;
    debug!("runner exited with {}", output.status);
    Ok(RunOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        status: output.status.code(),
    })
}
