use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use log::error;
use remote_grader::{
    EvalConfig, Pipeline, ScpFetcher,
    config::{DEFAULT_ASSIGNMENT_EXT, DEFAULT_RESULTS_PATH, DEFAULT_RUNNER, DEFAULT_SSH_USER},
    load_roster,
};

#[derive(Parser, Debug)]
#[command(
    name = "rgrader",
    version,
    about = "Pull candidate code from remote machines and grade it against the reference tests."
)]
struct Cli {
    /// CSV roster with candidate_id and ip (or host_address) columns.
    #[arg(long)]
    roster: PathBuf,

    /// Remote path pulled from each candidate machine.
    #[arg(long)]
    remote_path: String,

    /// Directory holding the reference tests (test_<assignment>.<ext>).
    #[arg(long)]
    tests_dir: PathBuf,

    /// Where the aggregated result set is written.
    #[arg(long, default_value = DEFAULT_RESULTS_PATH)]
    results: PathBuf,

    /// User for the remote copy.
    #[arg(long, default_value = DEFAULT_SSH_USER)]
    ssh_user: String,

    /// Identity file for the remote copy; defaults to ~/.ssh/id_rsa.
    #[arg(long, env = "PEM_PATH")]
    identity: Option<PathBuf>,

    /// Extension of candidate-authored assignment files.
    #[arg(long, default_value = DEFAULT_ASSIGNMENT_EXT)]
    ext: String,

    /// Test runner command invoked in each isolated working directory.
    #[arg(long, default_value = DEFAULT_RUNNER)]
    runner: String,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = EvalConfig {
        ssh_user: cli.ssh_user,
        identity_file: cli
            .identity
            .unwrap_or_else(remote_grader::config::default_identity_file),
        remote_path: cli.remote_path,
        tests_dir: cli.tests_dir,
        assignment_ext: cli.ext,
        runner: cli.runner,
        results_path: cli.results,
    };

    let roster = match load_roster(&cli.roster) {
        Ok(roster) => roster,
        Err(err) => {
            error!("could not load roster {}: {err}", cli.roster.display());
            return ExitCode::from(2);
        }
    };

    let fetcher = ScpFetcher::new(config.ssh_user.clone(), config.identity_file.clone());
    match Pipeline::new(&config, fetcher).run(&roster) {
        // Exit 0 means every candidate got a turn, regardless of scores.
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("evaluation run aborted: {err}");
            ExitCode::FAILURE
        }
    }
}
