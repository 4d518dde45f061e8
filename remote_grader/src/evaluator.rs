//! Per-candidate evaluation.
//!
//! One assignment at a time: stage the candidate file and its matching
//! reference test into a fresh [`IsolatedWorkspace`], run the suite there,
//! and read the report it leaves behind. Assignments of the same candidate
//! are strictly sequential and never share state.

mod harness;

pub use harness::RunOutput;

use std::{fs, path::Path};

use log::{error, info, warn};

use crate::{
    config::EvalConfig,
    error::{GradingError, Result},
    report,
    results::{AssignmentOutcome, CandidateResult},
    workspace::{ASSIGNMENT_DIR, IsolatedWorkspace, TESTS_DIR},
};

/// Grades one assignment file in a fresh isolated workspace.
pub struct AssignmentEvaluator<'a> {
    config: &'a EvalConfig,
}

impl<'a> AssignmentEvaluator<'a> {
    pub fn new(config: &'a EvalConfig) -> Self {
        Self { config }
    }

    pub fn evaluate(
        &self,
        candidate_id: &str,
        assignment_path: &Path,
    ) -> Result<AssignmentOutcome> {
        let assignment_name = assignment_stem(assignment_path);
        let test_path = self.config.reference_test_path(&assignment_name);
        if !test_path.is_file() {
            // Unmatched assignment types are skipped, not failed.
            info!(
                "no reference test '{}' for {candidate_id}, skipping",
                self.config.test_file_name(&assignment_name)
            );
            return Ok(AssignmentOutcome::no_test(assignment_name));
        }

        let workspace = IsolatedWorkspace::create()?;
        workspace.stage(ASSIGNMENT_DIR, assignment_path)?;
        let test_rel_path = workspace.stage(TESTS_DIR, &test_path)?;

        let run = harness::run_suite(self.config, workspace.root(), &test_rel_path)?;

        match report::load(&workspace.root().join(report::REPORT_FILE)) {
            Ok(counts) => Ok(AssignmentOutcome::success(
                assignment_name,
                counts,
                run.stdout,
            )),
            Err(GradingError::MissingReport(_)) => {
                warn!("no report produced for '{assignment_name}' of {candidate_id}");
                Ok(AssignmentOutcome::failed(assignment_name, run.stderr))
            }
            Err(GradingError::MalformedReport(reason)) => {
                warn!("malformed report for '{assignment_name}' of {candidate_id}: {reason}");
                Ok(AssignmentOutcome::malformed_report(
                    assignment_name,
                    run.stdout,
                ))
            }
            Err(other) => Err(other),
        }
    }
}

/// Grades every assignment file in a candidate's submission directory.
pub struct CandidateEvaluator<'a> {
    config: &'a EvalConfig,
}

impl<'a> CandidateEvaluator<'a> {
    pub fn new(config: &'a EvalConfig) -> Self {
        Self { config }
    }

    /// Outcomes come back in filesystem listing order. Returns `Err` only
    /// when the listing itself fails; a broken assignment becomes an `Error`
    /// outcome so its siblings still run.
    pub fn evaluate(&self, candidate_id: &str, submission_dir: &Path) -> Result<CandidateResult> {
        info!("Evaluating candidate: {candidate_id}");
        let assignment = AssignmentEvaluator::new(self.config);
        let mut outcomes = Vec::new();
        for entry in fs::read_dir(submission_dir)? {
            let path = entry?.path();
            if !self.is_assignment_file(&path) {
                continue;
            }
            let name = assignment_stem(&path);
            match assignment.evaluate(candidate_id, &path) {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => {
                    error!("grading '{name}' for {candidate_id} broke: {err}");
                    outcomes.push(AssignmentOutcome::errored(name, err.to_string()));
                }
            }
        }
        Ok(CandidateResult::evaluated(candidate_id.to_string(), outcomes))
    }

    fn is_assignment_file(&self, path: &Path) -> bool {
        path.is_file()
            && path.extension().and_then(|ext| ext.to_str())
                == Some(self.config.assignment_ext.as_str())
    }
}

fn assignment_stem(path: &Path) -> String {
    path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::results::AssignmentStatus;
    use std::path::PathBuf;

    /// On-disk fixture: a reference tests directory, a submission directory
    /// and a stub runner script standing in for pytest.
    struct Fixture {
        root: tempfile::TempDir,
        config: EvalConfig,
    }

    impl Fixture {
        fn new(stub_script: &str) -> Self {
            let root = tempfile::tempdir().unwrap();
            let tests_dir = root.path().join("reference_tests");
            fs::create_dir_all(&tests_dir).unwrap();
            fs::create_dir_all(root.path().join("submission")).unwrap();
            let stub = root.path().join("stub.sh");
            fs::write(&stub, stub_script).unwrap();

            let config = test_config(
                &tests_dir,
                &root.path().join("results.json"),
                format!("sh {}", stub.display()),
            );
            Self { root, config }
        }

        fn add_reference_test(&self, assignment: &str) {
            fs::write(
                self.config.reference_test_path(assignment),
                "def test_placeholder():\n    assert True\n",
            )
            .unwrap();
        }

        fn add_submission_file(&self, file_name: &str) -> PathBuf {
            let path = self.submission_dir().join(file_name);
            fs::write(&path, "print('submission')\n").unwrap();
            path
        }

        fn submission_dir(&self) -> PathBuf {
            self.root.path().join("submission")
        }
    }

    const PASSING_STUB: &str =
        "printf '{\"summary\": {\"passed\": 2, \"total\": 2}}' > report.json\necho '2 passed'\n";

    mod assignment_evaluator_tests {
        use super::*;

        #[test_log::test]
        fn should_skip_an_assignment_without_a_matching_test() {
            let fixture = Fixture::new(PASSING_STUB);
            let path = fixture.add_submission_file("orphan.py");

            let outcome = AssignmentEvaluator::new(&fixture.config)
                .evaluate("c1", &path)
                .unwrap();

            assert_eq!(outcome.status, AssignmentStatus::NoTest);
            assert_eq!(outcome.score, 0.0);
        }

        #[test_log::test]
        fn should_grade_a_passing_assignment() {
            let fixture = Fixture::new(PASSING_STUB);
            fixture.add_reference_test("kafka_app");
            let path = fixture.add_submission_file("kafka_app.py");

            let outcome = AssignmentEvaluator::new(&fixture.config)
                .evaluate("c1", &path)
                .unwrap();

            assert_eq!(outcome.status, AssignmentStatus::Success);
            assert_eq!(outcome.passed, Some(2));
            assert_eq!(outcome.total, Some(2));
            assert_eq!(outcome.score, 5.0);
            assert!(outcome.output.contains("2 passed"));
        }

        #[test_log::test]
        fn should_mark_failed_when_no_report_appears() {
            let fixture = Fixture::new("echo 'import error' >&2\nexit 2\n");
            fixture.add_reference_test("kafka_app");
            let path = fixture.add_submission_file("kafka_app.py");

            let outcome = AssignmentEvaluator::new(&fixture.config)
                .evaluate("c1", &path)
                .unwrap();

            assert_eq!(outcome.status, AssignmentStatus::Failed);
            assert_eq!(outcome.score, 0.0);
            assert!(outcome.output.contains("import error"));
        }

        #[test_log::test]
        fn should_mark_a_malformed_report() {
            let fixture =
                Fixture::new("printf '{\"summary\": {}}' > report.json\necho 'odd run'\n");
            fixture.add_reference_test("kafka_app");
            let path = fixture.add_submission_file("kafka_app.py");

            let outcome = AssignmentEvaluator::new(&fixture.config)
                .evaluate("c1", &path)
                .unwrap();

            assert_eq!(outcome.status, AssignmentStatus::MalformedReport);
            assert_eq!(outcome.score, 0.0);
            assert!(outcome.output.contains("odd run"));
        }
    }

    mod candidate_evaluator_tests {
        use super::*;

        fn outcome_by_name<'r>(
            result: &'r CandidateResult,
            name: &str,
        ) -> &'r AssignmentOutcome {
            result
                .results
                .iter()
                .find(|outcome| outcome.assignment_name == name)
                .unwrap_or_else(|| panic!("no outcome for '{name}'"))
        }

        #[test_log::test]
        fn should_not_let_one_broken_assignment_abort_the_rest() {
            // The stub turns report.json into a directory for test_gamma,
            // which makes the report read blow up with an io error.
            let fixture = Fixture::new(concat!(
                "case \"$1\" in\n",
                "  */test_gamma.py) mkdir report.json ;;\n",
                "  *) printf '{\"summary\": {\"passed\": 1, \"total\": 1}}' > report.json ;;\n",
                "esac\n",
            ));
            fixture.add_reference_test("alpha");
            fixture.add_reference_test("gamma");
            fixture.add_submission_file("alpha.py");
            fixture.add_submission_file("gamma.py");

            let result = CandidateEvaluator::new(&fixture.config)
                .evaluate("c1", &fixture.submission_dir())
                .unwrap();

            assert_eq!(result.results.len(), 2);
            let alpha = outcome_by_name(&result, "alpha");
            assert_eq!(alpha.status, AssignmentStatus::Success);
            assert_eq!(alpha.score, 2.5);
            let gamma = outcome_by_name(&result, "gamma");
            assert_eq!(gamma.status, AssignmentStatus::Error);
            assert_eq!(gamma.score, 0.0);
            assert!(!gamma.output.is_empty());
            assert_eq!(result.total_score, 2.5);
        }

        #[test_log::test]
        fn should_keep_siblings_unaffected_by_a_skipped_assignment() {
            let fixture = Fixture::new(PASSING_STUB);
            fixture.add_reference_test("alpha");
            fixture.add_submission_file("alpha.py");
            fixture.add_submission_file("orphan.py");

            let result = CandidateEvaluator::new(&fixture.config)
                .evaluate("c1", &fixture.submission_dir())
                .unwrap();

            assert_eq!(result.results.len(), 2);
            assert_eq!(
                outcome_by_name(&result, "alpha").status,
                AssignmentStatus::Success
            );
            assert_eq!(
                outcome_by_name(&result, "orphan").status,
                AssignmentStatus::NoTest
            );
            assert_eq!(result.total_score, 5.0);
        }

        #[test_log::test]
        fn should_only_consider_assignment_files() {
            let fixture = Fixture::new(PASSING_STUB);
            fixture.add_reference_test("alpha");
            fixture.add_submission_file("alpha.py");
            fixture.add_submission_file("README.txt");
            fs::create_dir(fixture.submission_dir().join("nested.py")).unwrap();

            let result = CandidateEvaluator::new(&fixture.config)
                .evaluate("c1", &fixture.submission_dir())
                .unwrap();

            assert_eq!(result.results.len(), 1);
            assert_eq!(result.results[0].assignment_name, "alpha");
        }

        #[test_log::test]
        fn should_total_zero_for_an_empty_submission() {
            let fixture = Fixture::new(PASSING_STUB);

            let result = CandidateEvaluator::new(&fixture.config)
                .evaluate("c1", &fixture.submission_dir())
                .unwrap();

            assert!(result.results.is_empty());
            assert_eq!(result.total_score, 0.0);
        }

        #[test_log::test]
        fn should_fail_when_the_submission_cannot_be_listed() {
            let fixture = Fixture::new(PASSING_STUB);

            let result = CandidateEvaluator::new(&fixture.config)
                .evaluate("c1", &fixture.root.path().join("nowhere"));

            assert!(result.is_err());
        }
    }
}
