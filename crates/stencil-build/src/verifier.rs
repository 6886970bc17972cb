//! Build verifier: runs each selected scenario in its own workspace.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use stencil_common_config::{ScenarioKind, VerifyConfig};
use stencil_common_log::spans::{self, Timer};
use tracing::{error, info, Instrument};

use crate::error::{VerifyError, VerifyResult};
use crate::runner::ToolRunner;
use crate::scenario::ScenarioRunner;
use crate::workspace::ScopedWorkspace;

/// Outcome of one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    /// Every step succeeded.
    Passed,
    /// A step failed.
    Failed,
    /// Not run because an earlier scenario failed with fail-fast enabled.
    Skipped,
}

/// Result of one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    /// Which scenario.
    pub scenario: ScenarioKind,
    /// Outcome.
    pub status: ScenarioStatus,
    /// Failure message, naming the failed command or missing file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Time spent, zero when skipped.
    pub duration_ms: u64,
}

/// Result of a verifier run.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
    /// Project that was verified.
    pub project_dir: PathBuf,
    /// Whether scenarios ran in temporary copies.
    pub isolated: bool,
    /// Per-scenario results, in run order.
    pub scenarios: Vec<ScenarioReport>,
}

impl VerifyReport {
    /// Whether no scenario failed.
    pub fn success(&self) -> bool {
        self.failed() == 0
    }

    /// Number of scenarios that passed.
    pub fn passed(&self) -> usize {
        self.count(ScenarioStatus::Passed)
    }

    /// Number of scenarios that failed.
    pub fn failed(&self) -> usize {
        self.count(ScenarioStatus::Failed)
    }

    /// Number of scenarios that were not run.
    pub fn skipped(&self) -> usize {
        self.count(ScenarioStatus::Skipped)
    }

    fn count(&self, status: ScenarioStatus) -> usize {
        self.scenarios.iter().filter(|s| s.status == status).count()
    }
}

/// Runs the configured scenarios against a Makefile project.
#[derive(Debug, Clone)]
pub struct BuildVerifier {
    project_dir: PathBuf,
    config: VerifyConfig,
    runner: ToolRunner,
}

impl BuildVerifier {
    /// Create a verifier for `project_dir`.
    pub fn new(project_dir: impl Into<PathBuf>, config: VerifyConfig) -> Self {
        let runner = ToolRunner::new(config.build_tool.clone())
            .timeout(config.timeout_secs.map(Duration::from_secs));

        Self {
            project_dir: project_dir.into(),
            config,
            runner,
        }
    }

    /// Project directory under test.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Run every configured scenario.
    ///
    /// Scenario failures are recorded in the report. Only a missing project
    /// directory is returned as an error.
    pub async fn run(&self) -> VerifyResult<VerifyReport> {
        if !self.project_dir.is_dir() {
            return Err(VerifyError::ProjectNotFound {
                path: self.project_dir.clone(),
            });
        }

        let scenarios = ScenarioRunner::new(&self.runner, &self.config);
        let mut reports = Vec::with_capacity(self.config.scenarios.len());
        let mut halted = false;

        for &kind in &self.config.scenarios {
            if halted {
                reports.push(ScenarioReport {
                    scenario: kind,
                    status: ScenarioStatus::Skipped,
                    error: None,
                    duration_ms: 0,
                });
                continue;
            }

            let timer = Timer::start("scenario");
            let result = self
                .run_scenario(&scenarios, kind)
                .instrument(spans::scenario_span(kind.name()))
                .await;
            let duration_ms = timer.finish().as_millis() as u64;

            let report = match result {
                Ok(()) => {
                    info!(scenario = %kind, duration_ms, "scenario passed");
                    ScenarioReport {
                        scenario: kind,
                        status: ScenarioStatus::Passed,
                        error: None,
                        duration_ms,
                    }
                }
                Err(e) => {
                    error!(scenario = %kind, error = %e, "scenario failed");
                    halted = self.config.fail_fast;
                    ScenarioReport {
                        scenario: kind,
                        status: ScenarioStatus::Failed,
                        error: Some(e.to_string()),
                        duration_ms,
                    }
                }
            };
            reports.push(report);
        }

        Ok(VerifyReport {
            project_dir: self.project_dir.clone(),
            isolated: self.config.isolate,
            scenarios: reports,
        })
    }

    async fn run_scenario(&self, scenarios: &ScenarioRunner<'_>, kind: ScenarioKind) -> VerifyResult<()> {
        // dropped at the end of this call, removing the copy on every path
        let workspace = ScopedWorkspace::prepare(&self.project_dir, self.config.isolate)?;
        scenarios.execute(kind, workspace.path()).await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    /// Records each call's working directory and fails for `docs`.
    const RECORDING_MAKE: &str = r#"#!/bin/sh
pwd >> "$STENCIL_TEST_LOG"
case "${1:-all}" in
  all) for s in *.c; do : > "${s%.c}.o"; : > "${s%.c}.d"; done ;;
  clean) rm -f *.o ;;
  *) echo "no docs here" >&2; exit 3 ;;
esac
"#;

    struct Fixture {
        _root: TempDir,
        project: PathBuf,
        log: PathBuf,
        tool: String,
    }

    fn fixture() -> Fixture {
        let root = tempfile::tempdir().unwrap();
        let project = root.path().join("project");
        std::fs::create_dir(&project).unwrap();
        std::fs::write(project.join("foo.c"), "int foo;\n").unwrap();
        std::fs::write(project.join("Makefile"), "# stand-in\n").unwrap();

        let log = root.path().join("calls.log");
        let tool = root.path().join("fake-make");
        let body = RECORDING_MAKE.replace("$STENCIL_TEST_LOG", &log.to_string_lossy());
        std::fs::write(&tool, body).unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

        Fixture {
            _root: root,
            project,
            log,
            tool: tool.to_string_lossy().into_owned(),
        }
    }

    fn config(fixture: &Fixture) -> VerifyConfig {
        VerifyConfig {
            build_tool: fixture.tool.clone(),
            ..VerifyConfig::default()
        }
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_later_scenarios() {
        let fixture = fixture();
        let mut config = config(&fixture);
        config.scenarios = vec![
            ScenarioKind::Documentation,
            ScenarioKind::ObjectGeneration,
        ];

        let report = BuildVerifier::new(&fixture.project, config).run().await.unwrap();

        assert!(!report.success());
        assert_eq!(report.failed(), 1);
        assert_eq!(report.passed(), 1);
        let docs = &report.scenarios[0];
        assert_eq!(docs.status, ScenarioStatus::Failed);
        assert!(docs.error.as_deref().unwrap().contains("exit code 3"));
    }

    #[tokio::test]
    async fn test_fail_fast_skips_the_rest() {
        let fixture = fixture();
        let mut config = config(&fixture);
        config.fail_fast = true;
        config.scenarios = vec![
            ScenarioKind::Documentation,
            ScenarioKind::ObjectGeneration,
            ScenarioKind::PhonyClean,
        ];

        let report = BuildVerifier::new(&fixture.project, config).run().await.unwrap();

        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 2);
        assert_eq!(std::fs::read_to_string(&fixture.log).unwrap().lines().count(), 1);
    }

    #[tokio::test]
    async fn test_each_scenario_gets_a_fresh_workspace() {
        let fixture = fixture();
        let mut config = config(&fixture);
        config.scenarios = vec![
            ScenarioKind::ObjectGeneration,
            ScenarioKind::DependencyGeneration,
        ];

        let report = BuildVerifier::new(&fixture.project, config).run().await.unwrap();
        assert!(report.success());
        assert!(report.isolated);

        let log = std::fs::read_to_string(&fixture.log).unwrap();
        let dirs: Vec<&str> = log.lines().collect();
        assert_eq!(dirs.len(), 2);
        assert_ne!(dirs[0], dirs[1]);
        for dir in dirs {
            assert!(!Path::new(dir).exists(), "{dir} was not removed");
        }
        assert!(!fixture.project.join("foo.o").exists());
    }

    #[tokio::test]
    async fn test_without_isolation_builds_in_place() {
        let fixture = fixture();
        let mut config = config(&fixture);
        config.isolate = false;
        config.scenarios = vec![ScenarioKind::ObjectGeneration];

        let report = BuildVerifier::new(&fixture.project, config).run().await.unwrap();

        assert!(report.success());
        assert!(fixture.project.join("foo.o").exists());
    }

    #[tokio::test]
    async fn test_missing_project_dir() {
        let fixture = fixture();
        let missing = fixture.project.join("nope");

        let err = BuildVerifier::new(&missing, config(&fixture)).run().await.unwrap_err();
        assert!(matches!(err, VerifyError::ProjectNotFound { path } if path == missing));
    }

    #[tokio::test]
    async fn test_missing_build_tool_fails_every_scenario() {
        let fixture = fixture();
        let config = VerifyConfig {
            build_tool: "stencil-no-such-make".to_string(),
            ..VerifyConfig::default()
        };

        let report = BuildVerifier::new(&fixture.project, config).run().await.unwrap();

        assert_eq!(report.failed(), ScenarioKind::ALL.len());
        assert!(report.scenarios.iter().all(|s| s
            .error
            .as_deref()
            .is_some_and(|e| e.contains("stencil-no-such-make"))));
    }
}
