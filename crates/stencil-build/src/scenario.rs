//! Scenario steps.

use std::path::Path;

use stencil_common_config::{ScenarioKind, VerifyConfig};
use tracing::{debug, instrument};

use crate::artifacts::{require_no_objects, ArtifactSet, Extensions};
use crate::error::{ArtifactKind, VerifyResult};
use crate::runner::{Invocation, ToolRunner};

/// Runs one scenario's build invocations and assertions in a prepared directory.
#[derive(Debug)]
pub struct ScenarioRunner<'a> {
    runner: &'a ToolRunner,
    config: &'a VerifyConfig,
    extensions: Extensions,
}

impl<'a> ScenarioRunner<'a> {
    /// Create a scenario runner.
    pub fn new(runner: &'a ToolRunner, config: &'a VerifyConfig) -> Self {
        Self {
            runner,
            config,
            extensions: Extensions::from(config),
        }
    }

    /// Execute `kind` in `dir`. The first failing step ends the scenario.
    #[instrument(skip_all, fields(dir = %dir.display()))]
    pub async fn execute(&self, kind: ScenarioKind, dir: &Path) -> VerifyResult<()> {
        match kind {
            ScenarioKind::ObjectGeneration => {
                let expected = self.build(dir).await?;
                expected.require(ArtifactKind::Object)
            }
            ScenarioKind::DependencyGeneration => {
                let expected = self.build(dir).await?;
                expected.require(ArtifactKind::Dependency)
            }
            ScenarioKind::PhonyClean => {
                self.build(dir).await?;
                self.runner
                    .run_checked(&Invocation::new(dir).target(&self.config.clean_target))
                    .await?;
                require_no_objects(dir, &self.extensions)
            }
            ScenarioKind::ConditionalCompilation => {
                let invocation = Invocation::new(dir)
                    .env(&self.config.debug_var, &self.config.debug_value);
                self.runner.run_checked(&invocation).await?;
                Ok(())
            }
            ScenarioKind::IncludeDirectives => {
                self.runner.run_checked(&Invocation::new(dir)).await?;
                Ok(())
            }
            ScenarioKind::Documentation => {
                self.runner
                    .run_checked(&Invocation::new(dir).target(&self.config.docs_target))
                    .await?;
                Ok(())
            }
        }
    }

    /// Record the sources, then run the default build.
    async fn build(&self, dir: &Path) -> VerifyResult<ArtifactSet> {
        let expected = ArtifactSet::scan(dir, &self.extensions)?;
        debug!(sources = expected.stems().len(), "running default build");

        self.runner.run_checked(&Invocation::new(dir)).await?;
        Ok(expected)
    }
}
