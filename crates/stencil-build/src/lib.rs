//! Makefile build verification for Stencil.
//!
//! Runs a fixed set of scenarios against a project's build description.
//! Each scenario invokes the build tool, then checks what it left on disk.
//! Scenarios run in scoped copies of the project by default, and any
//! environment a scenario needs is passed to that one invocation only.

#![warn(missing_docs)]

pub mod artifacts;
pub mod error;
pub mod runner;
pub mod scenario;
pub mod verifier;
pub mod workspace;

pub use artifacts::{lingering_objects, require_no_objects, ArtifactSet, Extensions};
pub use error::{ArtifactKind, VerifyError, VerifyResult};
pub use runner::{Invocation, ToolOutput, ToolRunner};
pub use scenario::ScenarioRunner;
pub use verifier::{BuildVerifier, ScenarioReport, ScenarioStatus, VerifyReport};
pub use workspace::ScopedWorkspace;
