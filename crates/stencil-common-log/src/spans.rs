//! Span helpers shared by the linker and the verifier.

use tracing::{info_span, Span};

/// Span covering one `stencil link` run against a repository.
pub fn link_span(repo: &str) -> Span {
    info_span!("link", repo = %repo)
}

/// Span covering one verifier scenario.
pub fn scenario_span(scenario: &str) -> Span {
    info_span!("scenario", name = %scenario)
}

/// Span covering one external tool invocation.
pub fn command_span(program: &str, args: &str) -> Span {
    info_span!("command", program = %program, args = %args)
}

/// Timing utility for operations.
pub struct Timer {
    start: std::time::Instant,
    operation: &'static str,
}

impl Timer {
    /// Start a new timer.
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: std::time::Instant::now(),
            operation,
        }
    }

    /// Complete the timer, log the duration and return it.
    pub fn finish(self) -> std::time::Duration {
        let duration = self.start.elapsed();
        tracing::debug!(
            operation = %self.operation,
            duration_ms = %duration.as_millis(),
            "operation completed"
        );
        duration
    }
}
