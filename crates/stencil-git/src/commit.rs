//! Commit outcomes.

use serde::Serialize;

/// Result of the stage-and-commit step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommitOutcome {
    /// A new commit was created.
    Created {
        /// Abbreviated id of the new commit.
        commit: String,
    },
    /// The working tree had no changes.
    NothingToCommit,
    /// Committing was disabled.
    Skipped,
}

impl CommitOutcome {
    /// Check if a new commit exists after this step.
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }

    /// Recognize git's clean-tree report in the output of a failed `git commit`.
    pub(crate) fn is_nothing_to_commit(stdout: &str, stderr: &str) -> bool {
        [stdout, stderr].iter().any(|text| {
            text.lines().any(|line| {
                let line = line.trim_start();
                line.starts_with("nothing to commit") || line.starts_with("nothing added to commit")
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_tree_detected() {
        let stdout = "On branch main\nnothing to commit, working tree clean\n";
        assert!(CommitOutcome::is_nothing_to_commit(stdout, ""));
    }

    #[test]
    fn test_untracked_only_detected() {
        let stdout = "On branch main\nUntracked files:\n\tfoo\n\nnothing added to commit but untracked files present\n";
        assert!(CommitOutcome::is_nothing_to_commit(stdout, ""));
    }

    #[test]
    fn test_identity_error_not_treated_as_clean() {
        let stderr = "Author identity unknown\n\n*** Please tell me who you are.\n";
        assert!(!CommitOutcome::is_nothing_to_commit("", stderr));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(CommitOutcome::Created { commit: "abc1234".into() }).unwrap();
        assert_eq!(json["outcome"], "created");
        assert_eq!(json["commit"], "abc1234");

        let json = serde_json::to_value(CommitOutcome::NothingToCommit).unwrap();
        assert_eq!(json["outcome"], "nothing_to_commit");
    }
}
