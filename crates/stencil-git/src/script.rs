//! Generated template sync script.

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::{GitError, GitResult};

/// How the script registers the template remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Registration {
    /// `git remote add`, for repositories without a template remote.
    Add,
    /// `git remote set-url`, replacing an existing template remote's URL.
    SetUrl,
}

impl Registration {
    fn git_verb(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::SetUrl => "set-url",
        }
    }
}

/// Commands that register the template remote, fetch it and merge its branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncScript {
    /// Name of the template remote.
    pub remote: String,
    /// Template repository URL.
    pub url: String,
    /// Template branch to merge.
    pub branch: String,
    /// Message of the merge commit.
    pub merge_message: String,
    /// How the remote is registered.
    pub registration: Registration,
}

impl SyncScript {
    /// Render the script text. Identical inputs give byte-identical output.
    pub fn render(&self) -> String {
        let remote = shell_word(&self.remote);
        format!(
            "# Register the template repository as a remote\n\
             git remote {verb} {remote} {url}\n\
             \n\
             # Fetch updates from the template repository\n\
             git fetch {remote}\n\
             \n\
             # Merge updates into the current branch\n\
             git merge {remote}/{branch} --allow-unrelated-histories -m {message}\n",
            verb = self.registration.git_verb(),
            url = shell_word(&self.url),
            branch = shell_word(&self.branch),
            message = double_quoted(&self.merge_message),
        )
    }

    /// Write the script to `path`, creating or truncating it.
    ///
    /// Returns whether the file content changed.
    pub async fn write(&self, path: &Path) -> GitResult<bool> {
        let rendered = self.render();

        let previous = tokio::fs::read(path).await.ok();
        let changed = previous.as_deref() != Some(rendered.as_bytes());

        tokio::fs::write(path, rendered.as_bytes())
            .await
            .map_err(|source| GitError::ScriptWrite {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(path = %path.display(), changed, "sync script written");
        Ok(changed)
    }
}

/// Leave plain words alone and single-quote anything the shell would interpret.
fn shell_word(s: &str) -> String {
    let plain = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./_-~".contains(c));

    if plain {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(registration: Registration) -> SyncScript {
        SyncScript {
            remote: "template".to_string(),
            url: "https://github.com/acme/widget.git".to_string(),
            branch: "main".to_string(),
            merge_message: "Merge updates from template".to_string(),
            registration,
        }
    }

    #[test]
    fn test_render_default_script() {
        let expected = "\
# Register the template repository as a remote
git remote add template https://github.com/acme/widget.git

# Fetch updates from the template repository
git fetch template

# Merge updates into the current branch
git merge template/main --allow-unrelated-histories -m \"Merge updates from template\"
";
        assert_eq!(script(Registration::Add).render(), expected);
    }

    #[test]
    fn test_render_has_single_fetch_and_merge() {
        let text = script(Registration::Add).render();
        assert_eq!(text.matches("git fetch template").count(), 1);
        assert_eq!(text.matches("git merge template/main").count(), 1);
    }

    #[test]
    fn test_render_set_url_for_existing_remote() {
        let text = script(Registration::SetUrl).render();
        assert!(text.contains("git remote set-url template https://github.com/acme/widget.git\n"));
        assert!(!text.contains("git remote add"));
    }

    #[test]
    fn test_shell_word_quotes_metacharacters() {
        assert_eq!(shell_word("git@github.com:acme/w.git"), "git@github.com:acme/w.git");
        assert_eq!(shell_word("https://h/x?a=1&b=2"), "'https://h/x?a=1&b=2'");
        assert_eq!(shell_word("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_merge_message_escaping() {
        assert_eq!(double_quoted(r#"say "hi" $HOME"#), r#""say \"hi\" \$HOME""#);
    }

    #[tokio::test]
    async fn test_write_creates_then_reports_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync.sh");
        let script = script(Registration::Add);

        assert!(script.write(&path).await.unwrap());
        assert!(!script.write(&path).await.unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), script.render());
    }

    #[tokio::test]
    async fn test_write_truncates_longer_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync.sh");
        std::fs::write(&path, "x".repeat(4096)).unwrap();

        let script = script(Registration::Add);
        assert!(script.write(&path).await.unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), script.render());
    }

    #[tokio::test]
    async fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("sync.sh");

        let err = script(Registration::Add).write(&path).await.unwrap_err();
        assert!(matches!(err, GitError::ScriptWrite { .. }));
    }
}
