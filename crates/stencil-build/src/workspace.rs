//! Per-scenario working directories.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{VerifyError, VerifyResult};

/// Directory a single scenario runs in.
///
/// With isolation the project is copied into a temporary directory that is
/// removed when the guard is dropped. Without it the project directory is
/// used as is.
#[derive(Debug)]
pub struct ScopedWorkspace {
    path: PathBuf,
    temp: Option<TempDir>,
}

impl ScopedWorkspace {
    /// Prepare a workspace for `project_dir`.
    pub fn prepare(project_dir: &Path, isolate: bool) -> VerifyResult<Self> {
        if !isolate {
            return Ok(Self {
                path: project_dir.to_path_buf(),
                temp: None,
            });
        }

        let temp = tempfile::Builder::new()
            .prefix("stencil-verify-")
            .tempdir()
            .map_err(|source| VerifyError::Workspace {
                path: project_dir.to_path_buf(),
                source,
            })?;

        copy_tree(project_dir, temp.path())?;
        debug!(
            project = %project_dir.display(),
            workspace = %temp.path().display(),
            "prepared scoped workspace"
        );

        Ok(Self {
            path: temp.path().to_path_buf(),
            temp: Some(temp),
        })
    }

    /// Directory the scenario should run in.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this workspace is a temporary copy.
    pub fn is_isolated(&self) -> bool {
        self.temp.is_some()
    }
}

/// Copy `src` into the existing directory `dst`, skipping `.git`.
fn copy_tree(src: &Path, dst: &Path) -> VerifyResult<()> {
    let walker = WalkDir::new(src)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git");

    for entry in walker {
        let entry = entry.map_err(|e| VerifyError::Workspace {
            path: e.path().map(Path::to_path_buf).unwrap_or_else(|| src.to_path_buf()),
            source: e.into(),
        })?;

        let relative = entry.path().strip_prefix(src).map_err(|_| VerifyError::Workspace {
            path: entry.path().to_path_buf(),
            source: std::io::Error::other("entry outside project directory"),
        })?;
        let target = dst.join(relative);
        let file_type = entry.file_type();

        let result = if file_type.is_dir() {
            std::fs::create_dir_all(&target)
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)
        } else if file_type.is_file() {
            std::fs::copy(entry.path(), &target).map(|_| ())
        } else {
            // sockets, fifos and devices
            debug!(path = %entry.path().display(), "skipping special file");
            Ok(())
        };

        result.map_err(|source| VerifyError::Workspace {
            path: entry.path().to_path_buf(),
            source,
        })?;
    }

    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> std::io::Result<()> {
    let target = std::fs::read_link(src)?;
    std::os::unix::fs::symlink(target, dst)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> std::io::Result<()> {
    std::fs::copy(src, dst).map(|_| ())
}
