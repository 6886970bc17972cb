//! Expected build products.

use std::path::{Path, PathBuf};

use stencil_common_config::VerifyConfig;
use walkdir::WalkDir;

use crate::error::{ArtifactKind, VerifyError, VerifyResult};

/// File extensions the verifier recognizes, without dots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extensions {
    /// Source files.
    pub source: String,
    /// Object files.
    pub object: String,
    /// Dependency files.
    pub dependency: String,
}

impl Default for Extensions {
    fn default() -> Self {
        Self {
            source: "c".to_string(),
            object: "o".to_string(),
            dependency: "d".to_string(),
        }
    }
}

impl From<&VerifyConfig> for Extensions {
    fn from(config: &VerifyConfig) -> Self {
        Self {
            source: config.source_extension.clone(),
            object: config.object_extension.clone(),
            dependency: config.dependency_extension.clone(),
        }
    }
}

/// Source files found in a directory and the files a build should produce for them.
#[derive(Debug, Clone)]
pub struct ArtifactSet {
    dir: PathBuf,
    stems: Vec<String>,
    extensions: Extensions,
}

impl ArtifactSet {
    /// Record the source files currently in `dir`. Subdirectories are not searched.
    pub fn scan(dir: &Path, extensions: &Extensions) -> VerifyResult<Self> {
        let stems = files_with_extension(dir, &extensions.source)?
            .into_iter()
            .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();

        Ok(Self {
            dir: dir.to_path_buf(),
            stems,
            extensions: extensions.clone(),
        })
    }

    /// Base names of the recorded source files, sorted.
    pub fn stems(&self) -> &[String] {
        &self.stems
    }

    /// Whether no source files were found.
    pub fn is_empty(&self) -> bool {
        self.stems.is_empty()
    }

    /// Expected file names of `kind`, one per source file.
    pub fn expected(&self, kind: ArtifactKind) -> Vec<String> {
        let ext = match kind {
            ArtifactKind::Object => &self.extensions.object,
            ArtifactKind::Dependency => &self.extensions.dependency,
        };
        self.stems.iter().map(|stem| format!("{stem}.{ext}")).collect()
    }

    /// Expected object files that do not exist.
    pub fn missing_objects(&self) -> Vec<String> {
        self.missing(ArtifactKind::Object)
    }

    /// Expected dependency files that do not exist.
    pub fn missing_dependencies(&self) -> Vec<String> {
        self.missing(ArtifactKind::Dependency)
    }

    fn missing(&self, kind: ArtifactKind) -> Vec<String> {
        self.expected(kind)
            .into_iter()
            .filter(|name| !self.dir.join(name).is_file())
            .collect()
    }

    /// Fail with [`VerifyError::MissingArtifact`] unless every file of `kind` exists.
    pub fn require(&self, kind: ArtifactKind) -> VerifyResult<()> {
        let files = self.missing(kind);
        if files.is_empty() {
            Ok(())
        } else {
            Err(VerifyError::MissingArtifact { kind, files })
        }
    }
}

/// Object files present in `dir`, whether or not a source file produced them.
pub fn lingering_objects(dir: &Path, extensions: &Extensions) -> VerifyResult<Vec<String>> {
    Ok(files_with_extension(dir, &extensions.object)?
        .into_iter()
        .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect())
}

/// Fail with [`VerifyError::LingeringArtifact`] if any object file remains in `dir`.
pub fn require_no_objects(dir: &Path, extensions: &Extensions) -> VerifyResult<()> {
    let files = lingering_objects(dir, extensions)?;
    if files.is_empty() {
        Ok(())
    } else {
        Err(VerifyError::LingeringArtifact { files })
    }
}

fn files_with_extension(dir: &Path, extension: &str) -> VerifyResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| VerifyError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().is_some_and(|ext| ext == extension) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
