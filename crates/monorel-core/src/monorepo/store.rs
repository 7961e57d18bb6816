//! Reading and writing manifest files

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ManifestError, Result};

use super::manifest::ManifestDocument;

/// Storage for per-package manifest files
pub trait ManifestStore {
    /// Read `file_name` in package directory `dir`; `None` when it does not exist
    fn read_manifest(&self, dir: &Path, file_name: &str) -> Result<Option<ManifestDocument>>;

    /// Write `document` to `file_name` in package directory `dir`
    fn write_manifest(&self, dir: &Path, file_name: &str, document: &ManifestDocument)
        -> Result<()>;
}

/// Manifest store backed by the filesystem under a repository root
#[derive(Debug, Clone)]
pub struct FsManifestStore {
    root: PathBuf,
}

impl FsManifestStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn file_path(&self, dir: &Path, file_name: &str) -> PathBuf {
        self.root.join(dir).join(file_name)
    }
}

impl ManifestStore for FsManifestStore {
    fn read_manifest(&self, dir: &Path, file_name: &str) -> Result<Option<ManifestDocument>> {
        let path = self.file_path(dir, file_name);
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ManifestError::ReadFailed {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "read manifest");

        ManifestDocument::parse(&content, &path).map(Some)
    }

    fn write_manifest(
        &self,
        dir: &Path,
        file_name: &str,
        document: &ManifestDocument,
    ) -> Result<()> {
        let path = self.file_path(dir, file_name);
        let content = document.render()?;

        std::fs::write(&path, content).map_err(|source| ManifestError::WriteFailed {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "wrote manifest");
        Ok(())
    }
}
