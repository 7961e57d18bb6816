//! Package records shared by the loader, graph builder and propagator

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::manifest::ManifestDocument;

/// Where a package lives, as supplied by configuration or discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageLocation {
    /// Name the package was supplied under
    pub name: String,
    /// Directory relative to the repository root
    pub path: PathBuf,
}

impl PackageLocation {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// A dependency on another package of the same set
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyRef {
    /// Manifest file the dependency was declared in
    pub file: String,
    /// Dependency category key (e.g. `devDependencies`)
    pub key: String,
    /// Canonical name of the dependency
    pub name: String,
}

impl DependencyRef {
    pub fn new(file: impl Into<String>, key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            key: key.into(),
            name: name.into(),
        }
    }
}

/// A unit of independent versioning
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    /// Canonical name, unique within the set
    pub name: String,
    /// Directory relative to the repository root
    pub path: PathBuf,
    /// Manifest documents keyed by file name, in format priority order
    pub manifests: IndexMap<String, ManifestDocument>,
    /// Dependencies on packages of the same set, in declaration order
    pub dependencies: Vec<DependencyRef>,
}

impl Package {
    /// A package with no manifests and no dependencies
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            manifests: IndexMap::new(),
            dependencies: Vec::new(),
        }
    }

    /// Attach a manifest document
    pub fn with_manifest(mut self, file_name: impl Into<String>, document: ManifestDocument) -> Self {
        self.manifests.insert(file_name.into(), document);
        self
    }

    /// Current version, taken from the first manifest that declares one
    pub fn version(&self) -> Option<&str> {
        self.manifests.values().find_map(ManifestDocument::version)
    }

    /// Distinct dependency names, in first-declaration order
    pub fn dependency_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for dep in &self.dependencies {
            if !names.contains(&dep.name.as_str()) {
                names.push(&dep.name);
            }
        }
        names
    }
}

/// Packages keyed by canonical name; iteration order is meaningful
pub type PackageSet = IndexMap<String, Package>;
