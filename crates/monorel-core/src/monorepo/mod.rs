//! Multi-package release propagation
//!
//! This module provides the release pipeline for repositories holding many
//! independently versioned packages:
//! - Package discovery from configuration and workspace globs
//! - Manifest loading across `package.json` and `composer.json`
//! - Dependency graph analysis with topological sorting
//! - Release propagation and same-version groups
//! - Manifest rewriting and dependency release notes

pub mod discovery;
pub mod graph;
pub mod loader;
pub mod manifest;
pub mod notes;
pub mod package;
pub mod propagation;
pub mod rewrite;
pub mod store;

pub use discovery::discover_locations;
pub use graph::{resolve, DependencyGraph, PackageNode};
pub use loader::ManifestLoader;
pub use manifest::{Indent, ManifestDocument, ManifestFormat, ManifestFormats, NameEncoding, Newline};
pub use notes::dependency_notes;
pub use package::{DependencyRef, Package, PackageLocation, PackageSet};
pub use propagation::{NextVersion, PackageDecision, Propagator, ReleaseContext, ReleaseOrigin};
pub use rewrite::ManifestRewriter;
pub use store::{FsManifestStore, ManifestStore};
