//! monorel Core - release propagation for multi-package repositories
//!
//! This crate loads per-package manifests, builds the inter-package dependency
//! graph, propagates release decisions from dependencies to dependents, and
//! rewrites manifests with the resulting versions.

pub mod config;
pub mod error;
pub mod monorepo;
pub mod types;
pub mod workflow;

pub use error::{MonorelError, Result};
pub use monorepo::{
    DependencyGraph, DependencyRef, FsManifestStore, ManifestDocument, ManifestFormat,
    ManifestFormats, ManifestLoader, ManifestStore, NextVersion, Package, PackageDecision,
    PackageLocation, PackageSet, Propagator, ReleaseContext,
};
pub use types::{ReleaseType, ReleaseTypePolicy};
pub use workflow::{ReleasePlan, ReleaseRequest};
