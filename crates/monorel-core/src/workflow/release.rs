//! Release planning and manifest preparation

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{Config, SameVersionGroup};
use crate::error::{GraphError, Result, WorkflowError};
use crate::monorepo::{
    dependency_notes, resolve, DependencyGraph, ManifestDocument, ManifestFormats, ManifestLoader,
    ManifestRewriter, ManifestStore, NextVersion, PackageDecision, PackageLocation, PackageSet,
    Propagator, ReleaseContext, ReleaseOrigin,
};
use crate::types::ReleaseType;

/// Externally decided releases for one run
#[derive(Debug, Clone, Default)]
pub struct ReleaseRequest {
    /// Release types keyed by canonical package name
    pub release_types: IndexMap<String, ReleaseType>,
    /// Prerelease channel, overriding the configured branch channel
    pub channel: Option<String>,
}

impl ReleaseRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a release of `name`
    pub fn with_release(mut self, name: impl Into<String>, release_type: ReleaseType) -> Self {
        self.release_types.insert(name.into(), release_type);
        self
    }

    /// Release on a prerelease channel
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }
}

/// A manifest ready to be written
#[derive(Debug, Clone)]
pub struct ManifestWrite {
    /// Owning package
    pub package: String,
    /// Package directory relative to the repository root
    pub dir: PathBuf,
    /// Manifest file name
    pub file: String,
    /// Rewritten document
    pub document: ManifestDocument,
}

/// A released package and the manifest files it carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AffectedPackage {
    pub name: String,
    pub files: Vec<String>,
}

/// Per-package view of a plan
#[derive(Debug, Clone, Serialize)]
pub struct PackagePlan {
    pub name: String,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<ReleaseOrigin>,
    pub decision: PackageDecision,
}

/// The outcome of loading, ordering and propagating one run
#[derive(Debug, Clone)]
pub struct ReleasePlan {
    /// Packages in topological order
    pub packages: PackageSet,
    /// Dependency graph of `packages`
    pub graph: DependencyGraph,
    /// Release state per package, after propagation and version resolution
    pub contexts: IndexMap<String, ReleaseContext>,
    /// Propagation result per package
    pub decisions: IndexMap<String, PackageDecision>,
    formats: ManifestFormats,
    groups: Vec<SameVersionGroup>,
    range_prefix: String,
}

impl ReleasePlan {
    /// Load manifests, order packages and propagate `request` through them.
    ///
    /// Every package with a release type ends up with a resolved next
    /// version; nothing is written.
    pub fn build<S: ManifestStore + ?Sized>(
        config: &Config,
        store: &S,
        locations: &IndexMap<String, PackageLocation>,
        request: &ReleaseRequest,
        next: &dyn NextVersion,
    ) -> Result<Self> {
        let formats = ManifestFormats::standard();
        let packages = ManifestLoader::new(store, &formats)
            .name_collision(config.manifests.name_collision)
            .load(locations)?;
        let (packages, graph) = resolve(packages, &formats)?;

        if let Some(unknown) = request
            .release_types
            .keys()
            .find(|name| !packages.contains_key(name.as_str()))
        {
            return Err(WorkflowError::UnknownPackage(unknown.clone()).into());
        }

        let channel = request.channel.clone().or_else(|| config.branch.channel.clone());
        let mut contexts: IndexMap<String, ReleaseContext> = packages
            .values()
            .map(|package| {
                let mut context = ReleaseContext::new(&package.name)
                    .with_channel(channel.clone())
                    .with_last_version(package.version().map(str::to_string));
                if let Some(release_type) = request.release_types.get(&package.name) {
                    context = context.with_release_type(*release_type);
                }
                (package.name.clone(), context)
            })
            .collect();

        let decisions = Propagator::new(config.release_types)
            .with_groups(config.same_versions.clone())
            .propagate(&packages, &mut contexts, next)?;

        for context in contexts.values_mut() {
            let Some(release_type) = context.release_type else {
                continue;
            };
            if context.next_version.is_none() {
                context.next_version = Some(next.next_version(context, release_type)?);
            }
            debug!(
                package = %context.name,
                last = ?context.last_version,
                next = ?context.next_version,
                "resolved next version"
            );
        }

        let plan = Self {
            packages,
            graph,
            contexts,
            decisions,
            formats,
            groups: config.same_versions.clone(),
            range_prefix: config.manifests.range_prefix.clone(),
        };
        info!(
            packages = plan.packages.len(),
            releasing = plan.releasing().len(),
            "release plan built"
        );
        Ok(plan)
    }

    /// Resolved next versions keyed by canonical name
    pub fn versions(&self) -> IndexMap<String, String> {
        self.contexts
            .iter()
            .filter_map(|(name, c)| c.next_version.clone().map(|v| (name.clone(), v)))
            .collect()
    }

    /// Contexts of releasing packages, in topological order
    pub fn releasing(&self) -> Vec<&ReleaseContext> {
        self.contexts
            .values()
            .filter(|c| c.release_type.is_some())
            .collect()
    }

    /// Per-package summary, in topological order
    pub fn summary(&self) -> Vec<PackagePlan> {
        self.packages
            .values()
            .map(|package| {
                let context = self.contexts.get(&package.name);
                PackagePlan {
                    name: package.name.clone(),
                    path: package.path.clone(),
                    last_version: context.and_then(|c| c.last_version.clone()),
                    next_version: context.and_then(|c| c.next_version.clone()),
                    origin: context.and_then(|c| c.origin.clone()),
                    decision: self
                        .decisions
                        .get(&package.name)
                        .cloned()
                        .unwrap_or_default(),
                }
            })
            .collect()
    }

    /// Dependency notes for `name`
    pub fn notes(&self, name: &str) -> Result<Option<String>> {
        let package = self
            .packages
            .get(name)
            .ok_or_else(|| GraphError::UnknownPackage(name.to_string()))?;
        Ok(dependency_notes(package, &self.contexts, &self.groups))
    }

    /// Compute every manifest rewrite of the releasing packages
    pub fn rewrites(&self) -> Result<Vec<ManifestWrite>> {
        let versions = self.versions();
        let rewriter = ManifestRewriter::new(&self.formats, self.range_prefix.as_str());
        let mut writes = Vec::new();

        for context in self.releasing() {
            let version = context
                .next_version
                .as_deref()
                .ok_or_else(|| WorkflowError::UnresolvedVersion(context.name.clone()))?;
            let package = self
                .packages
                .get(&context.name)
                .ok_or_else(|| GraphError::UnknownPackage(context.name.clone()))?;

            for (file, document) in rewriter.rewrite(package, version, &versions) {
                writes.push(ManifestWrite {
                    package: package.name.clone(),
                    dir: package.path.clone(),
                    file,
                    document,
                });
            }
        }
        Ok(writes)
    }

    /// Rewrite manifests of releasing packages through `store`.
    ///
    /// All documents are computed before the first write. With `dry_run`
    /// nothing is written. Returns the computed writes either way.
    pub fn apply<S: ManifestStore + ?Sized>(
        &self,
        store: &S,
        dry_run: bool,
    ) -> Result<Vec<ManifestWrite>> {
        let writes = self.rewrites()?;

        for write in &writes {
            info!(
                package = %write.package,
                file = %write.file,
                path = %write.dir.display(),
                dry_run,
                "writing manifest"
            );
            if !dry_run {
                store.write_manifest(&write.dir, &write.file, &write.document)?;
            }
        }
        Ok(writes)
    }

    /// Releasing packages with the manifest files they carry
    pub fn affected_packages(&self) -> Vec<AffectedPackage> {
        self.releasing()
            .into_iter()
            .filter_map(|context| self.packages.get(&context.name))
            .map(|package| AffectedPackage {
                name: package.name.clone(),
                files: package.manifests.keys().cloned().collect(),
            })
            .collect()
    }
}
