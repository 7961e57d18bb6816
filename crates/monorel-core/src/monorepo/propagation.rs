//! Release propagation across dependent packages
//!
//! Packages are visited in topological order, so by the time a package is
//! evaluated every one of its dependencies already holds its final release
//! type. Same-version groups are reconciled once all release types are known.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::SameVersionGroup;
use crate::error::{Result, VersionError};
use crate::types::{ReleaseType, ReleaseTypePolicy};

use super::package::PackageSet;

/// Why a package is releasing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "package")]
pub enum ReleaseOrigin {
    /// Decided outside this run (e.g. the package's own commits)
    Independent,
    /// Propagated from the named dependency
    Dependency(String),
}

impl std::fmt::Display for ReleaseOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Independent => write!(f, "direct changes"),
            Self::Dependency(name) => write!(f, "dependency {} updated", name),
        }
    }
}

/// Mutable per-package release state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseContext {
    /// Canonical package name
    pub name: String,
    /// Pending release type, if any
    pub release_type: Option<ReleaseType>,
    /// Where the pending release type came from
    pub origin: Option<ReleaseOrigin>,
    /// Prerelease channel of the release branch
    pub channel: Option<String>,
    /// Last released version
    pub last_version: Option<String>,
    /// Resolved next version
    pub next_version: Option<String>,
}

impl ReleaseContext {
    /// A context with no pending release
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            release_type: None,
            origin: None,
            channel: None,
            last_version: None,
            next_version: None,
        }
    }

    /// Mark an externally decided release
    pub fn with_release_type(mut self, release_type: ReleaseType) -> Self {
        self.release_type = Some(release_type);
        self.origin = Some(ReleaseOrigin::Independent);
        self
    }

    /// Set the release channel
    pub fn with_channel(mut self, channel: Option<String>) -> Self {
        self.channel = channel;
        self
    }

    /// Set the last released version
    pub fn with_last_version(mut self, version: Option<String>) -> Self {
        self.last_version = version;
        self
    }

    /// Whether the release was decided outside propagation
    pub fn is_independent(&self) -> bool {
        self.origin == Some(ReleaseOrigin::Independent)
    }
}

/// Release decision for one package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDecision {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_release_type: Option<ReleaseType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_release_version: Option<String>,
}

impl PackageDecision {
    pub fn is_empty(&self) -> bool {
        self.next_release_type.is_none() && self.next_release_version.is_none()
    }
}

/// Computes the version a release type produces for a package
pub trait NextVersion {
    fn next_version(&self, context: &ReleaseContext, release_type: ReleaseType) -> Result<String>;
}

/// Propagates release decisions from dependencies to dependents
#[derive(Debug, Clone, Default)]
pub struct Propagator {
    policy: ReleaseTypePolicy,
    groups: Vec<SameVersionGroup>,
}

impl Propagator {
    /// Create a propagator with a global policy
    pub fn new(policy: ReleaseTypePolicy) -> Self {
        Self {
            policy,
            groups: Vec::new(),
        }
    }

    /// Set same-version groups
    pub fn with_groups(mut self, groups: Vec<SameVersionGroup>) -> Self {
        self.groups = groups;
        self
    }

    fn policy_for(&self, package: &str) -> ReleaseTypePolicy {
        self.groups
            .iter()
            .find(|g| g.contains(package))
            .and_then(SameVersionGroup::policy)
            .unwrap_or(self.policy)
    }

    /// Decide a release for every package of `packages`.
    ///
    /// `packages` must be in topological order. `contexts` is updated in
    /// place; packages missing from it have no release of their own and get
    /// an entry once a dependency release reaches them.
    pub fn propagate(
        &self,
        packages: &PackageSet,
        contexts: &mut IndexMap<String, ReleaseContext>,
        next: &dyn NextVersion,
    ) -> Result<IndexMap<String, PackageDecision>> {
        info!(
            policy = %self.policy,
            packages = packages.len(),
            groups = self.groups.len(),
            "propagating releases"
        );
        let mut decisions: IndexMap<String, PackageDecision> = packages
            .keys()
            .map(|name| (name.clone(), PackageDecision::default()))
            .collect();

        for package in packages.values() {
            let own = contexts.get(&package.name).and_then(|c| c.release_type);
            if let Some(release_type) = own {
                decisions[package.name.as_str()].next_release_type = Some(release_type);
                continue;
            }

            // Only the first dependency with a pending release is consulted
            let source = package.dependencies.iter().find_map(|dep| {
                contexts
                    .get(&dep.name)
                    .and_then(|c| c.release_type)
                    .map(|release_type| (dep.name.clone(), release_type))
            });
            let Some((dependency, dependency_type)) = source else {
                continue;
            };

            let release_type = self.policy_for(&package.name).apply(dependency_type);
            debug!(
                package = %package.name,
                dependency = %dependency,
                dependency_type = %dependency_type,
                release_type = %release_type,
                "release propagated from dependency"
            );
            let context = contexts
                .entry(package.name.clone())
                .or_insert_with(|| ReleaseContext::new(package.name.as_str()));
            context.release_type = Some(release_type);
            context.origin = Some(ReleaseOrigin::Dependency(dependency));
            decisions[package.name.as_str()].next_release_type = Some(release_type);
        }

        for group in &self.groups {
            self.reconcile_group(group, contexts, &mut decisions, next)?;
        }

        info!(
            releasing = decisions.values().filter(|d| d.next_release_type.is_some()).count(),
            "release propagation complete"
        );
        Ok(decisions)
    }

    /// Force every pending member of `group` onto the highest candidate version
    fn reconcile_group(
        &self,
        group: &SameVersionGroup,
        contexts: &mut IndexMap<String, ReleaseContext>,
        decisions: &mut IndexMap<String, PackageDecision>,
        next: &dyn NextVersion,
    ) -> Result<()> {
        let mut pending: Vec<String> = Vec::new();
        let mut highest: Option<(semver::Version, String)> = None;

        for member in group.members() {
            let Some(context) = contexts.get(member) else {
                if !decisions.contains_key(member) {
                    warn!(package = %member, "same-version group references an unknown package");
                }
                continue;
            };
            let Some(release_type) = context.release_type else {
                continue;
            };

            let candidate = next.next_version(context, release_type)?;
            let parsed = semver::Version::parse(&candidate)
                .map_err(|e| VersionError::ParseFailed(candidate.clone(), e.to_string()))?;
            debug!(package = %member, candidate = %candidate, "same-version candidate");

            if highest.as_ref().map_or(true, |(best, _)| parsed > *best) {
                highest = Some((parsed, candidate));
            }
            pending.push(member.clone());
        }

        let Some((_, version)) = highest else {
            debug!(group = ?group.members(), "no pending release in same-version group");
            return Ok(());
        };

        info!(group = ?group.members(), version = %version, "same-version group reconciled");
        for member in pending {
            if let Some(context) = contexts.get_mut(&member) {
                context.next_version = Some(version.clone());
            }
            if let Some(decision) = decisions.get_mut(&member) {
                decision.next_release_version = Some(version.clone());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monorepo::package::{DependencyRef, Package};
    use std::collections::HashMap;

    /// Next versions looked up from a fixed table
    struct FixedVersions(HashMap<(String, ReleaseType), String>);

    impl FixedVersions {
        fn new(entries: &[(&str, ReleaseType, &str)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(n, t, v)| ((n.to_string(), *t), v.to_string()))
                    .collect(),
            )
        }
    }

    impl NextVersion for FixedVersions {
        fn next_version(&self, context: &ReleaseContext, release_type: ReleaseType) -> Result<String> {
            Ok(self
                .0
                .get(&(context.name.clone(), release_type))
                .cloned()
                .unwrap_or_else(|| "1.0.0".to_string()))
        }
    }

    fn package(name: &str, deps: &[&str]) -> Package {
        let mut package = Package::new(name, format!("packages/{}", name));
        package.dependencies = deps
            .iter()
            .map(|d| DependencyRef::new("package.json", "dependencies", *d))
            .collect();
        package
    }

    fn packages(list: Vec<Package>) -> PackageSet {
        list.into_iter().map(|p| (p.name.clone(), p)).collect()
    }

    fn contexts(
        names: &[&str],
        pending: &[(&str, ReleaseType)],
    ) -> IndexMap<String, ReleaseContext> {
        names
            .iter()
            .map(|name| {
                let mut context = ReleaseContext::new(*name);
                if let Some((_, t)) = pending.iter().find(|(n, _)| n == name) {
                    context = context.with_release_type(*t);
                }
                (name.to_string(), context)
            })
            .collect()
    }

    fn release_type(decisions: &IndexMap<String, PackageDecision>, name: &str) -> Option<ReleaseType> {
        decisions[name].next_release_type
    }

    fn propagate_pair(policy: ReleaseTypePolicy, base: ReleaseType) -> Option<ReleaseType> {
        let set = packages(vec![package("@test/base", &[]), package("@test/pkg1", &["@test/base"])]);
        let mut ctx = contexts(&["@test/base", "@test/pkg1"], &[("@test/base", base)]);
        let decisions = Propagator::new(policy)
            .propagate(&set, &mut ctx, &FixedVersions::new(&[]))
            .unwrap();
        assert_eq!(release_type(&decisions, "@test/base"), Some(base));
        release_type(&decisions, "@test/pkg1")
    }

    #[test]
    fn test_dependency_release_propagates_as_patch_by_default() {
        assert_eq!(
            propagate_pair(ReleaseTypePolicy::default(), ReleaseType::Patch),
            Some(ReleaseType::Patch)
        );
        assert_eq!(
            propagate_pair(ReleaseTypePolicy::default(), ReleaseType::Major),
            Some(ReleaseType::Patch)
        );
    }

    #[test]
    fn test_follow_policy() {
        for t in [ReleaseType::Patch, ReleaseType::Minor, ReleaseType::Major] {
            assert_eq!(propagate_pair(ReleaseTypePolicy::Follow, t), Some(t));
        }
    }

    #[test]
    fn test_follow_major_policy() {
        let policy = ReleaseTypePolicy::FollowMajor;
        assert_eq!(propagate_pair(policy, ReleaseType::Patch), Some(ReleaseType::Patch));
        assert_eq!(propagate_pair(policy, ReleaseType::Minor), Some(ReleaseType::Patch));
        assert_eq!(propagate_pair(policy, ReleaseType::Major), Some(ReleaseType::Major));
    }

    #[test]
    fn test_transitive_propagation() {
        let set = packages(vec![
            package("@test/base", &[]),
            package("@test/pkg1", &["@test/base"]),
            package("@test/pkg2", &["@test/pkg1"]),
        ]);
        let mut ctx = contexts(
            &["@test/base", "@test/pkg1", "@test/pkg2"],
            &[("@test/base", ReleaseType::Minor)],
        );

        let decisions = Propagator::new(ReleaseTypePolicy::Follow)
            .propagate(&set, &mut ctx, &FixedVersions::new(&[]))
            .unwrap();

        for name in ["@test/base", "@test/pkg1", "@test/pkg2"] {
            assert_eq!(release_type(&decisions, name), Some(ReleaseType::Minor));
        }
        assert_eq!(
            ctx["@test/pkg2"].origin,
            Some(ReleaseOrigin::Dependency("@test/pkg1".to_string()))
        );
    }

    #[test]
    fn test_transitive_propagation_with_partial_contexts() {
        let set = packages(vec![
            package("@test/base", &[]),
            package("@test/pkg1", &["@test/base"]),
            package("@test/pkg2", &["@test/pkg1"]),
        ]);
        let mut ctx = contexts(&["@test/base"], &[("@test/base", ReleaseType::Patch)]);

        let decisions = Propagator::default()
            .propagate(&set, &mut ctx, &FixedVersions::new(&[]))
            .unwrap();

        assert_eq!(release_type(&decisions, "@test/pkg1"), Some(ReleaseType::Patch));
        assert_eq!(release_type(&decisions, "@test/pkg2"), Some(ReleaseType::Patch));
        assert_eq!(
            ctx["@test/pkg2"].origin,
            Some(ReleaseOrigin::Dependency("@test/pkg1".to_string()))
        );
    }

    #[test]
    fn test_no_spurious_release() {
        let set = packages(vec![package("@test/base", &[]), package("@test/pkg1", &["@test/base"])]);
        let mut ctx = contexts(&["@test/base", "@test/pkg1"], &[]);

        let decisions = Propagator::default()
            .propagate(&set, &mut ctx, &FixedVersions::new(&[]))
            .unwrap();

        assert!(decisions.values().all(PackageDecision::is_empty));
    }

    #[test]
    fn test_independent_release_is_not_overridden() {
        let set = packages(vec![package("@test/base", &[]), package("@test/pkg1", &["@test/base"])]);
        let mut ctx = contexts(
            &["@test/base", "@test/pkg1"],
            &[("@test/base", ReleaseType::Major), ("@test/pkg1", ReleaseType::Minor)],
        );

        let decisions = Propagator::new(ReleaseTypePolicy::Follow)
            .propagate(&set, &mut ctx, &FixedVersions::new(&[]))
            .unwrap();

        assert_eq!(release_type(&decisions, "@test/pkg1"), Some(ReleaseType::Minor));
        assert!(ctx["@test/pkg1"].is_independent());
    }

    #[test]
    fn test_only_first_releasing_dependency_counts() {
        let set = packages(vec![
            package("a", &[]),
            package("b", &[]),
            package("app", &["a", "b"]),
        ]);
        let mut ctx = contexts(
            &["a", "b", "app"],
            &[("a", ReleaseType::Patch), ("b", ReleaseType::Major)],
        );

        let decisions = Propagator::new(ReleaseTypePolicy::Follow)
            .propagate(&set, &mut ctx, &FixedVersions::new(&[]))
            .unwrap();

        assert_eq!(release_type(&decisions, "app"), Some(ReleaseType::Patch));
    }

    #[test]
    fn test_same_version_group_takes_highest_candidate() {
        let set = packages(vec![package("@test/base", &[]), package("@test/pkg1", &["@test/base"])]);
        let mut ctx = contexts(
            &["@test/base", "@test/pkg1"],
            &[("@test/base", ReleaseType::Patch), ("@test/pkg1", ReleaseType::Patch)],
        );
        let next = FixedVersions::new(&[
            ("@test/base", ReleaseType::Patch, "2.0.1"),
            ("@test/pkg1", ReleaseType::Patch, "1.10.0"),
        ]);

        let decisions = Propagator::default()
            .with_groups(vec![SameVersionGroup::from(vec![
                "@test/base".to_string(),
                "@test/pkg1".to_string(),
            ])])
            .propagate(&set, &mut ctx, &next)
            .unwrap();

        assert_eq!(decisions["@test/base"].next_release_version.as_deref(), Some("2.0.1"));
        assert_eq!(decisions["@test/pkg1"].next_release_version.as_deref(), Some("2.0.1"));
        assert_eq!(ctx["@test/pkg1"].next_version.as_deref(), Some("2.0.1"));
    }

    #[test]
    fn test_same_version_comparison_is_numeric() {
        let set = packages(vec![package("a", &[]), package("b", &[])]);
        let mut ctx = contexts(&["a", "b"], &[("a", ReleaseType::Patch), ("b", ReleaseType::Patch)]);
        let next = FixedVersions::new(&[
            ("a", ReleaseType::Patch, "1.9.0"),
            ("b", ReleaseType::Patch, "1.10.0"),
        ]);

        let decisions = Propagator::default()
            .with_groups(vec![SameVersionGroup::from(vec!["a".to_string(), "b".to_string()])])
            .propagate(&set, &mut ctx, &next)
            .unwrap();

        assert_eq!(decisions["a"].next_release_version.as_deref(), Some("1.10.0"));
    }

    #[test]
    fn test_group_member_without_release_is_not_started() {
        let set = packages(vec![package("a", &[]), package("b", &[])]);
        let mut ctx = contexts(&["a", "b"], &[("a", ReleaseType::Minor)]);
        let next = FixedVersions::new(&[("a", ReleaseType::Minor, "1.1.0")]);

        let decisions = Propagator::default()
            .with_groups(vec![SameVersionGroup::from(vec!["a".to_string(), "b".to_string()])])
            .propagate(&set, &mut ctx, &next)
            .unwrap();

        assert_eq!(decisions["a"].next_release_version.as_deref(), Some("1.1.0"));
        assert!(decisions["b"].is_empty());
        assert!(ctx["b"].next_version.is_none());
    }

    #[test]
    fn test_inactive_or_unknown_group_is_noop() {
        let set = packages(vec![package("a", &[]), package("b", &[])]);
        let mut ctx = contexts(&["a", "b"], &[]);

        let decisions = Propagator::default()
            .with_groups(vec![
                SameVersionGroup::from(vec!["a".to_string(), "b".to_string()]),
                SameVersionGroup::from(vec!["ghost".to_string(), "phantom".to_string()]),
            ])
            .propagate(&set, &mut ctx, &FixedVersions::new(&[]))
            .unwrap();

        assert!(decisions.values().all(PackageDecision::is_empty));
    }

    #[test]
    fn test_group_policy_overrides_global_policy() {
        let set = packages(vec![package("base", &[]), package("app", &["base"])]);
        let mut ctx = contexts(&["base", "app"], &[("base", ReleaseType::Minor)]);

        let decisions = Propagator::new(ReleaseTypePolicy::Patch)
            .with_groups(vec![SameVersionGroup::Detailed {
                packages: vec!["app".to_string(), "other".to_string()],
                release_types: Some(ReleaseTypePolicy::Follow),
            }])
            .propagate(&set, &mut ctx, &FixedVersions::new(&[]))
            .unwrap();

        assert_eq!(release_type(&decisions, "app"), Some(ReleaseType::Minor));
    }

    #[test]
    fn test_decision_serializes_camel_case() {
        let decision = PackageDecision {
            next_release_type: Some(ReleaseType::Patch),
            next_release_version: None,
        };
        assert_eq!(
            serde_json::to_string(&decision).unwrap(),
            r#"{"nextReleaseType":"patch"}"#
        );
    }
}
