//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::ReleaseTypePolicy;

/// Main configuration for monorel
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Version of the config schema
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Explicitly listed packages
    pub packages: Vec<PackageConfig>,

    /// Glob patterns matching package directories
    pub workspaces: Vec<String>,

    /// How a dependency release propagates to dependents
    pub release_types: ReleaseTypePolicy,

    /// Groups of packages that always ship at the same version
    pub same_versions: Vec<SameVersionGroup>,

    /// Manifest handling
    pub manifests: ManifestsConfig,

    /// Release branch configuration
    pub branch: BranchConfig,

    /// Lock file updates
    pub lockfile: LockfileConfig,
}

/// A package supplied by configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageConfig {
    /// Package name
    pub name: String,

    /// Package directory relative to the repository root
    pub path: PathBuf,
}

/// A same-version group, either a bare member list or a member list with its own policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SameVersionGroup {
    /// Plain list of package names
    Members(Vec<String>),
    /// Member list with a group-scoped release type policy
    Detailed {
        packages: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        release_types: Option<ReleaseTypePolicy>,
    },
}

impl SameVersionGroup {
    /// Package names in this group
    pub fn members(&self) -> &[String] {
        match self {
            Self::Members(members) => members,
            Self::Detailed { packages, .. } => packages,
        }
    }

    /// Group-scoped policy, if any
    pub fn policy(&self) -> Option<ReleaseTypePolicy> {
        match self {
            Self::Members(_) => None,
            Self::Detailed { release_types, .. } => *release_types,
        }
    }

    /// Whether the group lists `name`
    pub fn contains(&self, name: &str) -> bool {
        self.members().iter().any(|m| m == name)
    }
}

impl From<Vec<String>> for SameVersionGroup {
    fn from(members: Vec<String>) -> Self {
        Self::Members(members)
    }
}

/// What to do when two manifests in one directory declare different names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameCollisionPolicy {
    /// The last manifest format processed decides the name
    #[default]
    LastWins,
    /// Disagreeing names fail the run
    Error,
}

/// Manifest handling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestsConfig {
    /// Name collision policy for dual-format packages
    pub name_collision: NameCollisionPolicy,

    /// Prefix written in front of rewritten dependency versions
    pub range_prefix: String,
}

impl Default for ManifestsConfig {
    fn default() -> Self {
        Self {
            name_collision: NameCollisionPolicy::default(),
            range_prefix: "^".to_string(),
        }
    }
}

/// Release branch configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchConfig {
    /// Prerelease channel (e.g. "beta"); stable when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

/// Lock file update configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LockfileConfig {
    /// Whether to update lock files after writing manifests
    pub enabled: bool,

    /// Lock file tools to run, by name
    pub tools: Vec<String>,
}

impl Default for LockfileConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tools: vec!["npm".to_string(), "composer".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.release_types, ReleaseTypePolicy::Patch);
        assert!(config.same_versions.is_empty());
        assert_eq!(config.manifests.range_prefix, "^");
        assert!(config.lockfile.enabled);
    }

    #[test]
    fn test_same_version_group_forms() {
        let yaml = r#"
same_versions:
  - [base, pkg1]
  - packages: [pkg2, pkg3]
    release_types: follow
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.same_versions.len(), 2);
        assert_eq!(config.same_versions[0].members(), ["base", "pkg1"]);
        assert_eq!(config.same_versions[0].policy(), None);
        assert_eq!(
            config.same_versions[1].policy(),
            Some(ReleaseTypePolicy::Follow)
        );
    }

    #[test]
    fn test_name_collision_policy_from_toml() {
        let config: Config = toml::from_str("[manifests]\nname_collision = \"error\"\n").unwrap();
        assert_eq!(config.manifests.name_collision, NameCollisionPolicy::Error);
        assert_eq!(config.manifests.range_prefix, "^");
    }
}
