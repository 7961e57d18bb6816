//! Core types for monorel

use serde::{Deserialize, Serialize};

/// Bump magnitude of a release
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    /// Patch version bump (bug fixes)
    Patch,
    /// Minor version bump (new features)
    Minor,
    /// Major version bump (breaking changes)
    Major,
}

impl ReleaseType {
    /// Returns the string representation of the release type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
        }
    }
}

impl std::fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReleaseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "patch" => Ok(Self::Patch),
            _ => Err(format!("Unknown release type: {}", s)),
        }
    }
}

/// How a dependency's bump magnitude maps onto its dependents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseTypePolicy {
    /// Copy the dependency's magnitude verbatim
    Follow,
    /// Copy `major`, otherwise `patch`
    FollowMajor,
    /// Always `patch`
    #[default]
    Patch,
}

impl ReleaseTypePolicy {
    /// Release type a dependent receives when a dependency releases with `dependency`
    pub fn apply(&self, dependency: ReleaseType) -> ReleaseType {
        match self {
            Self::Follow => dependency,
            Self::FollowMajor if dependency == ReleaseType::Major => ReleaseType::Major,
            Self::FollowMajor | Self::Patch => ReleaseType::Patch,
        }
    }

    /// Returns the string representation of the policy
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::FollowMajor => "follow-major",
            Self::Patch => "patch",
        }
    }
}

impl std::fmt::Display for ReleaseTypePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReleaseTypePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "follow" => Ok(Self::Follow),
            "follow-major" => Ok(Self::FollowMajor),
            "patch" => Ok(Self::Patch),
            _ => Err(format!("Unknown release type policy: {}", s)),
        }
    }
}
