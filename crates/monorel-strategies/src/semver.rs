//! SemVer version strategy

use monorel_core::error::{Result, VersionError};
use monorel_core::ReleaseType;

use crate::traits::VersionStrategy;
use crate::types::VersionComponents;

/// Semantic Versioning strategy
///
/// Follows the SemVer 2.0.0 specification: https://semver.org/
pub struct SemVerStrategy {
    /// Version given to packages without a release
    pub initial: VersionComponents,
}

impl SemVerStrategy {
    /// Create a new SemVer strategy
    pub fn new() -> Self {
        Self {
            initial: VersionComponents::new(1, 0, 0),
        }
    }

    /// Set the first release version
    pub fn with_initial(mut self, initial: VersionComponents) -> Self {
        self.initial = initial;
        self
    }

    fn stable_bump(current: &VersionComponents, release_type: ReleaseType) -> VersionComponents {
        let mut result = current.clone();
        match release_type {
            ReleaseType::Major => {
                result.major += 1;
                result.minor = 0;
                result.patch = 0;
            }
            ReleaseType::Minor => {
                result.minor += 1;
                result.patch = 0;
            }
            ReleaseType::Patch => {
                // A prerelease ships as its own stable version
                if result.prerelease.is_none() {
                    result.patch += 1;
                }
            }
        }
        result.prerelease = None;
        result.build = None;
        result
    }
}

impl Default for SemVerStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionStrategy for SemVerStrategy {
    fn name(&self) -> &'static str {
        "semver"
    }

    fn parse(&self, version: &str) -> Result<VersionComponents> {
        // Strip leading 'v' if present
        let version = version.strip_prefix('v').unwrap_or(version);

        let v = semver::Version::parse(version)
            .map_err(|e| VersionError::ParseFailed(version.to_string(), e.to_string()))?;

        Ok(VersionComponents {
            major: v.major,
            minor: v.minor,
            patch: v.patch,
            prerelease: (!v.pre.is_empty()).then(|| v.pre.to_string()),
            build: (!v.build.is_empty()).then(|| v.build.to_string()),
        })
    }

    fn format(&self, components: &VersionComponents) -> String {
        components.to_version_string()
    }

    fn first_release(&self, channel: Option<&str>) -> VersionComponents {
        match channel {
            Some(channel) => self.initial.clone().with_prerelease(format!("{}.1", channel)),
            None => self.initial.clone(),
        }
    }

    fn bump(
        &self,
        current: &VersionComponents,
        release_type: ReleaseType,
        channel: Option<&str>,
    ) -> Result<VersionComponents> {
        let Some(channel) = channel else {
            return Ok(Self::stable_bump(current, release_type));
        };

        if let Some((current_channel, counter)) = current.prerelease_channel() {
            if current_channel == channel {
                let mut result = current.clone();
                result.prerelease = Some(format!("{}.{}", channel, counter.unwrap_or(0) + 1));
                result.build = None;
                return Ok(result);
            }
        }

        Ok(Self::stable_bump(current, release_type).with_prerelease(format!("{}.1", channel)))
    }
}
