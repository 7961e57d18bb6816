//! Version strategy traits

use monorel_core::error::Result;
use monorel_core::ReleaseType;

use crate::types::VersionComponents;

/// Trait for version strategies
pub trait VersionStrategy: Send + Sync {
    /// Get the name of this strategy
    fn name(&self) -> &'static str;

    /// Parse a version string into components
    fn parse(&self, version: &str) -> Result<VersionComponents>;

    /// Format version components into a string
    fn format(&self, components: &VersionComponents) -> String;

    /// Version of a package that was never released
    fn first_release(&self, channel: Option<&str>) -> VersionComponents;

    /// Bump the version, optionally onto a prerelease channel
    fn bump(
        &self,
        current: &VersionComponents,
        release_type: ReleaseType,
        channel: Option<&str>,
    ) -> Result<VersionComponents>;
}
