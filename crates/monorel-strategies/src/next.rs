//! Next-version computation backed by a version strategy

use monorel_core::error::Result;
use monorel_core::{NextVersion, ReleaseContext, ReleaseType};
use tracing::debug;

use crate::semver::SemVerStrategy;
use crate::traits::VersionStrategy;

/// [`NextVersion`] using a package's last released version and a strategy
pub struct StrategyNextVersion<S: VersionStrategy> {
    strategy: S,
}

/// Next versions following SemVer
pub type SemVerNextVersion = StrategyNextVersion<SemVerStrategy>;

impl<S: VersionStrategy> StrategyNextVersion<S> {
    pub fn new(strategy: S) -> Self {
        Self { strategy }
    }
}

impl Default for SemVerNextVersion {
    fn default() -> Self {
        Self::new(SemVerStrategy::new())
    }
}

impl<S: VersionStrategy> NextVersion for StrategyNextVersion<S> {
    fn next_version(&self, context: &ReleaseContext, release_type: ReleaseType) -> Result<String> {
        let channel = context.channel.as_deref();
        let next = match context.last_version.as_deref() {
            Some(last) => {
                let current = self.strategy.parse(last)?;
                self.strategy.bump(&current, release_type, channel)?
            }
            None => self.strategy.first_release(channel),
        };
        let next = self.strategy.format(&next);

        debug!(
            strategy = self.strategy.name(),
            package = %context.name,
            last = ?context.last_version,
            release_type = %release_type,
            next = %next,
            "computed next version"
        );
        Ok(next)
    }
}
