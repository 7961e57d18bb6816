//! Version strategy types

use serde::{Deserialize, Serialize};

/// Version components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionComponents {
    /// Major version
    pub major: u64,
    /// Minor version
    pub minor: u64,
    /// Patch version
    pub patch: u64,
    /// Pre-release identifier
    pub prerelease: Option<String>,
    /// Build metadata
    pub build: Option<String>,
}

impl VersionComponents {
    /// Create new version components
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: None,
            build: None,
        }
    }

    /// Set prerelease
    pub fn with_prerelease(mut self, prerelease: impl Into<String>) -> Self {
        self.prerelease = Some(prerelease.into());
        self
    }

    /// Split the prerelease into channel and counter.
    ///
    /// `beta.3` is `("beta", Some(3))`, `beta` is `("beta", None)`.
    pub fn prerelease_channel(&self) -> Option<(&str, Option<u64>)> {
        let pre = self.prerelease.as_deref()?;
        match pre.rsplit_once('.') {
            Some((channel, counter)) => match counter.parse::<u64>() {
                Ok(n) => Some((channel, Some(n))),
                Err(_) => Some((pre, None)),
            },
            None => Some((pre, None)),
        }
    }

    /// Convert to string representation
    pub fn to_version_string(&self) -> String {
        let mut v = format!("{}.{}.{}", self.major, self.minor, self.patch);

        if let Some(pre) = &self.prerelease {
            v.push('-');
            v.push_str(pre);
        }

        if let Some(build) = &self.build {
            v.push('+');
            v.push_str(build);
        }

        v
    }
}

impl std::fmt::Display for VersionComponents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_version_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let v = VersionComponents::new(1, 2, 3).with_prerelease("beta.1");
        assert_eq!(v.to_string(), "1.2.3-beta.1");
    }

    #[test]
    fn test_prerelease_channel() {
        let v = VersionComponents::new(1, 0, 0).with_prerelease("beta.3");
        assert_eq!(v.prerelease_channel(), Some(("beta", Some(3))));

        let v = VersionComponents::new(1, 0, 0).with_prerelease("rc");
        assert_eq!(v.prerelease_channel(), Some(("rc", None)));

        let v = VersionComponents::new(1, 0, 0).with_prerelease("next.alpha");
        assert_eq!(v.prerelease_channel(), Some(("next.alpha", None)));

        assert_eq!(VersionComponents::new(1, 0, 0).prerelease_channel(), None);
    }
}
