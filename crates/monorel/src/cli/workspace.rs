//! Repository context shared by commands

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use monorel_core::config::{load_config_or_default, Config};
use monorel_core::monorepo::discover_locations;
use monorel_core::{
    FsManifestStore, ManifestFormats, PackageLocation, ReleasePlan, ReleaseRequest, ReleaseType,
};
use monorel_strategies::SemVerNextVersion;
use tracing::debug;

/// The repository a command runs against
pub struct Workspace {
    /// Repository root: the configuration file's directory, else the working directory
    pub root: PathBuf,
    /// Loaded configuration
    pub config: Config,
    /// Configuration file, when one was found
    pub config_path: Option<PathBuf>,
    /// Package locations from configuration and workspace globs
    pub locations: IndexMap<String, PackageLocation>,
}

impl Workspace {
    /// Load configuration and discover packages under the current directory
    pub fn load() -> anyhow::Result<Self> {
        let cwd = std::env::current_dir()?;
        let (config, config_path) = load_config_or_default(&cwd)?;
        let root = config_path
            .as_deref()
            .and_then(config_root)
            .unwrap_or(cwd);
        let locations = discover_locations(&root, &config, &ManifestFormats::standard())?;
        debug!(root = %root.display(), packages = locations.len(), "workspace loaded");

        Ok(Self {
            root,
            config,
            config_path,
            locations,
        })
    }

    /// Manifest store rooted at the repository
    pub fn store(&self) -> FsManifestStore {
        FsManifestStore::new(&self.root)
    }

    /// Build a release plan for `bumps`
    pub fn plan(
        &self,
        bumps: &[(String, ReleaseType)],
        channel: Option<&str>,
    ) -> anyhow::Result<ReleasePlan> {
        let mut request = ReleaseRequest::new();
        for (name, release_type) in bumps {
            request = request.with_release(name.clone(), *release_type);
        }
        if let Some(channel) = channel {
            request = request.with_channel(channel);
        }

        let plan = ReleasePlan::build(
            &self.config,
            &self.store(),
            &self.locations,
            &request,
            &SemVerNextVersion::default(),
        )?;
        Ok(plan)
    }
}

/// Directory a configuration file belongs to, looking through `.github/`
fn config_root(config_path: &Path) -> Option<PathBuf> {
    let dir = config_path.parent()?;
    if dir.file_name().is_some_and(|n| n == ".github") {
        return dir.parent().map(Path::to_path_buf);
    }
    Some(dir.to_path_buf())
}

/// Parse a `name=type` release request
pub fn parse_bump(value: &str) -> Result<(String, ReleaseType), String> {
    let (name, release_type) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("expected <package>=<type>, got '{}'", value))?;
    if name.is_empty() {
        return Err(format!("missing package name in '{}'", value));
    }
    Ok((name.to_string(), release_type.parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bump() {
        assert_eq!(
            parse_bump("@test/base=minor").unwrap(),
            ("@test/base".to_string(), ReleaseType::Minor)
        );
        assert!(parse_bump("@test/base").is_err());
        assert!(parse_bump("=patch").is_err());
        assert!(parse_bump("base=huge").is_err());
    }

    #[test]
    fn test_config_root() {
        assert_eq!(
            config_root(Path::new("/repo/monorel.yaml")),
            Some(PathBuf::from("/repo"))
        );
        assert_eq!(
            config_root(Path::new("/repo/.github/monorel.yaml")),
            Some(PathBuf::from("/repo"))
        );
    }
}
