//! Package location discovery from configuration

use std::path::{Path, PathBuf};

use glob::glob;
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{ConfigError, Result};

use super::manifest::ManifestFormats;
use super::package::PackageLocation;

/// Collect package locations from explicit `packages` and `workspaces` globs.
///
/// Explicit entries come first, in configuration order. Workspace matches
/// follow in glob order; only directories holding a supported manifest are
/// kept, and directories already listed explicitly are skipped.
pub fn discover_locations(
    root: &Path,
    config: &Config,
    formats: &ManifestFormats,
) -> Result<IndexMap<String, PackageLocation>> {
    debug!(
        packages = config.packages.len(),
        workspaces = config.workspaces.len(),
        "discovering packages"
    );
    let mut locations: IndexMap<String, PackageLocation> = IndexMap::new();

    for package in &config.packages {
        locations.insert(
            package.name.clone(),
            PackageLocation::new(&package.name, &package.path),
        );
    }

    for pattern in &config.workspaces {
        let full_pattern = root.join(pattern).to_string_lossy().to_string();
        let entries = glob(&full_pattern).map_err(|e| ConfigError::InvalidValue {
            field: "workspaces".to_string(),
            message: e.to_string(),
        })?;

        for entry in entries {
            let path = entry.map_err(|e| ConfigError::InvalidValue {
                field: "workspaces".to_string(),
                message: e.to_string(),
            })?;
            if !path.is_dir() || !formats.any_exists(&path) {
                continue;
            }

            let relative = relative_to(root, &path);
            if locations.values().any(|l| l.path == relative) {
                continue;
            }

            let name = relative
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| relative.to_string_lossy().to_string());
            let key = if locations.contains_key(&name) {
                relative.to_string_lossy().to_string()
            } else {
                name.clone()
            };
            debug!(package = %name, path = %relative.display(), "discovered package");
            locations.insert(key, PackageLocation::new(name, relative));
        }
    }

    info!(count = locations.len(), "discovered package locations");
    Ok(locations)
}

fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PackageConfig;
    use tempfile::TempDir;

    fn write(root: &Path, dir: &str, file: &str, content: &str) {
        let dir = root.join(dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(file), content).unwrap();
    }

    #[test]
    fn test_explicit_packages_first() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "packages/web", "package.json", r#"{"name":"web"}"#);

        let config = Config {
            packages: vec![PackageConfig {
                name: "@test/base".to_string(),
                path: PathBuf::from("lib/base"),
            }],
            workspaces: vec!["packages/*".to_string()],
            ..Default::default()
        };

        let locations =
            discover_locations(temp.path(), &config, &ManifestFormats::standard()).unwrap();

        let keys: Vec<_> = locations.keys().cloned().collect();
        assert_eq!(keys, vec!["@test/base", "web"]);
        assert_eq!(locations["web"].path, PathBuf::from("packages/web"));
    }

    #[test]
    fn test_workspace_skips_directories_without_manifest() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "packages/api", "composer.json", r#"{"name":"t/api"}"#);
        write(temp.path(), "packages/docs", "README.md", "docs");

        let config = Config {
            workspaces: vec!["packages/*".to_string()],
            ..Default::default()
        };

        let locations =
            discover_locations(temp.path(), &config, &ManifestFormats::standard()).unwrap();

        assert_eq!(locations.len(), 1);
        assert!(locations.contains_key("api"));
    }

    #[test]
    fn test_explicit_path_not_duplicated() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "packages/base", "package.json", r#"{"name":"@test/base"}"#);

        let config = Config {
            packages: vec![PackageConfig {
                name: "@test/base".to_string(),
                path: PathBuf::from("packages/base"),
            }],
            workspaces: vec!["packages/*".to_string()],
            ..Default::default()
        };

        let locations =
            discover_locations(temp.path(), &config, &ManifestFormats::standard()).unwrap();

        assert_eq!(locations.len(), 1);
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let temp = TempDir::new().unwrap();
        let config = Config {
            workspaces: vec!["packages/[".to_string()],
            ..Default::default()
        };

        let result = discover_locations(temp.path(), &config, &ManifestFormats::standard());
        assert!(result.is_err());
    }
}
