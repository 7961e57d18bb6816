//! Configuration validation

use std::collections::HashSet;

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_packages(config)?;
    validate_same_versions(config)?;
    validate_lockfile(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_packages(config: &Config) -> Result<()> {
    if !config.packages.is_empty() {
        debug!(count = config.packages.len(), "validating packages");
    }
    let mut seen = HashSet::new();
    for (i, package) in config.packages.iter().enumerate() {
        if package.name.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: format!("packages[{}].name", i),
                message: "package name cannot be empty".to_string(),
            }
            .into());
        }

        if package.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: format!("packages[{}].path", i),
                message: "package path cannot be empty".to_string(),
            }
            .into());
        }

        if !seen.insert(package.name.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: format!("packages[{}].name", i),
                message: format!("duplicate package name '{}'", package.name),
            }
            .into());
        }
    }

    Ok(())
}

fn validate_same_versions(config: &Config) -> Result<()> {
    let mut grouped = HashSet::new();
    for (i, group) in config.same_versions.iter().enumerate() {
        if group.members().len() < 2 {
            return Err(ConfigError::InvalidValue {
                field: format!("same_versions[{}]", i),
                message: "a same-version group needs at least two packages".to_string(),
            }
            .into());
        }

        for member in group.members() {
            if !grouped.insert(member.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: format!("same_versions[{}]", i),
                    message: format!("package '{}' is listed in more than one group", member),
                }
                .into());
            }
        }
    }

    Ok(())
}

fn validate_lockfile(config: &Config) -> Result<()> {
    let valid_tools = ["npm", "composer"];
    for tool in &config.lockfile.tools {
        if !valid_tools.contains(&tool.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "lockfile.tools".to_string(),
                message: format!("must be one of: {}", valid_tools.join(", ")),
            }
            .into());
        }
    }

    Ok(())
}
