//! Init command

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use monorel_core::config::defaults::{DEFAULT_CONFIG_TEMPLATE, DEFAULT_CONFIG_YAML};
use monorel_core::config::{validate_config, Config};

use crate::cli::Cli;

/// Initialize a new monorel configuration
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Write TOML instead of YAML
    #[arg(long)]
    pub toml: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, toml = self.toml, "executing init command");
        let cwd = std::env::current_dir()?;
        let config_path = self
            .output
            .clone()
            .unwrap_or_else(|| cwd.join(DEFAULT_CONFIG_YAML));
        let config_path = if self.toml && config_path.extension().is_some_and(|e| e == "yaml") {
            config_path.with_extension("toml")
        } else {
            config_path
        };

        if config_path.exists() && !self.force {
            anyhow::bail!(
                "Configuration file already exists at {}. Use --force to overwrite.",
                config_path.display()
            );
        }

        let content = render_template(self.toml)?;
        std::fs::write(&config_path, &content)?;

        if !cli.quiet {
            println!(
                "{} Created configuration at {}",
                style("✓").green().bold(),
                style(config_path.display()).cyan()
            );
            println!();
            println!("Next steps:");
            println!("  1. List your packages or workspace globs in {}", config_path.display());
            println!("  2. Run {} to check the dependency order", style("monorel graph").cyan());
            println!(
                "  3. Run {} to preview a release",
                style("monorel plan --bump <package>=patch").cyan()
            );
        }

        Ok(())
    }
}

/// Default configuration as YAML or TOML
fn render_template(toml: bool) -> anyhow::Result<String> {
    let config: Config = serde_yaml::from_str(DEFAULT_CONFIG_TEMPLATE)?;
    validate_config(&config)?;
    if toml {
        Ok(toml::to_string_pretty(&config)?)
    } else {
        Ok(DEFAULT_CONFIG_TEMPLATE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_template_parses_back() {
        let content = render_template(true).unwrap();
        let config: Config = toml::from_str(&content).unwrap();
        assert_eq!(config.workspaces, vec!["packages/*".to_string()]);
        assert_eq!(config.manifests.range_prefix, "^");
    }

    #[test]
    fn test_yaml_template_is_verbatim() {
        assert_eq!(render_template(false).unwrap(), DEFAULT_CONFIG_TEMPLATE);
    }
}
