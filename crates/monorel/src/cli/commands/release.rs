//! Release command

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::{info, warn};

use monorel_adapters::{LockfileOutcome, LockfileRegistry, LockfileReport};
use monorel_core::ReleaseType;

use crate::cli::output;
use crate::cli::workspace::parse_bump;
use crate::cli::{Cli, OutputFormat, Workspace};

/// Rewrite manifests and update lock files
#[derive(Debug, Args)]
pub struct ReleaseCommand {
    /// Release a package, as <package>=<major|minor|patch>
    #[arg(short, long = "bump", value_parser = parse_bump)]
    pub bumps: Vec<(String, ReleaseType)>,

    /// Prerelease channel (overrides branch.channel)
    #[arg(long)]
    pub channel: Option<String>,

    /// Dry run - don't write any files
    #[arg(long)]
    pub dry_run: bool,

    /// Skip lock file updates
    #[arg(long)]
    pub no_lockfile: bool,
}

#[derive(Debug, Serialize)]
struct ReleaseOutput {
    dry_run: bool,
    versions: indexmap::IndexMap<String, String>,
    manifests: Vec<String>,
    lockfiles: Vec<LockfileReport>,
}

impl ReleaseCommand {
    /// Execute the release command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            bumps = self.bumps.len(),
            channel = ?self.channel,
            dry_run = self.dry_run,
            no_lockfile = self.no_lockfile,
            "executing release command"
        );
        let workspace = Workspace::load()?;
        let plan = workspace.plan(&self.bumps, self.channel.as_deref())?;

        if plan.releasing().is_empty() {
            if cli.format == OutputFormat::Text && !cli.quiet {
                output::info("No packages to release");
            } else if cli.format == OutputFormat::Json {
                output::json(&ReleaseOutput {
                    dry_run: self.dry_run,
                    versions: Default::default(),
                    manifests: Vec::new(),
                    lockfiles: Vec::new(),
                })?;
            }
            return Ok(());
        }

        let writes = plan.apply(&workspace.store(), self.dry_run)?;

        let lockfiles = if self.dry_run || self.no_lockfile || !workspace.config.lockfile.enabled {
            Vec::new()
        } else {
            let registry = LockfileRegistry::from_names(&workspace.config.lockfile.tools)?;
            registry.update_all(&workspace.root, &plan.affected_packages())
        };

        let result = ReleaseOutput {
            dry_run: self.dry_run,
            versions: plan.versions(),
            manifests: writes
                .iter()
                .map(|w| w.dir.join(&w.file).display().to_string())
                .collect(),
            lockfiles,
        };

        match cli.format {
            OutputFormat::Json => output::json(&result)?,
            OutputFormat::Text => print_release(&result, cli.quiet),
        }
        Ok(())
    }
}

fn print_release(result: &ReleaseOutput, quiet: bool) {
    if result.dry_run {
        output::warning("Dry run - no files were written");
    }
    if !quiet {
        println!("{}", output::header("Versions"));
        for (name, version) in &result.versions {
            println!(
                "  {} {}",
                output::package_style().apply_to(name),
                output::version_style().apply_to(version)
            );
        }
        println!();
        println!("{}", output::header("Manifests"));
        for path in &result.manifests {
            println!("  {}", output::path_style().apply_to(path));
        }
    }

    for report in &result.lockfiles {
        match &report.outcome {
            LockfileOutcome::Updated => {
                output::success(&format!("Updated {} lock file", report.updater));
            }
            LockfileOutcome::Skipped(reason) => {
                if !quiet {
                    println!("  {} {} lock file: {}", style("-").dim(), report.updater, reason);
                }
            }
            LockfileOutcome::Failed(reason) => {
                warn!(updater = report.updater, reason = %reason, "lock file not updated");
                output::warning(&format!("{} lock file not updated: {}", report.updater, reason));
            }
        }
    }

    if !result.dry_run {
        output::success(&format!("Prepared {} package(s) for release", result.versions.len()));
    }
}
