//! Plan command

use clap::Args;
use console::style;
use tracing::info;

use monorel_core::workflow::PackagePlan;
use monorel_core::ReleaseType;

use crate::cli::output;
use crate::cli::workspace::parse_bump;
use crate::cli::{Cli, OutputFormat, Workspace};

/// Show the release decision for every package
#[derive(Debug, Args)]
pub struct PlanCommand {
    /// Release a package, as <package>=<major|minor|patch>
    #[arg(short, long = "bump", value_parser = parse_bump)]
    pub bumps: Vec<(String, ReleaseType)>,

    /// Prerelease channel (overrides branch.channel)
    #[arg(long)]
    pub channel: Option<String>,

    /// Include packages without a release
    #[arg(short, long)]
    pub all: bool,
}

impl PlanCommand {
    /// Execute the plan command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(bumps = self.bumps.len(), channel = ?self.channel, "executing plan command");
        let workspace = Workspace::load()?;
        let plan = workspace.plan(&self.bumps, self.channel.as_deref())?;

        let summary: Vec<PackagePlan> = plan
            .summary()
            .into_iter()
            .filter(|p| self.all || p.decision.next_release_type.is_some())
            .collect();

        match cli.format {
            OutputFormat::Json => output::json(&summary)?,
            OutputFormat::Text => print_plan(&summary, cli.quiet),
        }
        Ok(())
    }
}

fn print_plan(summary: &[PackagePlan], quiet: bool) {
    if summary.iter().all(|p| p.decision.next_release_type.is_none()) {
        output::info("No packages to release");
        return;
    }
    if !quiet {
        println!("{}", output::header("Release Plan"));
        println!();
    }

    for package in summary {
        let name = output::package_style().apply_to(&package.name);
        let Some(release_type) = package.decision.next_release_type else {
            println!("  {} {}", name, style("unchanged").dim());
            continue;
        };
        let last = package.last_version.as_deref().unwrap_or("unreleased");
        let next = package.next_version.as_deref().unwrap_or("?");
        let origin = package
            .origin
            .as_ref()
            .map(|o| format!(" ({})", o))
            .unwrap_or_default();
        println!(
            "  {} {} -> {} {}{}",
            name,
            last,
            output::version_style().apply_to(next),
            style(release_type).yellow(),
            style(origin).dim()
        );
    }
}
