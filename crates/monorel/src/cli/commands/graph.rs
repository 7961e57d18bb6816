//! Graph command

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use monorel_core::monorepo::resolve;
use monorel_core::{ManifestFormats, ManifestLoader};

use crate::cli::output;
use crate::cli::{Cli, OutputFormat, Workspace};

/// Show packages in dependency order
#[derive(Debug, Args)]
pub struct GraphCommand {
    /// Only show packages affected by a release of this package
    #[arg(long)]
    pub affected_by: Option<String>,
}

#[derive(Debug, Serialize)]
struct GraphEntry {
    name: String,
    path: String,
    version: Option<String>,
    depth: usize,
    dependencies: Vec<String>,
    dependents: Vec<String>,
}

impl GraphCommand {
    /// Execute the graph command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(affected_by = ?self.affected_by, "executing graph command");
        let workspace = Workspace::load()?;
        let formats = ManifestFormats::standard();

        let packages = ManifestLoader::new(&workspace.store(), &formats)
            .name_collision(workspace.config.manifests.name_collision)
            .load(&workspace.locations)?;
        let (packages, graph) = resolve(packages, &formats)?;

        let selected: Vec<String> = match &self.affected_by {
            Some(name) => {
                let mut affected = vec![name.clone()];
                affected.extend(graph.get_affected(name)?);
                affected
            }
            None => graph.sorted().to_vec(),
        };

        let entries: Vec<GraphEntry> = selected
            .iter()
            .filter_map(|name| packages.get(name))
            .map(|package| GraphEntry {
                name: package.name.clone(),
                path: package.path.display().to_string(),
                version: package.version().map(str::to_string),
                depth: graph.get(&package.name).map_or(0, |n| n.depth),
                dependencies: graph.get_dependencies(&package.name).to_vec(),
                dependents: graph.get_dependents(&package.name).to_vec(),
            })
            .collect();

        match cli.format {
            OutputFormat::Json => output::json(&entries)?,
            OutputFormat::Text => {
                if entries.is_empty() {
                    output::warning("No packages found");
                    return Ok(());
                }
                if !cli.quiet {
                    println!("{}", output::header("Packages in release order"));
                    println!();
                }
                for line in entries.iter().flat_map(entry_lines) {
                    println!("{}", line);
                }
                if !cli.quiet {
                    println!();
                    println!("  Max depth: {}", graph.max_depth());
                }
            }
        }
        Ok(())
    }
}

/// Text lines for one package: the package itself, then its dependencies
fn entry_lines(entry: &GraphEntry) -> Vec<String> {
    let indent = "  ".repeat(entry.depth);
    let version = entry.version.as_deref().unwrap_or("-");
    let mut lines = vec![format!(
        "{}{} {} {}",
        indent,
        output::package_style().apply_to(&entry.name),
        output::version_style().apply_to(version),
        output::path_style().apply_to(&entry.path)
    )];
    if !entry.dependencies.is_empty() {
        lines.push(format!(
            "{}  {} {}",
            indent,
            style("depends on").dim(),
            entry.dependencies.join(", ")
        ));
    }
    lines
}
