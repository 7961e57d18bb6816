//! Notes command

use clap::Args;
use tracing::info;

use monorel_core::ReleaseType;

use crate::cli::output;
use crate::cli::workspace::parse_bump;
use crate::cli::{Cli, OutputFormat, Workspace};

/// Print dependency release notes for one package
#[derive(Debug, Args)]
pub struct NotesCommand {
    /// Package to print notes for
    pub package: String,

    /// Release a package, as <package>=<major|minor|patch>
    #[arg(short, long = "bump", value_parser = parse_bump)]
    pub bumps: Vec<(String, ReleaseType)>,

    /// Prerelease channel (overrides branch.channel)
    #[arg(long)]
    pub channel: Option<String>,
}

impl NotesCommand {
    /// Execute the notes command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(package = %self.package, bumps = self.bumps.len(), "executing notes command");
        let workspace = Workspace::load()?;
        let plan = workspace.plan(&self.bumps, self.channel.as_deref())?;
        let notes = plan.notes(&self.package)?;

        match cli.format {
            OutputFormat::Json => output::json(&serde_json::json!({
                "package": self.package,
                "notes": notes,
            }))?,
            OutputFormat::Text => match notes {
                Some(notes) => println!("{}", notes),
                None if !cli.quiet => output::info("No dependency notes"),
                None => {}
            },
        }
        Ok(())
    }
}
