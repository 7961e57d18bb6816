//! CLI definition and command handling

pub mod commands;
pub mod output;
mod workspace;

use clap::{Parser, Subcommand};

use commands::{GraphCommand, InitCommand, NotesCommand, PlanCommand, ReleaseCommand};

pub use workspace::Workspace;

/// monorel - Release propagation for multi-package repositories
#[derive(Debug, Parser)]
#[command(name = "monorel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialize a new monorel configuration
    Init(InitCommand),

    /// Show packages in dependency order
    Graph(GraphCommand),

    /// Show the release decision for every package
    Plan(PlanCommand),

    /// Print dependency release notes for one package
    Notes(NotesCommand),

    /// Rewrite manifests and update lock files
    Release(ReleaseCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(&self) -> anyhow::Result<()> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match &self.command {
            Commands::Init(cmd) => cmd.execute(self),
            Commands::Graph(cmd) => cmd.execute(self),
            Commands::Plan(cmd) => cmd.execute(self),
            Commands::Notes(cmd) => cmd.execute(self),
            Commands::Release(cmd) => cmd.execute(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["monorel", "graph", "--format", "json", "-C", "repo"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.directory, Some(std::path::PathBuf::from("repo")));
        assert!(matches!(cli.command, Commands::Graph(_)));
    }
}
