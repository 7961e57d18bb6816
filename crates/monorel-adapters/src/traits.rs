//! Lock file updater traits

use std::path::{Path, PathBuf};
use std::process::Command;

use monorel_core::error::{AdapterError, Result};
use monorel_core::ManifestFormat;
use tracing::debug;

/// Trait for lock file updaters
pub trait LockfileUpdater: Send + Sync {
    /// Get the updater name (e.g., "npm", "composer")
    fn name(&self) -> &'static str;

    /// Manifest format whose packages this tool manages
    fn format(&self) -> &ManifestFormat;

    /// Program invoked to refresh the lock file
    fn program(&self) -> &str;

    /// Arguments for refreshing the lock file after `packages` changed.
    ///
    /// Names are already decoded into this tool's namespace.
    fn args(&self, packages: &[String]) -> Vec<String>;

    /// Check if this updater applies to the repository at `root`
    fn detect(&self, root: &Path) -> bool {
        root.join(self.format().file_name).is_file()
    }

    /// Locate the program on `PATH`
    fn locate(&self) -> Result<PathBuf> {
        which::which(self.program())
            .map_err(|_| AdapterError::ToolNotFound(self.program().to_string()).into())
    }

    /// Refresh the lock file at `root`
    fn update(&self, root: &Path, packages: &[String]) -> Result<()> {
        let program = self.locate()?;
        let args = self.args(packages);
        let command = format!("{} {}", self.program(), args.join(" "));
        debug!(updater = self.name(), command = %command, "updating lock file");

        let output = Command::new(&program)
            .args(&args)
            .current_dir(root)
            .output()
            .map_err(|e| AdapterError::CommandFailed {
                command: command.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AdapterError::CommandFailed {
                command,
                reason: stderr.trim().to_string(),
            }
            .into());
        }
        Ok(())
    }
}
