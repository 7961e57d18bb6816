//! Lock file updater registry

use std::path::Path;
use std::sync::Arc;

use monorel_core::error::{ConfigError, Result};
use monorel_core::workflow::AffectedPackage;
use serde::Serialize;
use tracing::{info, warn};

use crate::composer::ComposerLockfile;
use crate::npm::NpmLockfile;
use crate::traits::LockfileUpdater;

/// What happened to one lock file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "status", content = "reason")]
pub enum LockfileOutcome {
    Updated,
    Skipped(String),
    Failed(String),
}

/// Outcome of one updater run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockfileReport {
    pub updater: &'static str,
    pub packages: Vec<String>,
    #[serde(flatten)]
    pub outcome: LockfileOutcome,
}

/// Registry of lock file updaters
pub struct LockfileRegistry {
    updaters: Vec<Arc<dyn LockfileUpdater>>,
}

impl LockfileRegistry {
    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            updaters: Vec::new(),
        }
    }

    /// Create a registry holding the named built-in updaters
    pub fn from_names(names: &[String]) -> Result<Self> {
        let mut registry = Self::empty();
        for name in names {
            match name.as_str() {
                "npm" => registry.register(NpmLockfile::new()),
                "composer" => registry.register(ComposerLockfile::new()),
                other => {
                    return Err(ConfigError::InvalidValue {
                        field: "lockfile.tools".to_string(),
                        message: format!("unknown lock file tool '{}'", other),
                    }
                    .into())
                }
            }
        }
        Ok(registry)
    }

    /// Register an updater
    pub fn register<U: LockfileUpdater + 'static>(&mut self, updater: U) {
        self.updaters.push(Arc::new(updater));
    }

    /// Run every applicable updater once for the affected packages.
    ///
    /// Failures are logged and reported, never returned.
    pub fn update_all(&self, root: &Path, affected: &[AffectedPackage]) -> Vec<LockfileReport> {
        let mut reports = Vec::new();

        for updater in &self.updaters {
            let format = updater.format();
            let packages: Vec<String> = affected
                .iter()
                .filter(|p| p.files.iter().any(|f| f == format.file_name))
                .map(|p| format.decode(&p.name).to_string())
                .collect();

            let outcome = if packages.is_empty() {
                LockfileOutcome::Skipped("no released packages".to_string())
            } else if !updater.detect(root) {
                LockfileOutcome::Skipped(format!("no {} at repository root", format.file_name))
            } else if updater.locate().is_err() {
                warn!(
                    updater = updater.name(),
                    program = updater.program(),
                    "tool not found on PATH, skipping lock file"
                );
                LockfileOutcome::Skipped(format!("{} not found on PATH", updater.program()))
            } else {
                match updater.update(root, &packages) {
                    Ok(()) => {
                        info!(updater = updater.name(), packages = packages.len(), "lock file updated");
                        LockfileOutcome::Updated
                    }
                    Err(e) => {
                        warn!(updater = updater.name(), error = %e, "lock file update failed");
                        LockfileOutcome::Failed(e.to_string())
                    }
                }
            };

            reports.push(LockfileReport {
                updater: updater.name(),
                packages,
                outcome,
            });
        }
        reports
    }
}
