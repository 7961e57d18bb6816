//! npm lock file updater

use monorel_core::ManifestFormat;

use crate::traits::LockfileUpdater;

/// Refreshes `package-lock.json` with `npm install --package-lock-only`
pub struct NpmLockfile {
    program: String,
}

impl NpmLockfile {
    pub fn new() -> Self {
        Self::with_program("npm")
    }

    /// Use a different npm binary
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for NpmLockfile {
    fn default() -> Self {
        Self::new()
    }
}

impl LockfileUpdater for NpmLockfile {
    fn name(&self) -> &'static str {
        "npm"
    }

    fn format(&self) -> &ManifestFormat {
        &ManifestFormat::PACKAGE_JSON
    }

    fn program(&self) -> &str {
        &self.program
    }

    // npm re-resolves the whole workspace tree; package names are not needed
    fn args(&self, _packages: &[String]) -> Vec<String> {
        ["install", "--package-lock-only", "--ignore-scripts", "--no-audit", "--no-fund"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}
