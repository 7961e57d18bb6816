//! Composer lock file updater

use monorel_core::ManifestFormat;

use crate::traits::LockfileUpdater;

/// Refreshes `composer.lock` for the released packages only
pub struct ComposerLockfile {
    program: String,
}

impl ComposerLockfile {
    pub fn new() -> Self {
        Self::with_program("composer")
    }

    /// Use a different composer binary
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ComposerLockfile {
    fn default() -> Self {
        Self::new()
    }
}

impl LockfileUpdater for ComposerLockfile {
    fn name(&self) -> &'static str {
        "composer"
    }

    fn format(&self) -> &ManifestFormat {
        &ManifestFormat::COMPOSER_JSON
    }

    fn program(&self) -> &str {
        &self.program
    }

    fn args(&self, packages: &[String]) -> Vec<String> {
        let mut args = vec!["update".to_string()];
        args.extend(packages.iter().cloned());
        args.extend(
            ["--no-install", "--no-scripts", "--no-interaction"]
                .iter()
                .map(|s| s.to_string()),
        );
        args
    }
}
