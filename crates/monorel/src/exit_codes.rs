//! Exit codes for the CLI

use monorel_core::MonorelError;

/// Success
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// Manifest error
pub const MANIFEST_ERROR: i32 = 3;

/// Version error
pub const VERSION_ERROR: i32 = 4;

/// Dependency graph error
pub const GRAPH_ERROR: i32 = 5;

/// Exit code for an error returned by a command
pub fn for_error(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<MonorelError>() {
        Some(MonorelError::Config(_)) => CONFIG_ERROR,
        Some(MonorelError::Manifest(_)) => MANIFEST_ERROR,
        Some(MonorelError::Version(_)) => VERSION_ERROR,
        Some(MonorelError::Graph(_)) => GRAPH_ERROR,
        _ => ERROR,
    }
}
