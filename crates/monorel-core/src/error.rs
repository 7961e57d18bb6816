//! Error types for monorel

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using MonorelError
pub type Result<T> = std::result::Result<T, MonorelError>;

/// Main error type for monorel operations
#[derive(Debug, Error)]
pub enum MonorelError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Manifest-related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Dependency graph errors
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Version-related errors
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Adapter-related errors
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// Workflow-related errors
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Manifest-related errors
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Failed to read a manifest file
    #[error("Failed to read manifest {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest content is not valid JSON
    #[error("Failed to parse manifest {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Manifest is valid JSON but not an object
    #[error("Manifest {0} is not a JSON object")]
    NotAnObject(PathBuf),

    /// Two manifests at the same location declare different names
    #[error("Manifests in {path} disagree on the package name: '{first}' vs '{second}'")]
    NameMismatch {
        path: PathBuf,
        first: String,
        second: String,
    },

    /// Failed to write a manifest file
    #[error("Failed to write manifest {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize a manifest document
    #[error("Failed to serialize manifest {0}")]
    SerializeFailed(String),
}

/// Dependency graph errors
#[derive(Debug, Error)]
pub enum GraphError {
    /// The package set contains a dependency cycle
    #[error("Circular dependency detected: {}", .0.join(" -> "))]
    Cycle(Vec<String>),

    /// A package referenced by name is not part of the set
    #[error("Unknown package: {0}")]
    UnknownPackage(String),
}

/// Version-related errors
#[derive(Debug, Error)]
pub enum VersionError {
    /// Failed to parse version
    #[error("Failed to parse version '{0}': {1}")]
    ParseFailed(String, String),

    /// Semver error
    #[error("Semver error: {0}")]
    Semver(#[from] semver::Error),
}

/// Adapter-related errors
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Tool binary was not found on PATH
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Command execution failed
    #[error("Command failed: {command} - {reason}")]
    CommandFailed { command: String, reason: String },
}

/// Workflow-related errors
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A release request named a package outside the set
    #[error("Release requested for unknown package: {0}")]
    UnknownPackage(String),

    /// A package has a release type but no version could be resolved
    #[error("No version resolved for package {0}")]
    UnresolvedVersion(String),
}
