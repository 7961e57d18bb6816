//! Default configuration values

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "monorel.yaml";

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "monorel.toml";

/// Alternative configuration file name
pub const ALT_CONFIG_FILE: &str = ".monorel.yaml";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_YAML,
        DEFAULT_CONFIG_TOML,
        ALT_CONFIG_FILE,
        ".monorel.toml",
    ]
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# monorel configuration

workspaces:
  - packages/*

# follow | follow-major | patch
release_types: patch

same_versions: []

manifests:
  name_collision: last-wins
  range_prefix: "^"

lockfile:
  enabled: true
  tools:
    - npm
    - composer
"#;
