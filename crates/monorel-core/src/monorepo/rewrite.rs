//! Manifest rewriting for a releasing package

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use super::manifest::{ManifestDocument, ManifestFormat, ManifestFormats};
use super::package::Package;

/// Rewrites a package's manifests to carry resolved versions
#[derive(Debug, Clone)]
pub struct ManifestRewriter<'a> {
    formats: &'a ManifestFormats,
    range_prefix: String,
}

impl<'a> ManifestRewriter<'a> {
    pub fn new(formats: &'a ManifestFormats, range_prefix: impl Into<String>) -> Self {
        Self {
            formats,
            range_prefix: range_prefix.into(),
        }
    }

    /// Produce updated copies of every manifest of `package`.
    ///
    /// `version` is the package's own next version; `versions` maps canonical
    /// names to resolved next versions for the whole set. Documents are
    /// returned in the package's manifest order, keyed by file name.
    pub fn rewrite(
        &self,
        package: &Package,
        version: &str,
        versions: &IndexMap<String, String>,
    ) -> Vec<(String, ManifestDocument)> {
        let mut documents: IndexMap<String, ManifestDocument> = package.manifests.clone();

        for (file, document) in documents.iter_mut() {
            if document.version().is_some() {
                document
                    .content
                    .insert("version".to_string(), Value::String(version.to_string()));
            }
            if let Some(format) = self.formats.get(file) {
                if format.pins_repository_versions {
                    pin_repository_versions(document, format, versions);
                }
            }
        }

        for dep in &package.dependencies {
            let Some(next) = versions.get(&dep.name) else {
                continue;
            };
            let Some(document) = documents.get_mut(&dep.file) else {
                continue;
            };
            let declared = self
                .formats
                .get(&dep.file)
                .map_or(dep.name.as_str(), |f| f.decode(&dep.name));

            if let Some(Value::Object(deps)) = document.content.get_mut(&dep.key) {
                let range = format!("{}{}", self.range_prefix, next);
                debug!(
                    package = %package.name,
                    file = %dep.file,
                    dependency = declared,
                    range = %range,
                    "updating dependency range"
                );
                deps.insert(declared.to_string(), Value::String(range));
            }
        }

        documents.into_iter().collect()
    }
}

/// Update `repositories[*].options.versions` entries of known packages
fn pin_repository_versions(
    document: &mut ManifestDocument,
    format: &ManifestFormat,
    versions: &IndexMap<String, String>,
) {
    let repositories: Vec<&mut Value> = match document.content.get_mut("repositories") {
        Some(Value::Array(list)) => list.iter_mut().collect(),
        Some(Value::Object(map)) => map.values_mut().collect(),
        _ => return,
    };

    for repository in repositories {
        let Some(pinned) = repository
            .get_mut("options")
            .and_then(|o| o.get_mut("versions"))
            .and_then(Value::as_object_mut)
        else {
            continue;
        };
        for (name, value) in pinned.iter_mut() {
            if let Some(next) = versions.get(&format.encode(name)) {
                *value = Value::String(next.clone());
            }
        }
    }
}
