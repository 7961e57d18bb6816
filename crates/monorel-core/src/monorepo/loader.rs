//! Manifest loading
//!
//! Turns supplied package locations into [`Package`] records carrying every
//! manifest found on disk and a canonical name in the shared namespace.

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::config::NameCollisionPolicy;
use crate::error::{ManifestError, Result};

use super::manifest::ManifestFormats;
use super::package::{Package, PackageLocation, PackageSet};
use super::store::ManifestStore;

/// Loads manifests for a set of package locations
pub struct ManifestLoader<'a, S: ManifestStore + ?Sized> {
    store: &'a S,
    formats: &'a ManifestFormats,
    name_collision: NameCollisionPolicy,
}

impl<'a, S: ManifestStore + ?Sized> ManifestLoader<'a, S> {
    /// Create a loader reading through `store`
    pub fn new(store: &'a S, formats: &'a ManifestFormats) -> Self {
        Self {
            store,
            formats,
            name_collision: NameCollisionPolicy::default(),
        }
    }

    /// Set the policy for manifests that disagree on a package name
    pub fn name_collision(mut self, policy: NameCollisionPolicy) -> Self {
        self.name_collision = policy;
        self
    }

    /// Load every location into a package set keyed by canonical name.
    ///
    /// Fails on the first unreadable or malformed manifest.
    pub fn load(&self, locations: &IndexMap<String, PackageLocation>) -> Result<PackageSet> {
        let mut packages = PackageSet::new();

        for (supplied, location) in locations {
            let package = self.load_one(supplied, location)?;
            if packages.contains_key(&package.name) {
                warn!(
                    package = %package.name,
                    path = %location.path.display(),
                    "package name already loaded from another location, replacing it"
                );
            }
            packages.insert(package.name.clone(), package);
        }

        info!(count = packages.len(), "loaded packages");
        Ok(packages)
    }

    fn load_one(&self, supplied: &str, location: &PackageLocation) -> Result<Package> {
        let mut package = Package::new(supplied, &location.path);
        let mut canonical: Option<String> = None;

        for format in self.formats.iter() {
            let Some(document) = self.store.read_manifest(&location.path, format.file_name)? else {
                continue;
            };

            if let Some(declared) = document.name() {
                let encoded = format.encode(declared);
                if let Some(previous) = canonical.take().filter(|p| *p != encoded) {
                    if self.name_collision == NameCollisionPolicy::Error {
                        return Err(ManifestError::NameMismatch {
                            path: location.path.clone(),
                            first: previous,
                            second: encoded,
                        }
                        .into());
                    }
                    debug!(
                        path = %location.path.display(),
                        previous = %previous,
                        name = %encoded,
                        "manifests disagree on package name, last one wins"
                    );
                }
                canonical = Some(encoded);
            }

            package
                .manifests
                .insert(format.file_name.to_string(), document);
        }

        if package.manifests.is_empty() {
            debug!(package = supplied, path = %location.path.display(), "no manifest found");
        }
        if let Some(name) = canonical {
            package.name = name;
        }
        Ok(package)
    }
}
