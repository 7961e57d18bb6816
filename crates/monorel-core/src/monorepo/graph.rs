//! Dependency graph for monorepo packages

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{GraphError, Result};

use super::manifest::ManifestFormats;
use super::package::{DependencyRef, PackageSet};

/// A node in the dependency graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageNode {
    /// Package name
    pub name: String,
    /// Packages this package depends on
    pub dependencies: Vec<String>,
    /// Packages that depend on this package
    pub dependents: Vec<String>,
    /// Depth in the dependency tree (0 = no dependencies)
    pub depth: usize,
}

/// Dependency graph for workspace packages
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// Nodes indexed by package name, in input order
    nodes: IndexMap<String, PackageNode>,
    /// Topologically sorted order (dependencies before dependents)
    sorted_order: Vec<String>,
}

impl DependencyGraph {
    /// Cross-reference declared dependencies and build the graph.
    ///
    /// Every package's dependency list is rebuilt from its manifests: each
    /// name under a dependency key of a known format is encoded and kept only
    /// if it names a package of the set. Fails if the packages form a cycle.
    pub fn build(packages: &mut PackageSet, formats: &ManifestFormats) -> Result<Self> {
        let known: HashSet<String> = packages.keys().cloned().collect();

        for package in packages.values_mut() {
            package.dependencies.clear();
            for (file, document) in &package.manifests {
                let Some(format) = formats.get(file) else {
                    continue;
                };
                for key in format.dependency_keys {
                    for declared in document.dependency_names(key) {
                        let name = format.encode(declared);
                        if known.contains(&name) {
                            package
                                .dependencies
                                .push(DependencyRef::new(file.as_str(), *key, name));
                        }
                    }
                }
            }
        }

        let mut nodes: IndexMap<String, PackageNode> = packages
            .values()
            .map(|pkg| {
                (
                    pkg.name.clone(),
                    PackageNode {
                        name: pkg.name.clone(),
                        dependencies: pkg
                            .dependency_names()
                            .into_iter()
                            .map(str::to_string)
                            .collect(),
                        dependents: Vec::new(),
                        depth: 0,
                    },
                )
            })
            .collect();

        // Build reverse dependency mapping (dependents)
        let edges: Vec<(String, String)> = nodes
            .values()
            .flat_map(|n| n.dependencies.iter().map(|d| (d.clone(), n.name.clone())))
            .collect();
        for (dependency, dependent) in edges {
            if let Some(dep_node) = nodes.get_mut(&dependency) {
                dep_node.dependents.push(dependent);
            }
        }

        let sorted_order = Self::topological_sort(&nodes)?;

        for name in &sorted_order {
            let depth = nodes[name.as_str()]
                .dependencies
                .iter()
                .filter_map(|dep| nodes.get(dep))
                .map(|n| n.depth + 1)
                .max()
                .unwrap_or(0);
            if let Some(node) = nodes.get_mut(name) {
                node.depth = depth;
            }
        }

        info!(
            packages = nodes.len(),
            edges = nodes.values().map(|n| n.dependencies.len()).sum::<usize>(),
            "dependency graph built"
        );

        Ok(Self {
            nodes,
            sorted_order,
        })
    }

    /// Perform topological sort using Kahn's algorithm.
    ///
    /// Ready packages are taken in input order, so independent packages keep
    /// their relative order.
    fn topological_sort(nodes: &IndexMap<String, PackageNode>) -> Result<Vec<String>> {
        let mut in_degree: HashMap<&str, usize> = HashMap::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        let mut sorted: Vec<String> = Vec::new();

        for (name, node) in nodes {
            let degree = node.dependencies.len();
            in_degree.insert(name, degree);
            if degree == 0 {
                queue.push_back(name);
            }
        }

        while let Some(name) = queue.pop_front() {
            sorted.push(name.to_string());

            for dependent in &nodes[name].dependents {
                if let Some(degree) = in_degree.get_mut(dependent.as_str()) {
                    *degree = degree.saturating_sub(1);
                    if *degree == 0 {
                        queue.push_back(dependent);
                    }
                }
            }
        }

        if sorted.len() != nodes.len() {
            let placed: HashSet<&str> = sorted.iter().map(String::as_str).collect();
            let remaining: IndexSet<&str> = nodes
                .keys()
                .map(String::as_str)
                .filter(|n| !placed.contains(n))
                .collect();
            return Err(GraphError::Cycle(Self::find_cycle(nodes, &remaining)).into());
        }

        debug!(order = ?sorted, "topological order");
        Ok(sorted)
    }

    /// Walk dependencies among the unsorted packages until one repeats.
    ///
    /// Every package Kahn's algorithm could not place still depends on
    /// another unplaced package, so the walk always closes a cycle.
    fn find_cycle(nodes: &IndexMap<String, PackageNode>, remaining: &IndexSet<&str>) -> Vec<String> {
        let Some(mut current) = remaining.first().copied() else {
            return Vec::new();
        };
        let mut path: Vec<&str> = Vec::new();

        loop {
            if let Some(pos) = path.iter().position(|n| *n == current) {
                let mut cycle: Vec<String> = path[pos..].iter().map(|n| n.to_string()).collect();
                cycle.push(current.to_string());
                return cycle;
            }
            path.push(current);

            let next = nodes[current]
                .dependencies
                .iter()
                .map(String::as_str)
                .find(|d| remaining.contains(d));
            match next {
                Some(next) => current = next,
                None => return remaining.iter().map(|n| n.to_string()).collect(),
            }
        }
    }

    /// Get packages in topologically sorted order (dependencies first)
    pub fn sorted(&self) -> &[String] {
        &self.sorted_order
    }

    /// Reorder `packages` to follow the topological order
    pub fn order(&self, mut packages: PackageSet) -> PackageSet {
        self.sorted_order
            .iter()
            .filter_map(|name| packages.swap_remove(name).map(|p| (name.clone(), p)))
            .collect()
    }

    /// Get a package node
    pub fn get(&self, name: &str) -> Option<&PackageNode> {
        self.nodes.get(name)
    }

    /// Direct dependents of a package
    pub fn get_dependents(&self, name: &str) -> &[String] {
        self.nodes
            .get(name)
            .map(|n| n.dependents.as_slice())
            .unwrap_or_default()
    }

    /// Direct dependencies of a package
    pub fn get_dependencies(&self, name: &str) -> &[String] {
        self.nodes
            .get(name)
            .map(|n| n.dependencies.as_slice())
            .unwrap_or_default()
    }

    /// Get all packages transitively affected by a change to the given package
    pub fn get_affected(&self, name: &str) -> Result<Vec<String>> {
        if !self.nodes.contains_key(name) {
            return Err(GraphError::UnknownPackage(name.to_string()).into());
        }

        let mut affected: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(name);

        while let Some(current) = queue.pop_front() {
            if !affected.insert(current) {
                continue;
            }
            if let Some(node) = self.nodes.get(current) {
                queue.extend(node.dependents.iter().map(String::as_str));
            }
        }

        affected.remove(name);
        Ok(self
            .sorted_order
            .iter()
            .filter(|n| affected.contains(n.as_str()))
            .cloned()
            .collect())
    }

    /// Get the maximum depth of the dependency tree
    pub fn max_depth(&self) -> usize {
        self.nodes.values().map(|n| n.depth).max().unwrap_or(0)
    }
}

/// Build the graph and return the package set in topological order
pub fn resolve(
    mut packages: PackageSet,
    formats: &ManifestFormats,
) -> Result<(PackageSet, DependencyGraph)> {
    let graph = DependencyGraph::build(&mut packages, formats)?;
    let packages = graph.order(packages);
    Ok((packages, graph))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MonorelError;
    use crate::monorepo::manifest::ManifestDocument;
    use crate::monorepo::package::Package;
    use std::path::Path;

    fn npm(name: &str, deps: &[&str]) -> Package {
        let deps: serde_json::Map<String, serde_json::Value> = deps
            .iter()
            .map(|d| (d.to_string(), serde_json::json!("^1.0.0")))
            .collect();
        let text = serde_json::json!({ "name": name, "dependencies": deps }).to_string();
        Package::new(name, format!("packages/{}", name)).with_manifest(
            "package.json",
            ManifestDocument::parse(&text, Path::new("package.json")).unwrap(),
        )
    }

    fn set(packages: Vec<Package>) -> PackageSet {
        packages.into_iter().map(|p| (p.name.clone(), p)).collect()
    }

    fn create_packages() -> PackageSet {
        // Deliberately listed dependents-first
        set(vec![
            npm("cli", &["core", "utils"]),
            npm("utils", &["core", "lodash"]),
            npm("core", &[]),
        ])
    }

    fn position(order: &[String], name: &str) -> usize {
        order.iter().position(|n| n == name).unwrap()
    }

    #[test]
    fn test_build_graph() {
        let mut packages = create_packages();
        let graph = DependencyGraph::build(&mut packages, &ManifestFormats::standard()).unwrap();

        assert_eq!(graph.sorted().len(), 3);
        assert_eq!(graph.get_dependencies("cli"), ["core", "utils"]);
    }

    #[test]
    fn test_external_dependencies_are_dropped() {
        let mut packages = create_packages();
        DependencyGraph::build(&mut packages, &ManifestFormats::standard()).unwrap();

        let utils = &packages["utils"];
        assert_eq!(utils.dependencies.len(), 1);
        assert_eq!(utils.dependencies[0], DependencyRef::new("package.json", "dependencies", "core"));
        // still present in the manifest itself
        assert_eq!(
            utils.manifests["package.json"].dependency_names("dependencies"),
            vec!["core", "lodash"]
        );
    }

    #[test]
    fn test_topological_order() {
        let (packages, graph) = resolve(create_packages(), &ManifestFormats::standard()).unwrap();

        let sorted = graph.sorted();
        assert!(position(sorted, "core") < position(sorted, "utils"));
        assert!(position(sorted, "core") < position(sorted, "cli"));
        assert!(position(sorted, "utils") < position(sorted, "cli"));

        let keys: Vec<_> = packages.keys().cloned().collect();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_every_edge_respects_order() {
        let packages = set(vec![
            npm("e", &["d", "b"]),
            npm("d", &["c"]),
            npm("c", &["a"]),
            npm("b", &["a"]),
            npm("a", &[]),
            npm("f", &[]),
        ]);
        let (packages, graph) = resolve(packages, &ManifestFormats::standard()).unwrap();

        for package in packages.values() {
            for dep in &package.dependencies {
                assert!(
                    position(graph.sorted(), &dep.name) < position(graph.sorted(), &package.name),
                    "{} must precede {}",
                    dep.name,
                    package.name
                );
            }
        }
    }

    #[test]
    fn test_independent_packages_keep_input_order() {
        let packages = set(vec![npm("zeta", &[]), npm("alpha", &[]), npm("mid", &[])]);
        let (_, graph) = resolve(packages, &ManifestFormats::standard()).unwrap();

        assert_eq!(graph.sorted(), ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_isolated_package_without_manifest() {
        let packages = set(vec![npm("core", &[]), Package::new("docs", "docs")]);
        let (packages, graph) = resolve(packages, &ManifestFormats::standard()).unwrap();

        assert_eq!(packages.len(), 2);
        assert!(graph.sorted().contains(&"docs".to_string()));
    }

    #[test]
    fn test_dependents() {
        let mut packages = create_packages();
        let graph = DependencyGraph::build(&mut packages, &ManifestFormats::standard()).unwrap();

        let core_dependents = graph.get_dependents("core");
        assert!(core_dependents.contains(&"utils".to_string()));
        assert!(core_dependents.contains(&"cli".to_string()));
        assert_eq!(graph.get_dependents("utils"), ["cli"]);
    }

    #[test]
    fn test_affected_packages() {
        let mut packages = create_packages();
        let graph = DependencyGraph::build(&mut packages, &ManifestFormats::standard()).unwrap();

        assert_eq!(graph.get_affected("core").unwrap(), vec!["utils", "cli"]);
        assert!(graph.get_affected("cli").unwrap().is_empty());
        assert!(graph.get_affected("missing").is_err());
    }

    #[test]
    fn test_depth_calculation() {
        let mut packages = create_packages();
        let graph = DependencyGraph::build(&mut packages, &ManifestFormats::standard()).unwrap();

        assert_eq!(graph.get("core").unwrap().depth, 0);
        assert_eq!(graph.get("utils").unwrap().depth, 1);
        assert_eq!(graph.get("cli").unwrap().depth, 2);
        assert_eq!(graph.max_depth(), 2);
    }

    #[test]
    fn test_cycle_detection() {
        let packages = set(vec![npm("a", &["b"]), npm("b", &["c"]), npm("c", &["a"]), npm("d", &[])]);

        let err = resolve(packages, &ManifestFormats::standard()).unwrap_err();
        match err {
            MonorelError::Graph(GraphError::Cycle(cycle)) => {
                assert_eq!(cycle, vec!["a", "b", "c", "a"]);
            }
            other => panic!("expected cycle error, got {other:?}"),
        }
    }

    #[test]
    fn test_cycle_behind_dependent_is_reported() {
        let packages = set(vec![npm("app", &["x"]), npm("x", &["y"]), npm("y", &["x"])]);

        let err = resolve(packages, &ManifestFormats::standard()).unwrap_err();
        assert_eq!(err.to_string(), "Circular dependency detected: x -> y -> x");
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let packages = set(vec![npm("a", &["a"])]);
        assert!(resolve(packages, &ManifestFormats::standard()).is_err());
    }

    #[test]
    fn test_cross_format_dependency_is_one_edge() {
        let base = Package::new("@test/base", "packages/base")
            .with_manifest(
                "package.json",
                ManifestDocument::parse(r#"{"name":"@test/base"}"#, Path::new("p")).unwrap(),
            )
            .with_manifest(
                "composer.json",
                ManifestDocument::parse(r#"{"name":"test/base"}"#, Path::new("c")).unwrap(),
            );
        let pkg1 = Package::new("@test/pkg1", "packages/pkg1").with_manifest(
            "composer.json",
            ManifestDocument::parse(
                r#"{"name":"test/pkg1","require":{"test/base":"^1.0.0","php":">=8.1"}}"#,
                Path::new("c"),
            )
            .unwrap(),
        );

        let (packages, graph) =
            resolve(set(vec![pkg1, base]), &ManifestFormats::standard()).unwrap();

        assert_eq!(
            packages["@test/pkg1"].dependencies,
            vec![DependencyRef::new("composer.json", "require", "@test/base")]
        );
        assert_eq!(graph.get_dependents("@test/base"), ["@test/pkg1"]);
        assert_eq!(graph.sorted(), ["@test/base", "@test/pkg1"]);
    }
}
