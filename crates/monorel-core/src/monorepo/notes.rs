//! Release notes for dependency-driven releases

use indexmap::IndexMap;

use crate::config::SameVersionGroup;

use super::package::Package;
use super::propagation::ReleaseContext;

const HEADER: &str = "### Dependencies";

/// Build the "Dependencies" notes section for `package`.
///
/// Returns `None` when no dependency was upgraded and no same-version line
/// applies.
pub fn dependency_notes(
    package: &Package,
    contexts: &IndexMap<String, ReleaseContext>,
    groups: &[SameVersionGroup],
) -> Option<String> {
    let mut lines: Vec<String> = Vec::new();

    for name in package.dependency_names() {
        let Some(context) = contexts.get(name) else {
            continue;
        };
        let Some(next) = context.next_version.as_deref() else {
            continue;
        };
        let from = context
            .last_version
            .as_deref()
            .map(|last| format!(" from `{}`", last))
            .unwrap_or_default();
        lines.push(format!("* **{}:** upgrade{} to `{}`", name, from, next));
    }

    if lines.is_empty() {
        if let Some(line) = same_version_line(package, contexts, groups) {
            lines.push(line);
        }
    }

    if lines.is_empty() {
        return None;
    }

    let mut notes = vec![HEADER.to_string(), String::new()];
    notes.extend(lines);
    Some(notes.join("\n"))
}

fn same_version_line(
    package: &Package,
    contexts: &IndexMap<String, ReleaseContext>,
    groups: &[SameVersionGroup],
) -> Option<String> {
    let context = contexts.get(&package.name)?;
    if context.is_independent() {
        return None;
    }
    let version = context.next_version.as_deref()?;
    let group = groups.iter().find(|g| g.contains(&package.name))?;
    let others: Vec<&str> = group
        .members()
        .iter()
        .map(String::as_str)
        .filter(|m| *m != package.name)
        .collect();

    Some(format!(
        "* upgrade to {} with packages: {}",
        version,
        others.join(", ")
    ))
}
