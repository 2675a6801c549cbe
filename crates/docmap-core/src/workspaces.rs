//! Workspace support for monorepos.
//!
//! Parses the `workspaces` field from package.json and discovers the member
//! package directories. Supports glob patterns like `packages/*`.

use crate::paths::{to_slash, PACKAGE_JSON};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Read the workspace glob patterns declared by a manifest.
///
/// Accepts both the array form and the yarn-style `{ "packages": [...] }` form.
/// Returns `None` if the manifest declares no (non-empty) workspaces.
#[must_use]
pub fn workspace_patterns(manifest: &Value) -> Option<Vec<String>> {
    let patterns: Vec<String> = match manifest.get("workspaces")? {
        Value::Array(arr) => arr
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect(),
        Value::Object(obj) => obj
            .get("packages")
            .and_then(|p| p.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default(),
        _ => return None,
    };

    (!patterns.is_empty()).then_some(patterns)
}

/// Expand workspace patterns under `root` into package directories.
///
/// Only directories containing a `package.json` are kept. The result is
/// sorted by path and free of duplicates so runs are reproducible.
#[must_use]
pub fn discover_workspace_packages(root: &Path, patterns: &[String]) -> Vec<PathBuf> {
    let mut packages = Vec::new();

    for pattern in patterns {
        let full_pattern = format!(
            "{}/{}",
            glob::Pattern::escape(&to_slash(root)),
            pattern.trim_start_matches("./")
        );

        if let Ok(entries) = glob::glob(&full_pattern) {
            for entry in entries.flatten() {
                if entry.is_dir() && entry.join(PACKAGE_JSON).is_file() {
                    packages.push(entry);
                }
            }
        }
    }

    packages.sort();
    packages.dedup();
    packages
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn create_package(root: &Path, rel: &str, name: &str) {
        let dir = root.join(rel);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("package.json"),
            json!({ "name": name }).to_string(),
        )
        .unwrap();
    }

    #[test]
    fn test_patterns_array_format() {
        let manifest = json!({ "workspaces": ["packages/*", "apps/*"] });
        assert_eq!(
            workspace_patterns(&manifest),
            Some(vec!["packages/*".to_string(), "apps/*".to_string()])
        );
    }

    #[test]
    fn test_patterns_object_format() {
        let manifest = json!({ "workspaces": { "packages": ["libs/*"] } });
        assert_eq!(
            workspace_patterns(&manifest),
            Some(vec!["libs/*".to_string()])
        );
    }

    #[test]
    fn test_patterns_absent_or_empty() {
        assert_eq!(workspace_patterns(&json!({ "name": "x" })), None);
        assert_eq!(workspace_patterns(&json!({ "workspaces": [] })), None);
        assert_eq!(workspace_patterns(&json!({ "workspaces": "nope" })), None);
    }

    #[test]
    fn test_discover_sorted_and_filtered() {
        let root = tempdir().unwrap();
        create_package(root.path(), "packages/zeta", "zeta");
        create_package(root.path(), "packages/alpha", "alpha");
        fs::create_dir_all(root.path().join("packages/not-a-package")).unwrap();

        let found = discover_workspace_packages(root.path(), &["packages/*".to_string()]);
        assert_eq!(
            found,
            vec![
                root.path().join("packages/alpha"),
                root.path().join("packages/zeta"),
            ]
        );
    }
}
