//! Per-package collection of resolved entry points.

use super::conditions::resolve_condition;
use super::shape::ExportsShape;
use super::warnings::ResolveWarning;
use crate::paths::to_slash;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One resolved documentation entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
    /// Absolute, real path of the entry file.
    pub filepath: PathBuf,
    /// Exports key as declared (`"."`, `"./sub"`, `"./utils/*"`, `"exports"`).
    pub export_path: String,
    /// Unexpanded target pattern, set only for wildcard exports.
    pub glob_entry_path: Option<String>,
}

impl ExportEntry {
    pub fn new(
        filepath: PathBuf,
        export_path: impl Into<String>,
        glob_entry_path: Option<String>,
    ) -> Self {
        Self {
            filepath,
            export_path: export_path.into(),
            glob_entry_path,
        }
    }

    /// Entry path with forward slashes.
    #[must_use]
    pub fn filepath_slash(&self) -> String {
        to_slash(&self.filepath)
    }

    /// Whether this entry came from a wildcard key or target.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.export_path.contains('*')
            || self
                .glob_entry_path
                .as_deref()
                .is_some_and(|g| g.contains('*'))
    }
}

/// Insertion-ordered map from entry file path to [`ExportEntry`].
///
/// The first entry for a given file wins; later duplicates are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportMap {
    entries: Vec<ExportEntry>,
    seen: HashSet<PathBuf>,
}

impl ExportMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `shape` for `condition` in `package_dir` into a new map.
    pub fn create(
        shape: &ExportsShape,
        package_dir: &Path,
        condition: &str,
        warnings: &mut Vec<ResolveWarning>,
    ) -> Self {
        let mut map = Self::new();
        for entry in resolve_condition(shape, package_dir, condition, warnings) {
            map.insert(entry);
        }
        map
    }

    /// Insert an entry. Returns `false` if its file path was already present.
    pub fn insert(&mut self, entry: ExportEntry) -> bool {
        if !self.seen.insert(entry.filepath.clone()) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, ExportEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a ExportMap {
    type Item = &'a ExportEntry;
    type IntoIter = std::slice::Iter<'a, ExportEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "export {};").unwrap();
    }

    #[test]
    fn test_duplicates_first_wins() {
        let mut map = ExportMap::new();
        assert!(map.insert(ExportEntry::new("/p/a.d.ts".into(), ".", None)));
        assert!(!map.insert(ExportEntry::new("/p/a.d.ts".into(), "./alias", None)));

        assert_eq!(map.len(), 1);
        assert_eq!(map.iter().next().unwrap().export_path, ".");
    }

    #[test]
    fn test_same_file_from_two_keys() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "src/index.d.ts");
        let shape = ExportsShape::classify(&json!({
            ".": "./src/index.d.ts",
            "./index": "./src/index.d.ts",
            "./main": "./src/../src/index.d.ts"
        }));

        let mut warnings = Vec::new();
        let map = ExportMap::create(&shape, dir.path(), "types", &mut warnings);

        assert_eq!(map.len(), 1);
        assert_eq!(map.iter().next().unwrap().export_path, ".");
    }

    #[test]
    fn test_create_is_idempotent() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "src/index.d.ts");
        touch(dir.path(), "src/sub/index.d.ts");
        touch(dir.path(), "src/features/a.d.ts");
        let shape = ExportsShape::classify(&json!({
            ".": "./src/index.d.ts",
            "./sub": "./src/sub/index.d.ts",
            "./features/*": "./src/features/*.d.ts"
        }));

        let mut warnings = Vec::new();
        let first = ExportMap::create(&shape, dir.path(), "types", &mut warnings);
        let second = ExportMap::create(&shape, dir.path(), "types", &mut warnings);

        assert_eq!(first, second);
        let keys: Vec<_> = first.iter().map(|e| e.export_path.as_str()).collect();
        assert_eq!(keys, vec![".", "./sub", "./features/*"]);
    }

    #[test]
    fn test_is_wildcard() {
        let plain = ExportEntry::new("/p/a.d.ts".into(), "./a", None);
        let star = ExportEntry::new("/p/a.d.ts".into(), "./*", Some("./*.d.ts".into()));
        assert!(!plain.is_wildcard());
        assert!(star.is_wildcard());
    }
}
