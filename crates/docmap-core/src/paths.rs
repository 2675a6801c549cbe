use std::path::{Component, Path, PathBuf};

/// Manifest file name looked up for every package input.
pub const PACKAGE_JSON: &str = "package.json";

/// Find the nearest `package.json` for an input path.
///
/// - A path that already names a `package.json` file is returned as-is.
/// - A directory is searched first, then each of its ancestors.
/// - A file starts the search in its parent directory.
///
/// Returns `None` if no manifest exists up to the filesystem root.
#[must_use]
pub fn find_package_json(start: &Path) -> Option<PathBuf> {
    if start.file_name().is_some_and(|n| n == PACKAGE_JSON) {
        return start.is_file().then(|| start.to_path_buf());
    }

    let mut current = if start.is_dir() {
        start.to_path_buf()
    } else {
        start.parent()?.to_path_buf()
    };

    loop {
        let candidate = current.join(PACKAGE_JSON);
        if candidate.is_file() {
            return Some(candidate);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Resolve `path` to its real location, falling back to lexical cleanup.
///
/// Used to key entry points so that two spellings of the same file collapse.
#[must_use]
pub fn real_path(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| normalize(path))
}

/// Lexically normalize a path: drop `.` components and fold `..` into parents.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Render a path with forward slashes regardless of platform.
#[must_use]
pub fn to_slash(path: &Path) -> String {
    let s = path.to_string_lossy();
    if cfg!(windows) {
        s.replace('\\', "/")
    } else {
        s.into_owned()
    }
}

/// Longest common directory prefix of every path's parent directory.
///
/// A single path yields its own directory. Returns `None` for an empty input.
#[must_use]
pub fn common_base_path<P: AsRef<Path>>(paths: &[P]) -> Option<PathBuf> {
    let mut dirs = paths.iter().map(|p| {
        let p = p.as_ref();
        p.parent().unwrap_or(p)
    });

    let first = dirs.next()?;
    let mut common: Vec<Component<'_>> = first.components().collect();

    for dir in dirs {
        let shared = common
            .iter()
            .zip(dir.components())
            .take_while(|(a, b)| **a == *b)
            .count();
        common.truncate(shared);
    }

    Some(common.iter().collect())
}

/// Path of `path` relative to `base`, with forward slashes.
///
/// Returns `None` when `path` is not inside `base`.
#[must_use]
pub fn relative_slash(path: &Path, base: &Path) -> Option<String> {
    path.strip_prefix(base).ok().map(to_slash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_find_package_json_in_dir() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();

        assert_eq!(
            find_package_json(dir.path()),
            Some(dir.path().join("package.json"))
        );
    }

    #[test]
    fn test_find_package_json_walks_up() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("c");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();

        assert_eq!(
            find_package_json(&nested),
            Some(dir.path().join("package.json"))
        );
    }

    #[test]
    fn test_find_package_json_explicit_missing() {
        let dir = tempdir().unwrap();
        assert_eq!(find_package_json(&dir.path().join("package.json")), None);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize(Path::new("/repo/pkg/./src/../lib/index.d.ts")),
            PathBuf::from("/repo/pkg/lib/index.d.ts")
        );
    }

    #[test]
    fn test_common_base_path_across_packages() {
        let paths = [
            PathBuf::from("/repo/pkgA/src/index.d.ts"),
            PathBuf::from("/repo/pkgB/src/index.d.ts"),
        ];
        assert_eq!(common_base_path(&paths), Some(PathBuf::from("/repo")));
    }

    #[test]
    fn test_common_base_path_single() {
        let paths = [PathBuf::from("/repo/pkg/src/index.d.ts")];
        assert_eq!(
            common_base_path(&paths),
            Some(PathBuf::from("/repo/pkg/src"))
        );
    }

    #[test]
    fn test_common_base_path_nested() {
        let paths = [
            PathBuf::from("/repo/pkg/src/index.d.ts"),
            PathBuf::from("/repo/pkg/src/sub/index.d.ts"),
        ];
        assert_eq!(
            common_base_path(&paths),
            Some(PathBuf::from("/repo/pkg/src"))
        );
    }

    #[test]
    fn test_common_base_path_empty() {
        let paths: [PathBuf; 0] = [];
        assert_eq!(common_base_path(&paths), None);
    }

    #[test]
    fn test_relative_slash() {
        assert_eq!(
            relative_slash(
                Path::new("/repo/pkg/src/sub/index.d.ts"),
                Path::new("/repo/pkg/src")
            ),
            Some("sub/index.d.ts".to_string())
        );
        assert_eq!(
            relative_slash(Path::new("/other/x.ts"), Path::new("/repo")),
            None
        );
    }
}
