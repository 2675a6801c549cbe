//! Module-name remapping.
//!
//! The documentation generator names every entry point after its path
//! relative to the common base directory of all entry points. This module
//! reproduces that key and maps it to a package-qualified display name
//! (`my-pkg`, `my-pkg/sub`, `my-pkg/features/a`), and picks the README
//! that documents each named module.
//!
//! Naming runs once per invocation, after every package is resolved, since
//! the base directory depends on all entry points together.

use crate::exports::{is_root_export_path, warning_codes, ExportEntry, ResolveWarning};
use crate::package::PackageDescriptor;
use crate::paths::{common_base_path, relative_slash, to_slash};
use docmap_util::fs::is_file;
use regex_lite::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// README file name looked up next to packages and entry files.
pub const README: &str = "README.md";

/// Result of the naming pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleNames {
    /// Longest common directory of every entry point.
    pub base_path: Option<PathBuf>,
    /// Generator module key → display name.
    pub module_names: BTreeMap<String, String>,
    /// Display name → README path (forward slashes).
    pub readmes: BTreeMap<String, String>,
}

/// Per-invocation naming state.
struct NamingContext<'a> {
    base_path: &'a Path,
    package_count: usize,
}

/// Compute module names and README associations for one invocation.
///
/// `bare_entries` are entry files given without a package; they only
/// participate in the base path computation.
pub fn map_module_names(
    packages: &[PackageDescriptor],
    bare_entries: &[PathBuf],
    warnings: &mut Vec<ResolveWarning>,
) -> ModuleNames {
    let all_entries: Vec<&Path> = packages
        .iter()
        .flat_map(|pkg| pkg.entries().map(|e| e.filepath.as_path()))
        .chain(bare_entries.iter().map(PathBuf::as_path))
        .collect();

    let Some(base_path) = common_base_path(&all_entries) else {
        return ModuleNames::default();
    };

    let ctx = NamingContext {
        base_path: &base_path,
        package_count: packages.len(),
    };

    let mut names = ModuleNames {
        base_path: Some(base_path.clone()),
        ..ModuleNames::default()
    };

    for pkg in packages {
        for entry in pkg.entries() {
            name_entry(&ctx, pkg, entry, &mut names, warnings);
        }
    }

    names
}

fn name_entry(
    ctx: &NamingContext<'_>,
    pkg: &PackageDescriptor,
    entry: &ExportEntry,
    names: &mut ModuleNames,
    warnings: &mut Vec<ResolveWarning>,
) {
    let Some((module_key, root_file)) = module_key(&entry.filepath, ctx.base_path) else {
        tracing::debug!(
            path = %entry.filepath.display(),
            "cannot derive a module key, skipping"
        );
        return;
    };

    let display_name = if is_root_export_path(&entry.export_path) {
        pkg.name.clone()
    } else if entry.is_wildcard() {
        let Some(subpath) = expand_wildcard(entry, &pkg.dirpath) else {
            warnings.push(
                ResolveWarning::new(
                    warning_codes::WILDCARD_MISMATCH,
                    "wildcard pattern does not match the resolved file",
                )
                .with_key(&entry.export_path)
                .with_path(&entry.filepath),
            );
            return;
        };
        join_display_name(&pkg.name, &subpath)
    } else if root_file {
        format!("{}/{module_key}", pkg.name)
    } else {
        join_display_name(&pkg.name, &entry.export_path)
    };

    associate_readme(ctx, pkg, entry, &display_name, names);

    if let Some(previous) = names
        .module_names
        .insert(module_key.clone(), display_name.clone())
    {
        if previous != display_name {
            tracing::debug!(
                key = %module_key,
                previous = %previous,
                current = %display_name,
                "module key overwritten"
            );
        }
    }
}

/// Derive the generator's module key for `filepath`.
///
/// Returns the key and whether the file sits directly in `base_path`.
fn module_key(filepath: &Path, base_path: &Path) -> Option<(String, bool)> {
    let relative = relative_slash(filepath, base_path)?;
    let stem = relative.split('.').next().unwrap_or_default();

    let root_file = !stem.contains('/');
    let key = if root_file {
        stem
    } else {
        stem.strip_suffix("/index").unwrap_or(stem)
    };

    if key.is_empty() {
        None
    } else {
        Some((key.to_string(), root_file))
    }
}

/// Substitute the wildcard capture of `entry` into its export path.
///
/// The unexpanded target (`./src/features/*.d.ts`) is turned into a regex
/// (`^src/features/(.*)\.d\.ts$`) and matched against the entry's path
/// relative to the package directory.
fn expand_wildcard(entry: &ExportEntry, package_dir: &Path) -> Option<String> {
    let pattern = entry.glob_entry_path.as_deref()?;
    let (regex, anchored) = wildcard_regex(pattern)?;

    let capture = match relative_slash(&entry.filepath, package_dir) {
        Some(relative) => anchored.captures(&relative)?.get(1)?.as_str().to_string(),
        None => regex
            .captures(&to_slash(&entry.filepath))?
            .get(1)?
            .as_str()
            .to_string(),
    };

    Some(entry.export_path.replace('*', &capture))
}

/// Build `(unanchored, anchored)` regexes for a wildcard target pattern.
fn wildcard_regex(pattern: &str) -> Option<(Regex, Regex)> {
    let stripped = strip_relative_prefix(pattern);
    let (head, tail) = stripped.split_once('*')?;
    let tail = tail
        .split('*')
        .map(regex_lite::escape)
        .collect::<Vec<_>>()
        .join(".*");
    let body = format!("{}(.*){}$", regex_lite::escape(head), tail);

    let unanchored = Regex::new(&body).ok()?;
    let anchored = Regex::new(&format!("^{body}")).ok()?;
    Some((unanchored, anchored))
}

fn strip_relative_prefix(mut pattern: &str) -> &str {
    loop {
        if let Some(rest) = pattern.strip_prefix("./") {
            pattern = rest;
        } else if let Some(rest) = pattern.strip_prefix("../") {
            pattern = rest;
        } else {
            return pattern;
        }
    }
}

/// Join a package name and an export sub-path (`"./sub"` → `"pkg/sub"`).
#[must_use]
pub fn join_display_name(package_name: &str, subpath: &str) -> String {
    let sub = strip_relative_prefix(subpath).trim_end_matches('/');
    if sub.is_empty() || sub == "." {
        package_name.to_string()
    } else {
        format!("{package_name}/{sub}")
    }
}

fn associate_readme(
    ctx: &NamingContext<'_>,
    pkg: &PackageDescriptor,
    entry: &ExportEntry,
    display_name: &str,
    names: &mut ModuleNames,
) {
    let root_readme = pkg.readme_path();

    if display_name == pkg.name {
        // With a single package the root README is already the index page.
        if ctx.package_count > 1 && is_file(&root_readme) {
            names
                .readmes
                .insert(display_name.to_string(), to_slash(&root_readme));
        }
        return;
    }

    let Some(entry_dir) = entry.filepath.parent() else {
        return;
    };
    let readme = entry_dir.join(README);
    if readme != root_readme && is_file(&readme) {
        names
            .readmes
            .insert(display_name.to_string(), to_slash(&readme));
    }
}
