//! Export condition resolution.
//!
//! Follows Node.js exports semantics for a single condition name:
//! - string targets are unconditional
//! - condition objects are searched in declaration order, with no implicit
//!   `"default"` fallback unless `"default"` is the condition being resolved
//! - arrays are fallback lists; every valid member is kept
//! - `null` excludes the sub-path
//!
//! Targets must start with `"./"` and stay inside the package directory.
//! Every candidate is then checked against the file system and wildcard
//! targets are expanded with `glob`, rooted at the package directory.

use super::map::ExportEntry;
use super::shape::ExportsShape;
use super::warnings::{warning_codes, ResolveWarning};
use crate::paths::{real_path, to_slash};
use docmap_util::fs::{is_allowed_source_file, is_declaration_file, is_file};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

/// Condition resolved when none is configured.
pub const DEFAULT_CONDITION: &str = "types";

/// Export path recorded for `"exports": "./file"` string shorthands.
pub const STRING_EXPORT_PATH: &str = "exports";

/// Export path recorded for the package root.
pub const ROOT_EXPORT_PATH: &str = ".";

/// Error raised while evaluating one exports target.
///
/// These never abort an invocation; the key is skipped with a warning.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportsError {
    #[error("export target {target:?} for {key:?} must start with \"./\"")]
    InvalidTarget { key: String, target: String },

    #[error("export target {target:?} for {key:?} escapes the package directory")]
    PathTraversal { key: String, target: String },

    #[error("conditions for {key:?} mix sub-path keys with condition names")]
    MixedConditions { key: String },

    #[error("unsupported export target for {key:?}: {value}")]
    UnsupportedTarget { key: String, value: String },
}

/// Whether `condition` selects TypeScript declaration files.
#[must_use]
pub fn is_declaration_condition(condition: &str) -> bool {
    matches!(condition, "types" | "typings")
}

/// A sub-path key paired with one unexpanded target, before file checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub export_path: String,
    pub target: String,
}

/// Resolve one exports target for `condition`.
///
/// Returns every matching target path (usually zero or one).
pub fn resolve_target(
    key: &str,
    target: &Value,
    condition: &str,
) -> Result<Vec<String>, ExportsError> {
    match target {
        Value::String(s) => validate_export_path(key, s).map(|s| vec![s]),
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => {
            let mut resolved = Vec::new();
            let mut first_err = None;
            for item in items {
                match resolve_target(key, item, condition) {
                    Ok(targets) => resolved.extend(targets),
                    Err(e) => {
                        first_err.get_or_insert(e);
                    }
                }
            }
            match first_err {
                Some(e) if resolved.is_empty() => Err(e),
                _ => Ok(resolved),
            }
        }
        Value::Object(conditions) => {
            if conditions.keys().any(|k| k.starts_with('.')) {
                return Err(ExportsError::MixedConditions {
                    key: key.to_string(),
                });
            }
            for (name, nested) in conditions {
                if name == condition {
                    return resolve_target(key, nested, condition);
                }
            }
            Ok(Vec::new())
        }
        Value::Bool(_) | Value::Number(_) => Err(ExportsError::UnsupportedTarget {
            key: key.to_string(),
            value: target.to_string(),
        }),
    }
}

/// Validate that an export path starts with "./" and has no `..` segment.
fn validate_export_path(key: &str, path: &str) -> Result<String, ExportsError> {
    if !path.starts_with("./") {
        return Err(ExportsError::InvalidTarget {
            key: key.to_string(),
            target: path.to_string(),
        });
    }

    if path.split('/').any(|segment| segment == "..") {
        return Err(ExportsError::PathTraversal {
            key: key.to_string(),
            target: path.to_string(),
        });
    }

    Ok(path.to_string())
}

/// Collect `(export path, target)` pairs for a classified exports field.
///
/// Resolver errors are recorded as warnings and the key is skipped.
pub fn candidates(
    shape: &ExportsShape,
    condition: &str,
    warnings: &mut Vec<ResolveWarning>,
) -> Vec<Candidate> {
    let mut out = Vec::new();
    let mut push = |export_path: &str, result: Result<Vec<String>, ExportsError>| match result {
        Ok(targets) => out.extend(targets.into_iter().map(|target| Candidate {
            export_path: export_path.to_string(),
            target,
        })),
        Err(e) => warnings.push(
            ResolveWarning::new(warning_codes::RESOLVE_FAILED, e.to_string()).with_key(export_path),
        ),
    };

    match shape {
        ExportsShape::Missing => {}
        ExportsShape::Single(target) => {
            if condition == "default" {
                push(
                    STRING_EXPORT_PATH,
                    validate_export_path(STRING_EXPORT_PATH, target).map(|t| vec![t]),
                );
            }
        }
        ExportsShape::Conditions(map) => {
            if let Some(target) = map.get(condition).and_then(Value::as_str) {
                push(
                    ROOT_EXPORT_PATH,
                    validate_export_path(ROOT_EXPORT_PATH, target).map(|t| vec![t]),
                );
            }
        }
        ExportsShape::Subpaths(map) => {
            for (key, target) in map {
                push(key, resolve_target(key, target, condition));
            }
        }
    }

    out
}

/// Resolve a classified exports field into entry points for one condition.
///
/// Returned entries are in resolution order and may contain duplicates;
/// [`super::ExportMap`] drops repeated file paths.
pub fn resolve_condition(
    shape: &ExportsShape,
    package_dir: &Path,
    condition: &str,
    warnings: &mut Vec<ResolveWarning>,
) -> Vec<ExportEntry> {
    let mut entries = Vec::new();
    for candidate in candidates(shape, condition, warnings) {
        expand_candidate(&candidate, package_dir, condition, &mut entries, warnings);
    }
    entries
}

/// Resolve the legacy `types`/`typings` manifest fields.
///
/// Yields at most one root entry. The file must be a declaration file.
pub fn resolve_legacy(
    manifest: &Value,
    package_dir: &Path,
    warnings: &mut Vec<ResolveWarning>,
) -> Option<ExportEntry> {
    let (field, target) = ["types", "typings"]
        .iter()
        .find_map(|field| manifest.get(*field).and_then(Value::as_str).map(|t| (*field, t)))?;

    let path = package_dir.join(target.strip_prefix("./").unwrap_or(target));
    if is_declaration_file(&path) {
        Some(ExportEntry::new(real_path(&path), ROOT_EXPORT_PATH, None))
    } else {
        warnings.push(
            ResolveWarning::new(
                warning_codes::NOT_DTS_FILE,
                format!("\"{field}\" field is not a DTS file"),
            )
            .with_key(field)
            .with_path(path),
        );
        None
    }
}

fn expand_candidate(
    candidate: &Candidate,
    package_dir: &Path,
    condition: &str,
    entries: &mut Vec<ExportEntry>,
    warnings: &mut Vec<ResolveWarning>,
) {
    let relative = candidate
        .target
        .strip_prefix("./")
        .unwrap_or(&candidate.target);
    let is_wildcard = candidate.export_path.contains('*') || candidate.target.contains('*');

    if !is_wildcard {
        let path = package_dir.join(relative);
        if accepts(&path, candidate, condition, warnings) {
            entries.push(ExportEntry::new(
                real_path(&path),
                &candidate.export_path,
                None,
            ));
        }
        return;
    }

    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&to_slash(package_dir)),
        relative
    );
    match glob::glob(&pattern) {
        Ok(paths) => {
            let mut matched = 0usize;
            for path in paths.flatten() {
                matched += 1;
                if accepts(&path, candidate, condition, warnings) {
                    entries.push(ExportEntry::new(
                        real_path(&path),
                        &candidate.export_path,
                        Some(candidate.target.clone()),
                    ));
                }
            }
            if matched == 0 {
                warnings.push(
                    ResolveWarning::new(
                        warning_codes::WILDCARD_MISMATCH,
                        "wildcard pattern matched no files",
                    )
                    .with_key(&candidate.export_path)
                    .with_path(pattern),
                );
            }
        }
        Err(e) => warnings.push(
            ResolveWarning::new(
                warning_codes::INVALID_PATTERN,
                format!("invalid wildcard pattern: {e}"),
            )
            .with_key(&candidate.export_path)
            .with_path(pattern),
        ),
    }
}

fn accepts(
    path: &Path,
    candidate: &Candidate,
    condition: &str,
    warnings: &mut Vec<ResolveWarning>,
) -> bool {
    if is_declaration_condition(condition) {
        if is_declaration_file(path) {
            return true;
        }
        warnings.push(
            ResolveWarning::new(
                warning_codes::NOT_DTS_FILE,
                "export condition is not a DTS file",
            )
            .with_key(&candidate.export_path)
            .with_path(path),
        );
        return false;
    }

    if is_allowed_source_file(path) && is_file(path) {
        return true;
    }
    warnings.push(
        ResolveWarning::new(warning_codes::NOT_A_FILE, "export condition is not a file")
            .with_key(&candidate.export_path)
            .with_path(path),
    );
    false
}
