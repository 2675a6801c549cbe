//! Package discovery and the resolution pass.
//!
//! Each configured input is classified in order:
//! - a directory or a `package.json` path resolves to the nearest manifest
//!   (missing manifest is fatal) and becomes a [`PackageDescriptor`]
//! - an existing source or declaration file becomes a bare entry point
//! - anything else is ignored
//!
//! Once every input is collected the naming pass runs exactly once.

use crate::error::{Error, Result};
use crate::exports::{resolve_legacy, ExportEntry, ExportMap, ExportsShape, ResolveWarning};
use crate::naming::{map_module_names, ModuleNames, README};
use crate::paths::{find_package_json, real_path, PACKAGE_JSON};
use crate::workspaces::{discover_workspace_packages, workspace_patterns};
use docmap_util::fs::{is_allowed_source_file, is_declaration_file, is_dir, is_file};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// One configured input path, with an optional package name override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInput {
    pub path: PathBuf,
    pub name: Option<String>,
}

impl PackageInput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            name: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A discovered package and its resolved entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    /// Package name from `package.json`, or the caller override.
    pub name: String,
    /// Real directory containing the `package.json`.
    pub dirpath: PathBuf,
    /// Condition the exports were resolved for.
    pub export_condition: String,
    /// Resolved exports, `None` when the manifest declares no `exports`.
    pub export_map: Option<ExportMap>,
    /// Entry from the legacy `types`/`typings` fields.
    pub legacy_entry: Option<ExportEntry>,
}

impl PackageDescriptor {
    /// Assemble a descriptor from already resolved parts.
    pub fn from_parts(
        name: impl Into<String>,
        dirpath: PathBuf,
        export_condition: impl Into<String>,
        export_map: Option<ExportMap>,
        legacy_entry: Option<ExportEntry>,
    ) -> Self {
        Self {
            name: name.into(),
            dirpath,
            export_condition: export_condition.into(),
            export_map,
            legacy_entry,
        }
    }

    /// Read the manifest at `manifest_path` and resolve its entry points.
    ///
    /// The legacy `types`/`typings` fallback applies when `exports` is absent
    /// or yields no entry point for `condition`.
    pub fn load(
        manifest_path: &Path,
        name_override: Option<&str>,
        condition: &str,
        warnings: &mut Vec<ResolveWarning>,
    ) -> Result<Self> {
        let manifest = read_manifest(manifest_path)?;
        let dirpath = real_path(manifest_path.parent().unwrap_or(Path::new(".")));

        let name = match name_override {
            Some(name) => name.to_string(),
            None => manifest
                .get("name")
                .and_then(Value::as_str)
                .map(String::from)
                .ok_or_else(|| Error::PackageNameMissing {
                    path: manifest_path.to_path_buf(),
                })?,
        };

        let shape = ExportsShape::of_manifest(&manifest);
        let export_map = shape
            .is_declared()
            .then(|| ExportMap::create(&shape, &dirpath, condition, warnings));

        // Declared exports with nothing usable for this condition still fall
        // back to the legacy fields.
        let legacy_entry = if export_map.as_ref().map_or(true, ExportMap::is_empty) {
            resolve_legacy(&manifest, &dirpath, warnings)
        } else {
            None
        };

        tracing::debug!(
            package = %name,
            dir = %dirpath.display(),
            entries = export_map.as_ref().map_or(0, ExportMap::len) + usize::from(legacy_entry.is_some()),
            "resolved package"
        );

        Ok(Self {
            name,
            dirpath,
            export_condition: condition.to_string(),
            export_map,
            legacy_entry,
        })
    }

    /// Iterate every entry point of the package in resolution order.
    pub fn entries(&self) -> impl Iterator<Item = &ExportEntry> {
        self.export_map
            .iter()
            .flat_map(ExportMap::iter)
            .chain(self.legacy_entry.iter())
    }

    /// Path of the package-root README (may not exist).
    #[must_use]
    pub fn readme_path(&self) -> PathBuf {
        self.dirpath.join(README)
    }
}

fn read_manifest(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::PackageJsonRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| Error::PackageJsonInvalid {
        path: path.to_path_buf(),
        source,
    })
}

/// Options threaded through one resolution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Export condition to resolve (default `"types"`).
    pub condition: String,
    /// Expand directory inputs that declare `workspaces` into their members.
    pub expand_workspaces: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            condition: crate::exports::DEFAULT_CONDITION.to_string(),
            expand_workspaces: false,
        }
    }
}

/// Outcome of one resolution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub packages: Vec<PackageDescriptor>,
    /// Entry files given directly, without a package.
    pub bare_entries: Vec<PathBuf>,
    pub names: ModuleNames,
    /// Recoverable problems, in the order they were found.
    pub warnings: Vec<ResolveWarning>,
}

impl Resolution {
    /// Every entry point, packages first, in resolution order.
    #[must_use]
    pub fn entry_points(&self) -> Vec<PathBuf> {
        self.packages
            .iter()
            .flat_map(|pkg| pkg.entries().map(|e| e.filepath.clone()))
            .chain(self.bare_entries.iter().cloned())
            .collect()
    }
}

/// Resolve every input, then name all entry points together.
///
/// Relative input paths are taken from `cwd`.
///
/// # Errors
/// - a directory or `package.json` input without a discoverable manifest
/// - an unreadable or invalid manifest, or one without a name
/// - no entry point resolved across all inputs
pub fn resolve_inputs(
    inputs: &[PackageInput],
    cwd: &Path,
    options: &ResolveOptions,
) -> Result<Resolution> {
    let mut packages = Vec::new();
    let mut bare_entries = Vec::new();
    let mut warnings = Vec::new();

    for input in inputs {
        let path = cwd.join(&input.path);
        let names_manifest = path.file_name().is_some_and(|n| n == PACKAGE_JSON);

        if is_dir(&path) || names_manifest {
            let manifest_path =
                find_package_json(&path).ok_or_else(|| Error::PackageJsonNotFound {
                    path: path.clone(),
                })?;

            let members = if options.expand_workspaces && is_dir(&path) {
                workspace_members(&manifest_path)?
            } else {
                Vec::new()
            };

            if members.is_empty() {
                packages.push(PackageDescriptor::load(
                    &manifest_path,
                    input.name.as_deref(),
                    &options.condition,
                    &mut warnings,
                )?);
            } else {
                for member in members {
                    packages.push(PackageDescriptor::load(
                        &member.join(PACKAGE_JSON),
                        None,
                        &options.condition,
                        &mut warnings,
                    )?);
                }
            }
        } else if is_file(&path) && (is_allowed_source_file(&path) || is_declaration_file(&path)) {
            bare_entries.push(real_path(&path));
        } else {
            tracing::debug!(path = %path.display(), "input is neither a package nor an entry file, ignoring");
        }
    }

    let entry_count: usize = packages.iter().map(|p| p.entries().count()).sum::<usize>()
        + bare_entries.len();
    if entry_count == 0 {
        return Err(Error::NoEntryPoints {
            condition: options.condition.clone(),
            inputs: inputs
                .iter()
                .map(|i| i.path.display().to_string())
                .collect(),
        });
    }

    let names = map_module_names(&packages, &bare_entries, &mut warnings);

    Ok(Resolution {
        packages,
        bare_entries,
        names,
        warnings,
    })
}

fn workspace_members(manifest_path: &Path) -> Result<Vec<PathBuf>> {
    let manifest = read_manifest(manifest_path)?;
    let Some(patterns) = workspace_patterns(&manifest) else {
        return Ok(Vec::new());
    };
    let root = manifest_path.parent().unwrap_or(Path::new("."));
    Ok(discover_workspace_packages(root, &patterns))
}
