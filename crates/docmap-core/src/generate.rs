//! Assembly of the options document handed to the documentation generator.

use crate::config::{DocOptions, LogLevel};
use crate::error::Result;
use crate::exports::ResolveWarning;
use crate::package::{resolve_inputs, Resolution};
use crate::paths::to_slash;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Keys owned by docmap; passthrough options cannot override them.
const RESERVED_KEYS: &[&str] = &[
    "entryPoints",
    "moduleNameTable",
    "readmeTable",
    "basePath",
    "tsconfig",
    "out",
    "logLevel",
];

/// Options document consumed by the documentation generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateConfig {
    /// Every entry point, forward slashes, in resolution order.
    pub entry_points: Vec<String>,
    /// Generator module key → display name.
    pub module_name_table: BTreeMap<String, String>,
    /// Display name → README path.
    pub readme_table: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tsconfig: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LogLevel>,
    /// User options passed through untouched.
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl GenerateConfig {
    /// Merge a finished resolution with the user's options.
    #[must_use]
    pub fn assemble(resolution: &Resolution, options: &DocOptions) -> Self {
        let passthrough = options
            .passthrough
            .iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            entry_points: resolution
                .entry_points()
                .iter()
                .map(|p| to_slash(p))
                .collect(),
            module_name_table: resolution.names.module_names.clone(),
            readme_table: resolution.names.readmes.clone(),
            base_path: resolution.names.base_path.as_deref().map(to_slash),
            tsconfig: options.tsconfig.as_deref().map(to_slash),
            out: options.out.as_deref().map(to_slash),
            log_level: options.log_level,
            options: passthrough,
        }
    }
}

/// Output of one generate invocation.
#[derive(Debug, Clone)]
pub struct Generated {
    pub config: GenerateConfig,
    pub resolution: Resolution,
}

impl Generated {
    #[must_use]
    pub fn warnings(&self) -> &[ResolveWarning] {
        &self.resolution.warnings
    }
}

/// Validate `options`, resolve every entry point and assemble the document.
///
/// Nothing is assembled when any fatal condition is hit.
///
/// # Errors
/// Returns the first fatal configuration or resolution error.
pub fn generate(options: &DocOptions, cwd: &Path) -> Result<Generated> {
    options.validate(cwd)?;

    let resolution = resolve_inputs(&options.inputs(), cwd, &options.resolve_options())?;
    let config = GenerateConfig::assemble(&resolution, options);

    Ok(Generated { config, resolution })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EntryPointSpec;
    use crate::error::Error;
    use serde_json::json;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn fixture() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            json!({
                "name": "gen",
                "exports": {
                    ".": "./src/index.d.ts",
                    "./sub": "./src/sub/index.d.ts"
                }
            })
            .to_string(),
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("src/sub")).unwrap();
        fs::write(dir.path().join("src/index.d.ts"), "").unwrap();
        fs::write(dir.path().join("src/sub/index.d.ts"), "").unwrap();
        dir
    }

    fn options_for(dir: &Path) -> DocOptions {
        let mut passthrough = Map::new();
        passthrough.insert("theme".to_string(), json!("default"));
        passthrough.insert("moduleNameTable".to_string(), json!({ "x": "y" }));
        DocOptions {
            entry_points: vec![EntryPointSpec::Path(dir.to_path_buf())],
            out: Some(PathBuf::from("docs")),
            passthrough,
            ..DocOptions::default()
        }
    }

    #[test]
    fn test_generate_assembles_tables() {
        let dir = fixture();
        let generated = generate(&options_for(dir.path()), dir.path()).unwrap();
        let config = &generated.config;

        assert_eq!(config.entry_points.len(), 2);
        assert_eq!(config.module_name_table.get("index").unwrap(), "gen");
        assert_eq!(config.module_name_table.get("sub").unwrap(), "gen/sub");
        assert!(config.readme_table.is_empty());
        assert_eq!(config.out.as_deref(), Some("docs"));
    }

    #[test]
    fn test_passthrough_serialization() {
        let dir = fixture();
        let generated = generate(&options_for(dir.path()), dir.path()).unwrap();
        let value = serde_json::to_value(&generated.config).unwrap();

        assert_eq!(value["theme"], json!("default"));
        // Reserved keys come from the resolution, not the passthrough options
        assert_eq!(value["moduleNameTable"]["index"], json!("gen"));
        assert!(value["moduleNameTable"].get("x").is_none());
        assert!(value.get("tsconfig").is_none());
    }

    #[test]
    fn test_generate_fails_before_assembly() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            json!({ "name": "nothing", "exports": {} }).to_string(),
        )
        .unwrap();

        let options = DocOptions {
            entry_points: vec![EntryPointSpec::Path(dir.path().to_path_buf())],
            ..DocOptions::default()
        };
        let err = generate(&options, dir.path()).unwrap_err();
        assert!(matches!(err, Error::NoEntryPoints { .. }));
    }
}
