pub mod generate;
pub mod resolve;
pub mod version;

use docmap_core::error::Result as CoreResult;
use docmap_core::paths::to_slash;
use docmap_core::{find_config, load_config, DocOptions, EntryPointSpec, Error, ResolveWarning};
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

/// Exit code for fatal errors.
pub const EXIT_ERROR: i32 = 1;

/// Where entry points and options come from.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Package directories, package.json files or entry files (replace the config's entryPoints)
    #[arg(value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Export condition to resolve
    #[arg(long, value_name = "NAME")]
    pub condition: Option<String>,

    /// Options file (defaults to ./docmap.json when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Expand workspace roots into their member packages
    #[arg(long)]
    pub workspaces: bool,
}

/// Load every options object for this run and apply command-line overrides.
///
/// Without a config file the run uses a single default object whose entry
/// point is the working directory.
pub fn load_options(cwd: &Path, args: &SourceArgs) -> CoreResult<Vec<DocOptions>> {
    let config_path = args
        .config
        .as_ref()
        .map(|p| cwd.join(p))
        .or_else(|| find_config(cwd));

    let mut configs = match &config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading options");
            load_config(path)?
        }
        None => vec![DocOptions {
            entry_points: vec![EntryPointSpec::Path(cwd.to_path_buf())],
            ..DocOptions::default()
        }],
    };

    if configs.is_empty() {
        return Err(Error::invalid_config("options file holds an empty list"));
    }

    for options in &mut configs {
        if !args.inputs.is_empty() {
            options.entry_points = args
                .inputs
                .iter()
                .map(|p| EntryPointSpec::Path(cwd.join(p)))
                .collect();
        }
        if let Some(condition) = &args.condition {
            options.export_condition = Some(condition.clone());
        }
        if args.workspaces {
            options.workspaces = true;
        }
    }

    Ok(configs)
}

/// Log recoverable resolution problems.
pub fn report_warnings(warnings: &[ResolveWarning]) {
    for warning in warnings {
        let key = warning.key.as_deref().unwrap_or_default();
        let path = warning.path.as_deref().map(to_slash).unwrap_or_default();
        tracing::warn!(code = warning.code, key, path = path.as_str(), "{}", warning.message);
    }
}

/// Warnings as JSON values.
pub fn warnings_json(warnings: &[ResolveWarning]) -> Vec<serde_json::Value> {
    warnings
        .iter()
        .map(|w| {
            serde_json::json!({
                "code": w.code,
                "message": w.message,
                "key": w.key,
                "path": w.path.as_deref().map(to_slash),
            })
        })
        .collect()
}

/// Report a fatal error and stop.
///
/// In JSON mode the error goes to stdout as `{"ok": false, ...}` and the
/// process exits; otherwise it is returned for miette to render.
pub fn fail<T>(err: Error, json: bool) -> Result<T> {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": false,
                "error": {
                    "code": err.code(),
                    "message": err.to_string(),
                }
            })
        );
        std::process::exit(EXIT_ERROR);
    }
    Err(err).into_diagnostic()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_to_cwd_without_config() {
        let dir = tempdir().unwrap();
        let configs = load_options(dir.path(), &SourceArgs::default()).unwrap();

        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].entry_points[0].path(), dir.path());
    }

    #[test]
    fn test_overrides_apply_to_every_config() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("docmap.json"),
            json!([{ "entryPoints": ["a"] }, { "entryPoints": ["b"] }]).to_string(),
        )
        .unwrap();

        let args = SourceArgs {
            inputs: vec![PathBuf::from("pkg")],
            condition: Some("import".to_string()),
            workspaces: true,
            ..SourceArgs::default()
        };
        let configs = load_options(dir.path(), &args).unwrap();

        assert_eq!(configs.len(), 2);
        for options in &configs {
            assert_eq!(options.condition(), "import");
            assert!(options.workspaces);
            assert_eq!(options.entry_points[0].path(), dir.path().join("pkg"));
        }
    }

    #[test]
    fn test_empty_config_list_is_invalid() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("docmap.json"), "[]").unwrap();

        let err = load_options(dir.path(), &SourceArgs::default()).unwrap_err();
        assert_eq!(err.code(), "CONFIG_INVALID");
    }

    #[test]
    fn test_warnings_json_shape() {
        let warnings = vec![ResolveWarning::new("not_a_file", "export condition is not a file")
            .with_key("./missing")];
        let values = warnings_json(&warnings);

        assert_eq!(values[0]["code"], json!("not_a_file"));
        assert_eq!(values[0]["key"], json!("./missing"));
        assert_eq!(values[0]["path"], json!(null));
    }
}
