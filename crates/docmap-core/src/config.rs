use crate::error::{Error, Result};
use crate::exports::DEFAULT_CONDITION;
use crate::package::{PackageInput, ResolveOptions};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "docmap.json";

/// Runtime configuration for the docmap CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Current working directory.
    pub cwd: PathBuf,

    /// Whether to emit JSON logs.
    pub json_logs: bool,

    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            json_logs: false,
            verbosity: 0,
        }
    }
}

impl Config {
    /// Create a new config with the given working directory.
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            ..Default::default()
        }
    }

    /// Set verbosity level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set JSON log output.
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }
}

/// Log level accepted in config files.
///
/// Ordered from least to most verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// Map a `-v` count to a level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        match verbosity {
            0 => Self::Info,
            1 => Self::Debug,
            _ => Self::Trace,
        }
    }
}

/// Pick the log level for a run over one or more configurations.
///
/// A `-v` flag on the command line overrides every configured `logLevel`;
/// otherwise the most verbose configured level wins.
#[must_use]
pub fn effective_log_level(cli_verbosity: u8, configs: &[DocOptions]) -> LogLevel {
    if cli_verbosity > 0 {
        return LogLevel::from_verbosity(cli_verbosity);
    }
    configs
        .iter()
        .filter_map(|c| c.log_level)
        .max()
        .unwrap_or_default()
}

/// One configured entry point: a bare path or a path with a package name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryPointSpec {
    Path(PathBuf),
    Named { path: PathBuf, name: String },
}

impl EntryPointSpec {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Path(path) | Self::Named { path, .. } => path,
        }
    }

    fn to_input(&self) -> PackageInput {
        match self {
            Self::Path(path) => PackageInput::new(path.clone()),
            Self::Named { path, name } => PackageInput::new(path.clone()).with_name(name.clone()),
        }
    }
}

/// Documentation options for one generate invocation.
///
/// Unknown keys are kept in `passthrough` and handed to the generator as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocOptions {
    #[serde(default)]
    pub entry_points: Vec<EntryPointSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_condition: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tsconfig: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LogLevel>,

    /// Expand workspace roots into their member packages.
    #[serde(default)]
    pub workspaces: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out: Option<PathBuf>,

    #[serde(flatten)]
    pub passthrough: Map<String, Value>,
}

impl DocOptions {
    /// Export condition to resolve.
    #[must_use]
    pub fn condition(&self) -> &str {
        self.export_condition.as_deref().unwrap_or(DEFAULT_CONDITION)
    }

    /// Entry points as resolver inputs.
    #[must_use]
    pub fn inputs(&self) -> Vec<PackageInput> {
        self.entry_points.iter().map(EntryPointSpec::to_input).collect()
    }

    #[must_use]
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            condition: self.condition().to_string(),
            expand_workspaces: self.workspaces,
        }
    }

    /// Make relative paths absolute against `dir` (the config file's directory).
    #[must_use]
    pub fn rebase(mut self, dir: &Path) -> Self {
        for spec in &mut self.entry_points {
            match spec {
                EntryPointSpec::Path(path) | EntryPointSpec::Named { path, .. } => {
                    *path = dir.join(&*path);
                }
            }
        }
        self.tsconfig = self.tsconfig.map(|p| dir.join(p));
        self.out = self.out.map(|p| dir.join(p));
        self
    }

    /// Check caller-supplied settings before any resolution happens.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] for an empty condition, no entry
    /// points, or a `tsconfig` that is not an existing file.
    pub fn validate(&self, cwd: &Path) -> Result<()> {
        if self.condition().trim().is_empty() {
            return Err(Error::invalid_config("exportCondition must not be empty"));
        }

        if self.entry_points.is_empty() {
            return Err(Error::invalid_config("no entry points configured"));
        }

        if let Some(tsconfig) = &self.tsconfig {
            let path = cwd.join(tsconfig);
            if !path.is_file() {
                return Err(Error::invalid_config(format!(
                    "tsconfig not found: {}",
                    path.display()
                )));
            }
        }

        Ok(())
    }
}

/// A config file holds a single options object or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConfigFile {
    List(Vec<DocOptions>),
    Single(Box<DocOptions>),
}

/// Load a config file, rebasing relative paths onto its directory.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<Vec<DocOptions>> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: ConfigFile =
        serde_json::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

    let dir = path.parent().unwrap_or(Path::new("."));
    let configs = match parsed {
        ConfigFile::List(list) => list,
        ConfigFile::Single(single) => vec![*single],
    };

    Ok(configs.into_iter().map(|c| c.rebase(dir)).collect())
}

/// Find the default config file in `cwd`.
#[must_use]
pub fn find_config(cwd: &Path) -> Option<PathBuf> {
    let path = cwd.join(DEFAULT_CONFIG_FILE);
    path.is_file().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_config_builder() {
        let config = Config::new(PathBuf::from("/work"))
            .with_verbosity(2)
            .with_json_logs(true);
        assert_eq!(config.cwd, PathBuf::from("/work"));
        assert_eq!(config.verbosity, 2);
        assert!(config.json_logs);
    }

    #[test]
    fn test_parse_single_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(
            &path,
            json!({
                "entryPoints": ["packages/a", { "path": "packages/b", "name": "@scope/b" }],
                "exportCondition": "import",
                "logLevel": "debug",
                "out": "docs",
                "theme": "default",
                "excludePrivate": true
            })
            .to_string(),
        )
        .unwrap();

        let configs = load_config(&path).unwrap();
        assert_eq!(configs.len(), 1);
        let config = &configs[0];

        assert_eq!(config.condition(), "import");
        assert_eq!(config.log_level, Some(LogLevel::Debug));
        assert_eq!(config.out, Some(dir.path().join("docs")));
        assert_eq!(config.passthrough.get("theme"), Some(&json!("default")));
        assert_eq!(config.passthrough.get("excludePrivate"), Some(&json!(true)));

        let inputs = config.inputs();
        assert_eq!(inputs[0].path, dir.path().join("packages/a"));
        assert_eq!(inputs[0].name, None);
        assert_eq!(inputs[1].name.as_deref(), Some("@scope/b"));
    }

    #[test]
    fn test_parse_config_list() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("list.json");
        fs::write(
            &path,
            json!([
                { "entryPoints": ["a"] },
                { "entryPoints": ["b"], "logLevel": "warn" }
            ])
            .to_string(),
        )
        .unwrap();

        let configs = load_config(&path).unwrap();
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].condition(), DEFAULT_CONDITION);
    }

    #[test]
    fn test_parse_error_names_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
        assert!(err.to_string().contains(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn test_validate_tsconfig() {
        let dir = tempdir().unwrap();
        let mut options = DocOptions {
            entry_points: vec![EntryPointSpec::Path(PathBuf::from("."))],
            tsconfig: Some(PathBuf::from("tsconfig.json")),
            ..DocOptions::default()
        };

        assert!(matches!(
            options.validate(dir.path()),
            Err(Error::InvalidConfig(_))
        ));

        fs::write(dir.path().join("tsconfig.json"), "{}").unwrap();
        assert!(options.validate(dir.path()).is_ok());

        options.export_condition = Some(String::new());
        assert!(options.validate(dir.path()).is_err());
    }

    #[test]
    fn test_validate_requires_entry_points() {
        let dir = tempdir().unwrap();
        assert!(DocOptions::default().validate(dir.path()).is_err());
    }

    #[test]
    fn test_effective_log_level() {
        let configs = vec![
            DocOptions {
                log_level: Some(LogLevel::Warn),
                ..DocOptions::default()
            },
            DocOptions {
                log_level: Some(LogLevel::Debug),
                ..DocOptions::default()
            },
        ];

        assert_eq!(effective_log_level(0, &configs), LogLevel::Debug);
        assert_eq!(effective_log_level(2, &configs), LogLevel::Trace);
        assert_eq!(effective_log_level(0, &[]), LogLevel::Info);
    }

    #[test]
    fn test_find_config() {
        let dir = tempdir().unwrap();
        assert_eq!(find_config(dir.path()), None);
        fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "{}").unwrap();
        assert_eq!(
            find_config(dir.path()),
            Some(dir.path().join(DEFAULT_CONFIG_FILE))
        );
    }
}
