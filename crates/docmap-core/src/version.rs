//! Build identity and the defaults a run starts from.

use crate::config::DEFAULT_CONFIG_FILE;
use crate::exports::DEFAULT_CONDITION;
use serde::Serialize;

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Layout version of the `resolve --json` and `generate --json` reports.
pub const SCHEMA_VERSION: u32 = 1;

/// What `docmap version` reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub name: &'static str,
    pub version: &'static str,
    /// Git hash baked in through `DOCMAP_BUILD_GIT_HASH`, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_hash: Option<&'static str>,
    pub schema_version: u32,
    /// Export condition used when none is configured.
    pub default_condition: &'static str,
    /// Options file picked up from the working directory.
    pub config_file: &'static str,
}

impl VersionInfo {
    #[must_use]
    pub fn current() -> Self {
        Self {
            name: "docmap",
            version: VERSION,
            git_hash: option_env!("DOCMAP_BUILD_GIT_HASH"),
            schema_version: SCHEMA_VERSION,
            default_condition: DEFAULT_CONDITION,
            config_file: DEFAULT_CONFIG_FILE,
        }
    }
}

/// One-line version, e.g. `docmap 0.2.0 (abc123)`.
#[must_use]
pub fn version_string() -> String {
    let info = VersionInfo::current();
    match info.git_hash {
        Some(hash) => format!("{} {} ({hash})", info.name, info.version),
        None => format!("{} {}", info.name, info.version),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_version_string_names_binary() {
        let vs = version_string();
        assert!(vs.starts_with("docmap "));
        assert!(vs.contains(VERSION));
    }

    #[test]
    fn test_version_info_reports_defaults() {
        let value = serde_json::to_value(VersionInfo::current()).unwrap();
        assert_eq!(value["default_condition"], json!("types"));
        assert_eq!(value["config_file"], json!("docmap.json"));
        assert_eq!(value["schema_version"], json!(SCHEMA_VERSION));
    }
}
