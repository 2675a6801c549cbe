use std::path::PathBuf;
use thiserror::Error;

/// Core error type for docmap operations.
///
/// Every variant is fatal for the invocation that produced it. Recoverable
/// problems are reported as [`crate::exports::ResolveWarning`] instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No package.json found for {path}")]
    PackageJsonNotFound { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    PackageJsonRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    PackageJsonInvalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Package at {path} has no \"name\" field and no name override was given")]
    PackageNameMissing { path: PathBuf },

    #[error("No entry points resolved for condition \"{condition}\" from inputs: {}", .inputs.join(", "))]
    NoEntryPoints {
        condition: String,
        inputs: Vec<String>,
    },
}

/// Stable error codes for machine-readable output.
pub mod codes {
    pub const CONFIG_READ_FAILED: &str = "CONFIG_READ_FAILED";
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
    pub const PACKAGE_JSON_NOT_FOUND: &str = "PACKAGE_JSON_NOT_FOUND";
    pub const PACKAGE_JSON_INVALID: &str = "PACKAGE_JSON_INVALID";
    pub const PACKAGE_NAME_MISSING: &str = "PACKAGE_NAME_MISSING";
    pub const NO_ENTRY_POINTS: &str = "NO_ENTRY_POINTS";
}

impl Error {
    /// Get the stable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigRead { .. } => codes::CONFIG_READ_FAILED,
            Self::ConfigParse { .. } | Self::InvalidConfig(_) => codes::CONFIG_INVALID,
            Self::PackageJsonNotFound { .. } => codes::PACKAGE_JSON_NOT_FOUND,
            Self::PackageJsonRead { .. } | Self::PackageJsonInvalid { .. } => {
                codes::PACKAGE_JSON_INVALID
            }
            Self::PackageNameMissing { .. } => codes::PACKAGE_NAME_MISSING,
            Self::NoEntryPoints { .. } => codes::NO_ENTRY_POINTS,
        }
    }

    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
