//! Recoverable resolution diagnostics.
//!
//! A warning never aborts an invocation: the offending candidate is dropped
//! and resolution carries on. The CLI logs every warning it receives.

use std::fmt;
use std::path::PathBuf;

/// Warning generated while resolving exports or naming modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveWarning {
    /// Warning code (see [`warning_codes`]).
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Exports sub-path key involved, if any.
    pub key: Option<String>,
    /// File path involved, if any.
    pub path: Option<PathBuf>,
}

impl ResolveWarning {
    /// Create a new warning.
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            key: None,
            path: None,
        }
    }

    /// Set the exports key for this warning.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the path for this warning.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl fmt::Display for ResolveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(key) = &self.key {
            write!(f, " (key {key:?}")?;
            if let Some(path) = &self.path {
                write!(f, ", path {}", path.display())?;
            }
            write!(f, ")")?;
        } else if let Some(path) = &self.path {
            write!(f, " ({})", path.display())?;
        }
        Ok(())
    }
}

/// Warning codes used during resolution.
pub mod warning_codes {
    pub const NOT_DTS_FILE: &str = "not_dts_file";
    pub const NOT_A_FILE: &str = "not_a_file";
    pub const RESOLVE_FAILED: &str = "resolve_failed";
    pub const INVALID_PATTERN: &str = "invalid_pattern";
    pub const WILDCARD_MISMATCH: &str = "wildcard_mismatch";
}
