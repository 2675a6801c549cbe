//! Package.json exports resolution for documentation entry points.
//!
//! - [`shape`] classifies the `exports` field once
//! - [`conditions`] evaluates targets for a single condition and checks files
//! - [`map`] keeps the ordered, deduplicated per-package result

pub mod conditions;
mod map;
mod shape;
mod warnings;

pub use conditions::{
    is_declaration_condition, resolve_condition, resolve_legacy, resolve_target, ExportsError,
    DEFAULT_CONDITION, ROOT_EXPORT_PATH, STRING_EXPORT_PATH,
};
pub use map::{ExportEntry, ExportMap};
pub use shape::ExportsShape;
pub use warnings::{warning_codes, ResolveWarning};

/// Whether an export path denotes the package root.
#[must_use]
pub fn is_root_export_path(export_path: &str) -> bool {
    matches!(export_path, "." | "./" | STRING_EXPORT_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_export_paths() {
        assert!(is_root_export_path("."));
        assert!(is_root_export_path("./"));
        assert!(is_root_export_path("exports"));
        assert!(!is_root_export_path("./sub"));
        assert!(!is_root_export_path("./*"));
    }
}
