//! Classification of the `exports` field.
//!
//! The field is inspected once; resolution then dispatches on the variant.

use serde_json::{Map, Value};

/// The shape of a manifest's `exports` field.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportsShape {
    /// No `exports` field (or `null`). Triggers the legacy `types`/`typings` fallback.
    Missing,
    /// `"exports": "./index.js"`
    Single(String),
    /// Flat root conditions: `{ "import": "./esm.js", "types": "./index.d.ts" }`.
    ///
    /// Every value is a string or null and no key is a sub-path.
    Conditions(Map<String, Value>),
    /// General sub-path map: `{ ".": ..., "./sub": ..., "./features/*": ... }`.
    Subpaths(Map<String, Value>),
}

impl ExportsShape {
    /// Classify the `exports` field of a parsed manifest.
    #[must_use]
    pub fn of_manifest(manifest: &Value) -> Self {
        manifest.get("exports").map_or(Self::Missing, Self::classify)
    }

    /// Classify a raw `exports` value.
    #[must_use]
    pub fn classify(exports: &Value) -> Self {
        match exports {
            Value::String(s) => Self::Single(s.clone()),
            Value::Object(obj) if is_basic(obj) => Self::Conditions(obj.clone()),
            Value::Object(obj) if obj.is_empty() || has_subpath_keys(obj) => {
                Self::Subpaths(obj.clone())
            }
            // Nested root conditions and root fallback arrays are the "." target.
            Value::Object(_) | Value::Array(_) => {
                let mut obj = Map::new();
                obj.insert(".".to_string(), exports.clone());
                Self::Subpaths(obj)
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => Self::Missing,
        }
    }

    /// Whether the package declares an `exports` field at all.
    #[must_use]
    pub fn is_declared(&self) -> bool {
        !matches!(self, Self::Missing)
    }
}

fn has_subpath_keys(obj: &Map<String, Value>) -> bool {
    obj.keys().any(|k| k.starts_with('.'))
}

fn is_basic(obj: &Map<String, Value>) -> bool {
    !obj.is_empty()
        && !has_subpath_keys(obj)
        && obj.values().all(|v| v.is_string() || v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing() {
        assert_eq!(
            ExportsShape::of_manifest(&json!({ "name": "x" })),
            ExportsShape::Missing
        );
        assert_eq!(
            ExportsShape::of_manifest(&json!({ "name": "x", "exports": null })),
            ExportsShape::Missing
        );
    }

    #[test]
    fn test_single() {
        assert_eq!(
            ExportsShape::classify(&json!("./index.js")),
            ExportsShape::Single("./index.js".to_string())
        );
    }

    #[test]
    fn test_flat_conditions_are_basic() {
        let shape = ExportsShape::classify(&json!({
            "import": "./esm/index.js",
            "types": "./index.d.ts",
            "require": null
        }));
        assert!(matches!(shape, ExportsShape::Conditions(_)));
    }

    #[test]
    fn test_flat_subpaths_are_not_basic() {
        let shape = ExportsShape::classify(&json!({
            ".": "./src/index.d.ts",
            "./sub": "./src/sub/index.d.ts"
        }));
        assert!(matches!(shape, ExportsShape::Subpaths(_)));
    }

    #[test]
    fn test_nested_root_conditions_become_dot_target() {
        let shape = ExportsShape::classify(&json!({
            "import": { "types": "./index.d.mts", "default": "./index.mjs" }
        }));
        match shape {
            ExportsShape::Subpaths(map) => {
                assert_eq!(map.len(), 1);
                assert!(map.contains_key("."));
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn test_empty_object_is_declared() {
        let shape = ExportsShape::classify(&json!({}));
        assert!(shape.is_declared());
        assert!(matches!(shape, ExportsShape::Subpaths(ref m) if m.is_empty()));
    }
}
