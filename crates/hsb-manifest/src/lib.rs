//! Typed manifest records for HSB source units.
//!
//! The manifest is the YAML section at the top of an `.hsb` file, above the
//! `end of manifest` marker line. This crate decodes it into a
//! [`ManifestRecord`]: named optional fields for every key the compiler
//! understands, plus an `extras` bag holding anything else.
//!
//! # Example
//!
//! ```
//! use hsb_manifest::decode;
//!
//! let record = decode("title: Home\nlang: en\ncustom_key: 1").unwrap();
//! assert_eq!(record.title.as_deref(), Some("Home"));
//! assert!(record.head_boilerplate);
//! assert!(record.extras.contains_key("custom_key"));
//! ```

mod record;
mod text;

pub use record::ManifestRecord;

/// Error returned when the manifest is not valid YAML or has the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ManifestError {
    /// Parser message.
    pub message: String,
    /// 1-based line within the manifest, when the parser reports one.
    pub line: Option<usize>,
    /// 1-based column, when the parser reports one.
    pub column: Option<usize>,
}

impl ManifestError {
    fn from_yaml(err: &serde_yaml::Error) -> Self {
        let location = err.location();
        Self {
            message: err.to_string(),
            line: location.as_ref().map(serde_yaml::Location::line),
            column: location.as_ref().map(serde_yaml::Location::column),
        }
    }
}

/// Decode manifest text into a [`ManifestRecord`].
///
/// Empty (or whitespace-only) manifests, and manifests holding only YAML
/// comments, decode to [`ManifestRecord::default`].
///
/// # Errors
///
/// Returns [`ManifestError`] if the text is not valid YAML, is not a mapping,
/// or a recognized key holds a value of the wrong shape.
pub fn decode(manifest_text: &str) -> Result<ManifestRecord, ManifestError> {
    if manifest_text.trim().is_empty() {
        return Ok(ManifestRecord::default());
    }

    // First pass checks the document shape, second pass keeps error locations
    // for per-field type errors.
    let value: serde_yaml::Value =
        serde_yaml::from_str(manifest_text).map_err(|e| ManifestError::from_yaml(&e))?;
    match value {
        serde_yaml::Value::Null => return Ok(ManifestRecord::default()),
        serde_yaml::Value::Mapping(_) => {}
        _ => {
            return Err(ManifestError {
                message: "manifest must be a mapping of keys to values".to_owned(),
                line: Some(1),
                column: Some(1),
            });
        }
    }

    serde_yaml::from_str(manifest_text).map_err(|e| ManifestError::from_yaml(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode("").unwrap(), ManifestRecord::default());
        assert_eq!(decode("   \n\t  ").unwrap(), ManifestRecord::default());
    }

    #[test]
    fn test_decode_basic_fields() {
        let record = decode("title: \"T\"\ndescription: About us\ncanonical: https://x/y").unwrap();
        assert_eq!(record.title.as_deref(), Some("T"));
        assert_eq!(record.description.as_deref(), Some("About us"));
        assert_eq!(record.canonical.as_deref(), Some("https://x/y"));
    }

    #[test]
    fn test_decode_invalid_yaml_has_location() {
        let err = decode("title: [unterminated\nlang: en").unwrap_err();
        assert!(err.line.is_some());
        assert!(err.column.is_some());
    }

    #[test]
    fn test_decode_non_mapping() {
        let err = decode("- just\n- a list").unwrap_err();
        assert!(err.message.contains("mapping"));
        assert_eq!(err.line, Some(1));
    }

    #[test]
    fn test_decode_wrong_field_shape() {
        let err = decode("title:\n  nested: value").unwrap_err();
        assert!(err.message.contains("scalar"), "message: {}", err.message);
    }

    #[test]
    fn test_decode_boolean_defaults() {
        let record = decode("title: x").unwrap();
        assert!(record.head_boilerplate);
        assert!(!record.no_frontmatter);
        assert!(!record.is_application);
    }

    #[test]
    fn test_decode_boolean_overrides() {
        let record =
            decode("head_boilerplate: false\nno_frontmatter: true\nis_application: true").unwrap();
        assert!(!record.head_boilerplate);
        assert!(record.no_frontmatter);
        assert!(record.is_application);
    }
}
