//! Session and codec settings.

use serde::{Deserialize, Serialize};

/// Settings shared by a [`Session`](crate::Session) and the codec.
///
/// ```
/// let config = cimrdf_runtime::RuntimeConfig::from_toml_str(r#"
///     namespace_prefix = "cim16"
///     document_base = "http://example.com/grid"
/// "#)?;
/// assert_eq!(config.id_prefix, "_");
/// # Ok::<(), toml::de::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Prefix bound to the schema namespace in written documents.
    pub namespace_prefix: String,
    /// `xml:base` written for documents that carry no base of their own.
    pub document_base: Option<String>,
    /// Text placed between `#` and the UUID of generated identities.
    pub id_prefix: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            namespace_prefix: "cim".to_owned(),
            document_base: None,
            id_prefix: "_".to_owned(),
        }
    }
}

impl RuntimeConfig {
    /// Parses settings from TOML; absent keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns the TOML error for malformed input or mistyped keys.
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_the_default() {
        assert_eq!(RuntimeConfig::from_toml_str("").unwrap(), RuntimeConfig::default());
    }

    #[test]
    fn mistyped_keys_are_rejected() {
        assert!(RuntimeConfig::from_toml_str("id_prefix = 3").is_err());
    }
}
