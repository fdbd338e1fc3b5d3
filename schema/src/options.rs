//! Compiler options, loadable from TOML.

use serde::{Deserialize, Serialize};

use crate::iris::DEFAULT_CIM_NAMESPACE;
use crate::SchemaError;

/// What to do with an inverse role that names no property of the range
/// class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DanglingInverse {
    /// Fail compilation.
    #[default]
    Reject,
    /// Remove the inverse role and log a warning. Profiles often omit the
    /// partner side of an association.
    Drop,
}

/// Options controlling [`Schema::compile_with`](crate::Schema::compile_with).
///
/// ```
/// let options = cimrdf_schema::CompilerOptions::from_toml_str(r#"dangling_inverse = "drop""#)?;
/// assert_eq!(options.dangling_inverse, cimrdf_schema::DanglingInverse::Drop);
/// # Ok::<(), cimrdf_schema::SchemaError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    /// Namespace used when the schema declares no `xml:base`.
    pub default_namespace: String,
    /// Handling of inverse roles missing from the range class.
    pub dangling_inverse: DanglingInverse,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            default_namespace: DEFAULT_CIM_NAMESPACE.to_owned(),
            dangling_inverse: DanglingInverse::Reject,
        }
    }
}

impl CompilerOptions {
    /// Decodes options from a TOML document; missing keys keep their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Options`] if the document is not valid TOML or
    /// a key has the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self, SchemaError> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(CompilerOptions::from_toml_str("").unwrap(), CompilerOptions::default());
    }

    #[test]
    fn reads_every_key() {
        let options = CompilerOptions::from_toml_str(
            "default_namespace = \"http://iec.ch/TC57/2013/CIM-schema-cim16#\"\ndangling_inverse = \"drop\"\n",
        )
        .unwrap();
        assert_eq!(options.default_namespace, "http://iec.ch/TC57/2013/CIM-schema-cim16#");
        assert_eq!(options.dangling_inverse, DanglingInverse::Drop);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(matches!(
            CompilerOptions::from_toml_str("dangling_inverse = \"ignore\""),
            Err(SchemaError::Options(_))
        ));
    }
}
