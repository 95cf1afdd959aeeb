//! ORCID identifiers.

use std::borrow::Cow;
use std::fmt;

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// JSON Schema pattern equivalent to [`Orcid::parse`].
pub const ORCID_PATTERN: &str = "^[0-9]{4}-[0-9]{4}-[0-9]{4}-[0-9]{3}[0-9X]$";

/// A canonical ORCID identifier, `NNNN-NNNN-NNNN-NNNX`.
///
/// The last character may be the `X` check digit. [`Orcid::parse`] only
/// returns well-formed values. Deserialization keeps the raw text so a bad
/// identifier in a stored document is reported by [`Person::validate`]
/// together with the record that holds it.
///
/// [`Person::validate`]: crate::entities::Person::validate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Orcid(String);

impl Orcid {
    /// Parse a canonical ORCID. No trimming or case folding is applied.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Validation` if `value` is not of the form
    /// `NNNN-NNNN-NNNN-NNNX`.
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        let orcid = Self(value.to_string());
        orcid.validate()?;
        Ok(orcid)
    }

    /// # Errors
    ///
    /// Returns `ModelError::Validation` if the identifier is not canonical.
    pub fn validate(&self) -> Result<(), ModelError> {
        if is_canonical(&self.0) {
            Ok(())
        } else {
            Err(ModelError::validation(
                "orcid",
                format!("'{}' is not of the form NNNN-NNNN-NNNN-NNNX", self.0),
            ))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_canonical(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 19
        && bytes.iter().enumerate().all(|(i, &b)| match i {
            4 | 9 | 14 => b == b'-',
            18 => b.is_ascii_digit() || b == b'X',
            _ => b.is_ascii_digit(),
        })
}

impl From<String> for Orcid {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<Orcid> for String {
    fn from(value: Orcid) -> Self {
        value.0
    }
}

impl fmt::Display for Orcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl JsonSchema for Orcid {
    fn schema_name() -> Cow<'static, str> {
        "Orcid".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "pattern": ORCID_PATTERN,
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn accepts_canonical_identifier() {
        let orcid = Orcid::parse("0000-0002-1825-0097").unwrap();
        assert_eq!(orcid.as_str(), "0000-0002-1825-0097");
    }

    #[test]
    fn accepts_x_check_digit() {
        assert!(Orcid::parse("0000-0002-1694-233X").is_ok());
    }

    #[test]
    fn rejects_trailing_colon() {
        let err = Orcid::parse("0000-0002-1825-009:").unwrap_err();
        assert!(matches!(err, ModelError::Validation { .. }));
        assert!(err.to_string().contains("0000-0002-1825-009:"));
    }

    #[rstest]
    #[case::no_separators("0000000218250097")]
    #[case::long_group("0000-0002-18250-097")]
    #[case::lowercase_check("0000-0002-1825-009x")]
    #[case::leading_x("X000-0002-1825-0097")]
    #[case::leading_space(" 0000-0002-1825-0097")]
    fn rejects_non_canonical(#[case] value: &str) {
        assert!(Orcid::parse(value).is_err(), "{value} should be rejected");
    }

    #[test]
    fn deserialized_identifier_is_checked_by_validate() {
        let ok: Orcid = serde_json::from_str("\"0000-0002-1825-0097\"").unwrap();
        assert!(ok.validate().is_ok());
        let bad: Orcid = serde_json::from_str("\"0000-0002-1825-009:\"").unwrap();
        assert!(matches!(bad.validate(), Err(ModelError::Validation { .. })));
    }
}
