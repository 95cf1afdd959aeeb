use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::orcid::Orcid;

/// A named person with an affiliation. Authors, chairs and special-session
/// organizers all carry one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Person {
    pub family_name: String,
    pub given_name: String,
    pub affiliation: String,
    #[serde(default)]
    pub orcid: Option<Orcid>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Person {
    /// Build a person with no ORCID, country or e-mail.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Validation` if the family name or affiliation is blank.
    pub fn new(
        family_name: impl Into<String>,
        given_name: impl Into<String>,
        affiliation: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let person = Self {
            family_name: family_name.into(),
            given_name: given_name.into(),
            affiliation: affiliation.into(),
            orcid: None,
            country: None,
            email: None,
        };
        person.validate()?;
        Ok(person)
    }

    /// Attach an ORCID, parsing it first.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Validation` if the identifier is not canonical.
    pub fn with_orcid(mut self, orcid: &str) -> Result<Self, ModelError> {
        self.orcid = Some(Orcid::parse(orcid)?);
        Ok(self)
    }

    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Check required fields.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Validation` naming the person if a required field
    /// is blank or the ORCID is not canonical.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.family_name.trim().is_empty() {
            return Err(ModelError::validation(
                format!("person '{}'", self.display_name()),
                "family name is empty",
            ));
        }
        if self.affiliation.trim().is_empty() {
            return Err(ModelError::validation(
                format!("person '{}'", self.display_name()),
                "affiliation is empty",
            ));
        }
        if let Some(orcid) = &self.orcid {
            orcid.validate().map_err(|e| match e {
                ModelError::Validation { reason, .. } => ModelError::validation(
                    format!("person '{}'", self.display_name()),
                    format!("orcid {reason}"),
                ),
                other => other,
            })?;
        }
        Ok(())
    }

    /// "Given Family", as printed in programs and author lists.
    #[must_use]
    pub fn display_name(&self) -> String {
        join_names(&self.given_name, &self.family_name)
    }

    /// "Family Given", the order used by the metadata CSV.
    #[must_use]
    pub fn family_first_name(&self) -> String {
        join_names(&self.family_name, &self.given_name)
    }

    /// Whether `other` denotes the same person.
    ///
    /// ORCIDs decide when both sides carry one; otherwise names and
    /// affiliation must all match.
    #[must_use]
    pub fn same_person(&self, other: &Self) -> bool {
        match (&self.orcid, &other.orcid) {
            (Some(a), Some(b)) => a == b,
            _ => {
                self.family_name == other.family_name
                    && self.given_name == other.given_name
                    && self.affiliation == other.affiliation
            }
        }
    }
}

fn join_names(first: &str, second: &str) -> String {
    match (first.is_empty(), second.is_empty()) {
        (true, _) => second.to_string(),
        (_, true) => first.to_string(),
        _ => format!("{first} {second}"),
    }
}

/// A person in the author list of one paper.
///
/// `order` is 1-based and must equal the author's position in the paper's
/// author sequence. Exactly one author of a paper is the contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Author {
    #[serde(flatten)]
    pub person: Person,
    pub order: u32,
    #[serde(default)]
    pub contact: bool,
}

impl Author {
    #[must_use]
    pub const fn new(person: Person, order: u32, contact: bool) -> Self {
        Self {
            person,
            order,
            contact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_blank_family_name() {
        let err = Person::new("  ", "Ada", "Analytical Engines Ltd.").unwrap_err();
        assert!(matches!(err, ModelError::Validation { .. }));
    }

    #[test]
    fn new_rejects_blank_affiliation() {
        assert!(Person::new("Lovelace", "Ada", "").is_err());
    }

    #[test]
    fn with_orcid_validates() {
        let person = Person::new("Carberry", "Josiah", "Brown University").unwrap();
        assert!(person.clone().with_orcid("0000-0002-1825-0097").is_ok());
        assert!(person.with_orcid("0000-0002-1825-009:").is_err());
    }

    #[test]
    fn validate_checks_deserialized_orcid() {
        let mut person = Person::new("Carberry", "Josiah", "Brown University").unwrap();
        person.orcid = Some(Orcid::from("0000-0002-1825-009:".to_string()));
        let err = person.validate().unwrap_err();
        assert!(err.to_string().contains("Josiah Carberry"), "{err}");
    }

    #[test]
    fn name_orders() {
        let person = Person::new("Miino", "Yuu", "Tokushima University").unwrap();
        assert_eq!(person.display_name(), "Yuu Miino");
        assert_eq!(person.family_first_name(), "Miino Yuu");

        let mononym = Person::new("Suharto", "", "Gadjah Mada University").unwrap();
        assert_eq!(mononym.display_name(), "Suharto");
    }

    #[test]
    fn same_person_prefers_orcid() {
        let a = Person::new("Carberry", "Josiah", "Brown University")
            .unwrap()
            .with_orcid("0000-0002-1825-0097")
            .unwrap();
        let mut moved = a.clone();
        moved.affiliation = "Elsewhere".into();
        assert!(a.same_person(&moved));

        let other = Person::new("Carberry", "Josiah", "Brown University")
            .unwrap()
            .with_orcid("0000-0001-5109-3700")
            .unwrap();
        assert!(!a.same_person(&other));
    }

    #[test]
    fn author_serializes_flat() {
        let author = Author::new(Person::new("Lovelace", "Ada", "AEL").unwrap(), 1, true);
        let value = serde_json::to_value(&author).unwrap();
        assert_eq!(value["family_name"], "Lovelace");
        assert_eq!(value["orcid"], serde_json::Value::Null);
        assert_eq!(value["order"], 1);
        assert_eq!(value["contact"], true);
    }
}
