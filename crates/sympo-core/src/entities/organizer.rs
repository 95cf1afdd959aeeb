use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Person;
use crate::errors::{LookupError, ModelError};

/// Organizers of a special session, as listed in the organizers side-file.
///
/// One entry may serve several category codes (a special session that runs
/// over more than one slot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SsOrganizer {
    pub categories: Vec<String>,
    pub title: String,
    pub organizers: Vec<Person>,
}

/// The organizers side-file. Each category is served by at most one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct SsOrganizerList {
    entries: Vec<SsOrganizer>,
}

impl SsOrganizerList {
    /// # Errors
    ///
    /// - `ModelError::Validation` if an entry has no categories, no organizers
    ///   or an invalid organizer.
    /// - `ModelError::DuplicateKey` if two entries serve the same category.
    pub fn new(entries: Vec<SsOrganizer>) -> Result<Self, ModelError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            let context = || format!("special session '{}'", entry.title);
            if entry.categories.is_empty() {
                return Err(ModelError::validation(context(), "no categories"));
            }
            if entry.organizers.is_empty() {
                return Err(ModelError::validation(context(), "no organizers"));
            }
            for person in &entry.organizers {
                person.validate()?;
            }
            for category in &entry.categories {
                if !seen.insert(category.as_str()) {
                    return Err(ModelError::DuplicateKey {
                        key: format!("organizers for category {category}"),
                    });
                }
            }
        }
        Ok(Self { entries })
    }

    /// The entry serving `category`.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::Category` if no entry serves it.
    pub fn by_category(&self, category: &str) -> Result<&SsOrganizer, LookupError> {
        self.entries
            .iter()
            .find(|e| e.categories.iter().any(|c| c == category))
            .ok_or_else(|| LookupError::Category(category.to_string()))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SsOrganizer> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(categories: &[&str]) -> SsOrganizer {
        SsOrganizer {
            categories: categories.iter().map(|c| (*c).to_string()).collect(),
            title: "Nonlinear Dynamics of Coupled Oscillators".into(),
            organizers: vec![Person::new("Kuramoto", "Yoshiki", "Kyoto University").unwrap()],
        }
    }

    #[test]
    fn lookup_by_any_served_category() {
        let list = SsOrganizerList::new(vec![entry(&["S1", "S2"])]).unwrap();
        assert_eq!(list.by_category("S2").unwrap().organizers.len(), 1);
        assert_eq!(
            list.by_category("S9").unwrap_err(),
            LookupError::Category("S9".into())
        );
    }

    #[test]
    fn category_served_twice_is_duplicate() {
        let err = SsOrganizerList::new(vec![entry(&["S1"]), entry(&["S1"])]).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateKey { .. }));
    }

    #[test]
    fn entry_without_organizers_is_invalid() {
        let mut e = entry(&["S1"]);
        e.organizers.clear();
        assert!(SsOrganizerList::new(vec![e]).is_err());
    }
}
