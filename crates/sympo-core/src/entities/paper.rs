use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, FixedOffset};
use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};

use crate::entities::Author;
use crate::errors::ModelError;

/// An inclusive, 1-based page range assigned by the stamping collaborator.
///
/// Serialized as a two-element array `[first, last]`. Deserialized ranges are
/// checked by [`Paper::validate`], which names the paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct PageRange {
    first: u32,
    last: u32,
}

impl PageRange {
    /// # Errors
    ///
    /// Returns `ModelError::Validation` unless `1 <= first <= last`.
    pub fn new(first: u32, last: u32) -> Result<Self, ModelError> {
        let range = Self { first, last };
        range.validate()?;
        Ok(range)
    }

    /// # Errors
    ///
    /// Returns `ModelError::Validation` unless `1 <= first <= last`.
    pub fn validate(self) -> Result<(), ModelError> {
        if self.first == 0 || self.first > self.last {
            return Err(ModelError::validation(
                "pages",
                format!("[{}, {}] is not a range of 1-based pages", self.first, self.last),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub const fn first(self) -> u32 {
        self.first
    }

    #[must_use]
    pub const fn last(self) -> u32 {
        self.last
    }

    /// Number of pages in the range.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.last - self.first + 1
    }

    #[must_use]
    pub const fn overlaps(self, other: Self) -> bool {
        self.first <= other.last && other.first <= self.last
    }
}

impl From<(u32, u32)> for PageRange {
    fn from((first, last): (u32, u32)) -> Self {
        Self { first, last }
    }
}

impl From<PageRange> for (u32, u32) {
    fn from(range: PageRange) -> Self {
        (range.first, range.last)
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.last)
    }
}

impl JsonSchema for PageRange {
    fn schema_name() -> Cow<'static, str> {
        "PageRange".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "array",
            "items": { "type": "integer", "minimum": 1 },
            "minItems": 2,
            "maxItems": 2,
        })
    }
}

/// An accepted submission presented in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Paper {
    /// Submission id from the conference system. Stable external key.
    pub id: u32,
    pub title: String,
    /// 1-based presentation order within the session.
    pub order: u32,
    pub authors: Vec<Author>,
    #[serde(default)]
    pub award: Option<String>,
    /// Absent until the stamping collaborator assigns pages.
    #[serde(default)]
    pub pages: Option<PageRange>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub plenary: bool,
    #[serde(default)]
    pub start_time: Option<DateTime<FixedOffset>>,
}

impl Paper {
    /// Build an unpaginated paper with no award, abstract or keywords.
    ///
    /// # Errors
    ///
    /// Returns the first violation found by [`Paper::validate`].
    pub fn new(
        id: u32,
        title: impl Into<String>,
        order: u32,
        authors: Vec<Author>,
    ) -> Result<Self, ModelError> {
        let paper = Self {
            id,
            title: title.into(),
            order,
            authors,
            award: None,
            pages: None,
            abstract_text: String::new(),
            keywords: Vec::new(),
            plenary: false,
            start_time: None,
        };
        paper.validate()?;
        Ok(paper)
    }

    /// Check the paper-level invariants.
    ///
    /// # Errors
    ///
    /// - `ModelError::Validation` for an empty title, a zero order, an empty
    ///   author list, author orders that are not `1..=n` in sequence, an
    ///   invalid author, or an invalid page range.
    /// - `ModelError::AmbiguousContact` unless exactly one author is the contact.
    pub fn validate(&self) -> Result<(), ModelError> {
        let context = || format!("paper {}", self.id);

        if self.title.trim().is_empty() {
            return Err(ModelError::validation(context(), "title is empty"));
        }
        if self.order == 0 {
            return Err(ModelError::validation(context(), "order must be 1-based"));
        }
        if self.authors.is_empty() {
            return Err(ModelError::validation(context(), "no authors"));
        }
        if let Some(pages) = self.pages {
            pages.validate().map_err(|e| match e {
                ModelError::Validation { reason, .. } => ModelError::validation(context(), reason),
                other => other,
            })?;
        }
        for (position, author) in (1u32..).zip(&self.authors) {
            if author.order != position {
                return Err(ModelError::validation(
                    context(),
                    format!(
                        "author '{}' has order {} at position {position}",
                        author.person.display_name(),
                        author.order
                    ),
                ));
            }
            author.person.validate().map_err(|e| match e {
                ModelError::Validation { context: inner, reason } => {
                    ModelError::validation(format!("{}, {inner}", context()), reason)
                }
                other => other,
            })?;
        }

        let contacts = self.authors.iter().filter(|a| a.contact).count();
        if contacts != 1 {
            return Err(ModelError::AmbiguousContact {
                key: self.id.to_string(),
                count: contacts,
            });
        }
        Ok(())
    }

    /// The designated correspondence author.
    #[must_use]
    pub fn contact_author(&self) -> Option<&Author> {
        self.authors.iter().find(|a| a.contact)
    }

    /// Printed paper number, `{session code}{order}` (e.g. `A1-3` + `2`).
    #[must_use]
    pub fn number(&self, session_code: &str) -> String {
        format!("{session_code}{}", self.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Person;

    fn author(family: &str, order: u32, contact: bool) -> Author {
        Author::new(Person::new(family, "A.", "Univ.").unwrap(), order, contact)
    }

    #[test]
    fn page_range_rejects_inverted_and_zero() {
        assert!(PageRange::new(0, 2).is_err());
        assert!(PageRange::new(5, 4).is_err());
        let single = PageRange::new(7, 7).unwrap();
        assert_eq!(single.count(), 1);
    }

    #[test]
    fn page_range_overlap() {
        let a = PageRange::new(1, 4).unwrap();
        assert!(a.overlaps(PageRange::new(4, 6).unwrap()));
        assert!(!a.overlaps(PageRange::new(5, 6).unwrap()));
    }

    #[test]
    fn page_range_serializes_as_pair() {
        let range = PageRange::new(45, 46).unwrap();
        assert_eq!(serde_json::to_string(&range).unwrap(), "[45,46]");
        let inverted: PageRange = serde_json::from_str("[46,45]").unwrap();
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn inverted_pages_name_the_paper() {
        let mut paper = Paper::new(12, "A", 1, vec![author("Doe", 1, true)]).unwrap();
        paper.pages = Some(PageRange::from((46, 45)));
        let err = paper.validate().unwrap_err();
        assert!(matches!(
            err,
            ModelError::Validation { ref context, .. } if context == "paper 12"
        ));
    }

    #[test]
    fn new_paper_has_no_pages() {
        let paper = Paper::new(12, "A", 1, vec![author("Doe", 1, true)]).unwrap();
        assert_eq!(paper.pages, None);
        assert_eq!(paper.contact_author().unwrap().person.family_name, "Doe");
    }

    #[test]
    fn two_contacts_are_ambiguous() {
        let err = Paper::new(
            3,
            "Chaos",
            1,
            vec![author("Doe", 1, true), author("Roe", 2, true)],
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::AmbiguousContact { count: 2, .. }));
    }

    #[test]
    fn zero_contacts_are_ambiguous() {
        let err = Paper::new(3, "Chaos", 1, vec![author("Doe", 1, false)]).unwrap_err();
        assert!(matches!(err, ModelError::AmbiguousContact { count: 0, .. }));
    }

    #[test]
    fn author_order_must_follow_position() {
        let err = Paper::new(
            3,
            "Chaos",
            1,
            vec![author("Doe", 2, true), author("Roe", 1, false)],
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Validation { .. }));
    }

    #[test]
    fn number_joins_code_and_order() {
        let paper = Paper::new(3, "Chaos", 2, vec![author("Doe", 1, true)]).unwrap();
        assert_eq!(paper.number("A1L"), "A1L2");
    }
}
