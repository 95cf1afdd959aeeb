//! Column mapping for conference-system sheet exports.
//!
//! Maps each canonical field to the source column that carries it. Repeated
//! column groups (authors, chairs) use a `{i}` placeholder for the 1-based
//! slot number, e.g. `First Name{i}` -> `First Name1`, `First Name2`, ...
//!
//! The mapping is resolved against the sheet header once, before any row is
//! read (see [`ColumnMap::resolve`]).

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Placeholder replaced by the slot number in group column templates.
pub const SLOT_PLACEHOLDER: &str = "{i}";

/// Upper bound on author or chair slots scanned in one header.
pub const MAX_SLOTS: u32 = 64;

/// Canonical field -> source column name. Optional fields are only read
/// (and only required in the header) when configured with a non-empty name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ColumnMap {
    pub category: String,
    pub category_order: String,
    pub session_code: String,
    pub session_title: String,
    pub room: String,
    pub start_time: String,
    pub end_time: String,
    pub paper_id: String,
    pub paper_title: String,
    pub paper_order: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    /// Comma-separated keyword list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    /// Truthy cell marks a plenary talk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plenary: Option<String>,
    /// Rows whose decision differs from the loader's accept value are skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub award: Option<String>,
    pub author: AuthorColumns,
    pub chair: ChairColumns,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            category: "Session Category".into(),
            category_order: "Session Category Order".into(),
            session_code: "Session Code".into(),
            session_title: "Session Name".into(),
            room: "Session Location".into(),
            start_time: "Session Start Time".into(),
            end_time: "Session End Time".into(),
            paper_id: "Paper ID".into(),
            paper_title: "Paper Title".into(),
            paper_order: "Paper Order".into(),
            abstract_text: Some("Abstract".into()),
            keywords: Some("Keywords".into()),
            plenary: None,
            decision: Some("Decision".into()),
            award: None,
            author: AuthorColumns::default(),
            chair: ChairColumns::default(),
        }
    }
}

/// Column templates of one author slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AuthorColumns {
    pub family_name: String,
    pub given_name: String,
    pub affiliation: String,
    /// Truthy cell marks the contact author.
    pub contact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Default for AuthorColumns {
    fn default() -> Self {
        Self {
            family_name: "Last Name{i}".into(),
            given_name: "First Name{i}".into(),
            affiliation: "Organization{i}".into(),
            contact: "Contact{i}".into(),
            orcid: None,
            country: Some("Country{i}".into()),
            email: None,
        }
    }
}

/// Column templates of one chair slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ChairColumns {
    pub family_name: String,
    pub given_name: String,
    pub affiliation: String,
}

impl Default for ChairColumns {
    fn default() -> Self {
        Self {
            family_name: "Session Chair Last{i}".into(),
            given_name: "Session Chair First{i}".into(),
            affiliation: "Session Chair Organization{i}".into(),
        }
    }
}

/// Column indices of one author slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AuthorSlot {
    pub family_name: usize,
    pub given_name: usize,
    pub affiliation: usize,
    pub contact: usize,
    pub orcid: Option<usize>,
    pub country: Option<usize>,
    pub email: Option<usize>,
}

/// Column indices of one chair slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChairSlot {
    pub family_name: usize,
    pub given_name: usize,
    pub affiliation: usize,
}

/// A [`ColumnMap`] resolved against one sheet header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedColumns {
    pub category: usize,
    pub category_order: usize,
    pub session_code: usize,
    pub session_title: usize,
    pub room: usize,
    pub start_time: usize,
    pub end_time: usize,
    pub paper_id: usize,
    pub paper_title: usize,
    pub paper_order: usize,
    pub abstract_text: Option<usize>,
    pub keywords: Option<usize>,
    pub plenary: Option<usize>,
    pub decision: Option<usize>,
    pub award: Option<usize>,
    pub authors: Vec<AuthorSlot>,
    pub chairs: Vec<ChairSlot>,
}

struct Header<'a> {
    index: HashMap<&'a str, usize>,
}

impl<'a> Header<'a> {
    fn new(columns: &'a [String]) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim(), i))
            .collect();
        Self { index }
    }

    fn has(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    fn require(&self, column: &str) -> Result<usize, ModelError> {
        self.index
            .get(column)
            .copied()
            .ok_or_else(|| ModelError::Schema(format!("sheet has no column '{column}'")))
    }

    /// An empty name disables the column, since TOML has no null.
    fn optional(&self, column: Option<&String>) -> Result<Option<usize>, ModelError> {
        column
            .filter(|c| !c.trim().is_empty())
            .map(|c| self.require(c))
            .transpose()
    }

    /// Number of consecutive slots `1..=n` whose key column exists,
    /// at most [`MAX_SLOTS`].
    fn slot_count(&self, key_template: &str) -> u32 {
        (1..=MAX_SLOTS)
            .take_while(|&i| self.has(&slot_column(key_template, i)))
            .last()
            .unwrap_or(0)
    }
}

/// Expand a group column template for slot `i`.
#[must_use]
pub fn slot_column(template: &str, i: u32) -> String {
    template.replace(SLOT_PLACEHOLDER, &i.to_string())
}

impl ColumnMap {
    /// Check that every author and chair template carries [`SLOT_PLACEHOLDER`].
    ///
    /// Disabled optional templates (empty names) are skipped.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Schema` naming the first template without a slot
    /// placeholder.
    pub fn check_templates(&self) -> Result<(), ModelError> {
        let author = &self.author;
        let chair = &self.chair;
        let templates = [
            ("author.family_name", Some(&author.family_name)),
            ("author.given_name", Some(&author.given_name)),
            ("author.affiliation", Some(&author.affiliation)),
            ("author.contact", Some(&author.contact)),
            ("author.orcid", author.orcid.as_ref()),
            ("author.country", author.country.as_ref()),
            ("author.email", author.email.as_ref()),
            ("chair.family_name", Some(&chair.family_name)),
            ("chair.given_name", Some(&chair.given_name)),
            ("chair.affiliation", Some(&chair.affiliation)),
        ];
        for (field, template) in templates {
            let Some(template) = template.filter(|t| !t.trim().is_empty()) else {
                continue;
            };
            if !template.contains(SLOT_PLACEHOLDER) {
                return Err(ModelError::Schema(format!(
                    "column template {field} = '{template}' has no {SLOT_PLACEHOLDER} slot placeholder"
                )));
            }
        }
        Ok(())
    }

    /// Resolve every configured column against `header`.
    ///
    /// Author slots are counted by the family-name template; at least one
    /// slot must exist and every configured column of every slot must be
    /// present. Chair slots are counted the same way and may be zero.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Schema` for a group template without a slot
    /// placeholder, or naming the first missing column.
    pub(crate) fn resolve(&self, header: &[String]) -> Result<ResolvedColumns, ModelError> {
        self.check_templates()?;
        let h = Header::new(header);

        let author_count = h.slot_count(&self.author.family_name);
        if author_count == 0 {
            return Err(ModelError::Schema(format!(
                "sheet has no column '{}'",
                slot_column(&self.author.family_name, 1)
            )));
        }
        let authors = (1..=author_count)
            .map(|i| -> Result<AuthorSlot, ModelError> {
                let col = |template: &str| h.require(&slot_column(template, i));
                let opt = |template: Option<&String>| {
                    h.optional(template.map(|t| slot_column(t, i)).as_ref())
                };
                Ok(AuthorSlot {
                    family_name: col(&self.author.family_name)?,
                    given_name: col(&self.author.given_name)?,
                    affiliation: col(&self.author.affiliation)?,
                    contact: col(&self.author.contact)?,
                    orcid: opt(self.author.orcid.as_ref())?,
                    country: opt(self.author.country.as_ref())?,
                    email: opt(self.author.email.as_ref())?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let chair_count = h.slot_count(&self.chair.family_name);
        let chairs = (1..=chair_count)
            .map(|i| -> Result<ChairSlot, ModelError> {
                let col = |template: &str| h.require(&slot_column(template, i));
                Ok(ChairSlot {
                    family_name: col(&self.chair.family_name)?,
                    given_name: col(&self.chair.given_name)?,
                    affiliation: col(&self.chair.affiliation)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ResolvedColumns {
            category: h.require(&self.category)?,
            category_order: h.require(&self.category_order)?,
            session_code: h.require(&self.session_code)?,
            session_title: h.require(&self.session_title)?,
            room: h.require(&self.room)?,
            start_time: h.require(&self.start_time)?,
            end_time: h.require(&self.end_time)?,
            paper_id: h.require(&self.paper_id)?,
            paper_title: h.require(&self.paper_title)?,
            paper_order: h.require(&self.paper_order)?,
            abstract_text: h.optional(self.abstract_text.as_ref())?,
            keywords: h.optional(self.keywords.as_ref())?,
            plenary: h.optional(self.plenary.as_ref())?,
            decision: h.optional(self.decision.as_ref())?,
            award: h.optional(self.award.as_ref())?,
            authors,
            chairs,
        })
    }
}
