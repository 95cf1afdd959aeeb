use std::collections::{HashMap, HashSet};

use chrono::{DateTime, FixedOffset};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Paper, Person};
use crate::errors::ModelError;
use crate::keys::{PaperKey, SessionKey};

/// A scheduled slot in the symposium program grouping several papers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Session {
    /// Category code of the topical track (e.g. `A1`, `S3`).
    pub category: String,
    /// Order of this session within its category.
    pub category_order: u32,
    /// Printed session code, used for file names and metadata numbers.
    pub code: String,
    pub title: String,
    pub room: String,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    #[serde(default)]
    pub chairs: Vec<Person>,
    /// Present only for special sessions; filled from the organizers side-file.
    #[serde(default)]
    pub ss_organizers: Option<Vec<Person>>,
    pub papers: Vec<Paper>,
}

impl Session {
    #[must_use]
    pub fn key(&self) -> SessionKey {
        SessionKey::new(self.category.clone(), self.category_order)
    }

    /// Whether `key` identifies this session.
    #[must_use]
    pub fn has_key(&self, key: &SessionKey) -> bool {
        self.category == key.category && self.category_order == key.category_order
    }

    #[must_use]
    pub fn paper_key(&self, paper: &Paper) -> PaperKey {
        PaperKey::new(self.key(), paper.id)
    }

    #[must_use]
    pub const fn is_special(&self) -> bool {
        self.ss_organizers.is_some()
    }

    /// Check session-level invariants and every contained paper.
    ///
    /// # Errors
    ///
    /// - `ModelError::Validation` for blank identifying text, a time slot that
    ///   ends before it starts, an invalid chair or organizer, two papers
    ///   with the same presentation order, or sibling papers whose page
    ///   ranges overlap.
    /// - `ModelError::DuplicateKey` when two papers share an id.
    /// - Any paper-level error, re-anchored on this session's key.
    pub fn validate(&self) -> Result<(), ModelError> {
        let key = self.key();
        let context = || format!("session {key}");

        if self.category.trim().is_empty() {
            return Err(ModelError::validation(context(), "category is empty"));
        }
        if self.code.trim().is_empty() {
            return Err(ModelError::validation(context(), "code is empty"));
        }
        if self.title.trim().is_empty() {
            return Err(ModelError::validation(context(), "title is empty"));
        }
        if self.end_time < self.start_time {
            return Err(ModelError::validation(
                context(),
                format!("ends at {} before it starts at {}", self.end_time, self.start_time),
            ));
        }
        let organizers = self.ss_organizers.iter().flatten();
        for person in self.chairs.iter().chain(organizers) {
            person.validate().map_err(|e| e.within_session(&key))?;
        }

        let mut seen = HashSet::new();
        let mut orders = HashMap::new();
        for paper in &self.papers {
            if !seen.insert(paper.id) {
                return Err(ModelError::DuplicateKey {
                    key: self.paper_key(paper).to_string(),
                });
            }
            paper.validate().map_err(|e| e.within_session(&key))?;
            if let Some(other) = orders.insert(paper.order, paper.id) {
                return Err(ModelError::validation(
                    context(),
                    format!("papers {other} and {} share presentation order {}", paper.id, paper.order),
                ));
            }
        }

        let paged: Vec<_> = self
            .papers
            .iter()
            .filter_map(|p| p.pages.map(|range| (p.id, range)))
            .collect();
        for (i, (id, range)) in paged.iter().enumerate() {
            if let Some((other, other_range)) =
                paged[i + 1..].iter().find(|(_, r)| r.overlaps(*range))
            {
                return Err(ModelError::validation(
                    context(),
                    format!("pages {range} of paper {id} overlap pages {other_range} of paper {other}"),
                ));
            }
        }
        Ok(())
    }
}
