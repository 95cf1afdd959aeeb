//! Patch documents and the update-merge engine.
//!
//! A patch names an existing record by key and carries only the fields to
//! change. Absent and `null` fields both mean "no change", so a patch can
//! never clear a field. Patches never insert or delete sessions or papers.

use chrono::{DateTime, FixedOffset};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Author, PageRange, Paper, Person, Session, SessionList};
use crate::errors::ModelError;
use crate::keys::{PaperKey, SessionKey};

/// Partial update of one paper, keyed by paper id within its session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PaperPatch {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    /// Replaces the whole author sequence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<Author>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub award: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<PageRange>,
    #[serde(
        default,
        rename = "abstract",
        skip_serializing_if = "Option::is_none"
    )]
    pub abstract_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plenary: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<FixedOffset>>,
}

/// Partial update of one session and, optionally, some of its papers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SessionPatch {
    pub category: String,
    pub category_order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chairs: Option<Vec<Person>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ss_organizers: Option<Vec<Person>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub papers: Vec<PaperPatch>,
}

impl SessionPatch {
    #[must_use]
    pub fn key(&self) -> SessionKey {
        SessionKey::new(self.category.clone(), self.category_order)
    }

    /// Check the people and page ranges this patch would write.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Validation` anchored on the patch's session key
    /// (and paper id) for a blank or badly identified person or an invalid
    /// page range.
    pub fn validate(&self) -> Result<(), ModelError> {
        let key = self.key();
        let people = self.chairs.iter().chain(&self.ss_organizers).flatten();
        for person in people {
            person.validate().map_err(|e| e.within_session(&key))?;
        }
        for paper in &self.papers {
            let context = format!("paper {}", paper.id);
            for author in paper.authors.iter().flatten() {
                author
                    .person
                    .validate()
                    .map_err(|e| e.within(&context).within_session(&key))?;
            }
            if let Some(pages) = paper.pages {
                pages
                    .validate()
                    .map_err(|e| e.within(&context).within_session(&key))?;
            }
        }
        Ok(())
    }

    fn merge_into(&self, session: &mut Session) {
        merge(&mut session.code, &self.code);
        merge(&mut session.title, &self.title);
        merge(&mut session.room, &self.room);
        merge(&mut session.start_time, &self.start_time);
        merge(&mut session.end_time, &self.end_time);
        merge(&mut session.chairs, &self.chairs);
        if let Some(organizers) = &self.ss_organizers {
            session.ss_organizers = Some(organizers.clone());
        }
    }
}

impl PaperPatch {
    fn merge_into(&self, paper: &mut Paper) {
        merge(&mut paper.title, &self.title);
        merge(&mut paper.order, &self.order);
        merge(&mut paper.authors, &self.authors);
        merge(&mut paper.abstract_text, &self.abstract_text);
        merge(&mut paper.keywords, &self.keywords);
        merge(&mut paper.plenary, &self.plenary);
        if self.award.is_some() {
            paper.award.clone_from(&self.award);
        }
        if self.pages.is_some() {
            paper.pages = self.pages;
        }
        if self.start_time.is_some() {
            paper.start_time = self.start_time;
        }
    }
}

fn merge<T: Clone>(field: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        field.clone_from(value);
    }
}

pub struct SessionPatchBuilder(SessionPatch);

impl SessionPatchBuilder {
    #[must_use]
    pub fn new(category: impl Into<String>, category_order: u32) -> Self {
        Self(SessionPatch {
            category: category.into(),
            category_order,
            code: None,
            title: None,
            room: None,
            start_time: None,
            end_time: None,
            chairs: None,
            ss_organizers: None,
            papers: Vec::new(),
        })
    }

    #[must_use]
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.0.code = Some(code.into());
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn room(mut self, room: impl Into<String>) -> Self {
        self.0.room = Some(room.into());
        self
    }

    #[must_use]
    pub const fn start_time(mut self, start_time: DateTime<FixedOffset>) -> Self {
        self.0.start_time = Some(start_time);
        self
    }

    #[must_use]
    pub const fn end_time(mut self, end_time: DateTime<FixedOffset>) -> Self {
        self.0.end_time = Some(end_time);
        self
    }

    #[must_use]
    pub fn chairs(mut self, chairs: Vec<Person>) -> Self {
        self.0.chairs = Some(chairs);
        self
    }

    #[must_use]
    pub fn ss_organizers(mut self, organizers: Vec<Person>) -> Self {
        self.0.ss_organizers = Some(organizers);
        self
    }

    #[must_use]
    pub fn paper(mut self, paper: PaperPatch) -> Self {
        self.0.papers.push(paper);
        self
    }

    #[must_use]
    pub fn build(self) -> SessionPatch {
        self.0
    }
}

pub struct PaperPatchBuilder(PaperPatch);

impl PaperPatchBuilder {
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self(PaperPatch {
            id,
            ..PaperPatch::default()
        })
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub const fn order(mut self, order: u32) -> Self {
        self.0.order = Some(order);
        self
    }

    #[must_use]
    pub fn authors(mut self, authors: Vec<Author>) -> Self {
        self.0.authors = Some(authors);
        self
    }

    #[must_use]
    pub fn award(mut self, award: impl Into<String>) -> Self {
        self.0.award = Some(award.into());
        self
    }

    #[must_use]
    pub const fn pages(mut self, pages: PageRange) -> Self {
        self.0.pages = Some(pages);
        self
    }

    #[must_use]
    pub fn abstract_text(mut self, text: impl Into<String>) -> Self {
        self.0.abstract_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn keywords(mut self, keywords: Vec<String>) -> Self {
        self.0.keywords = Some(keywords);
        self
    }

    #[must_use]
    pub const fn plenary(mut self, plenary: bool) -> Self {
        self.0.plenary = Some(plenary);
        self
    }

    #[must_use]
    pub const fn start_time(mut self, start_time: DateTime<FixedOffset>) -> Self {
        self.0.start_time = Some(start_time);
        self
    }

    #[must_use]
    pub fn build(self) -> PaperPatch {
        self.0
    }
}

/// Apply `patches` to a copy of `base` and return the merged list.
///
/// Patches apply in input order, so later patches win field by field.
/// `base` is never modified, whether or not the merge succeeds.
///
/// # Errors
///
/// - `ModelError::RecordNotFound` if a session or paper key has no match.
/// - `ModelError::Merge` if a key matches more than one record, or if the
///   merged list breaks any record invariant.
pub fn apply_updates(
    base: &SessionList,
    patches: &[SessionPatch],
) -> Result<SessionList, ModelError> {
    let mut merged = base.clone();
    let mut touched: Vec<usize> = Vec::new();

    for patch in patches {
        let key = patch.key();
        let slot = unique_match(
            merged.iter().enumerate().filter(|(_, s)| s.has_key(&key)).map(|(i, _)| i),
            || key.to_string(),
        )?;
        let session = &mut merged.sessions_mut()[slot];
        patch.merge_into(session);

        for paper_patch in &patch.papers {
            let paper_key = PaperKey::new(key.clone(), paper_patch.id);
            let index = unique_match(
                session
                    .papers
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.id == paper_patch.id)
                    .map(|(i, _)| i),
                || paper_key.to_string(),
            )?;
            paper_patch.merge_into(&mut session.papers[index]);
        }

        tracing::debug!(session = %key, papers = patch.papers.len(), "patch merged");
        if !touched.contains(&slot) {
            touched.push(slot);
        }
    }

    for &slot in &touched {
        let session = &merged.as_slice()[slot];
        session.validate().map_err(|e| ModelError::Merge {
            key: session.key().to_string(),
            reason: e.to_string(),
        })?;
    }
    tracing::info!(
        patches = patches.len(),
        sessions = touched.len(),
        "updates applied"
    );
    Ok(merged)
}

/// Apply `patches` to `base` in place.
///
/// All-or-nothing: on error `base` is exactly as it was before the call.
///
/// # Errors
///
/// Same as [`apply_updates`].
pub fn apply_updates_in_place(
    base: &mut SessionList,
    patches: &[SessionPatch],
) -> Result<(), ModelError> {
    *base = apply_updates(base, patches)?;
    Ok(())
}

/// The single index in `matches`, or the key error for zero or several.
///
/// A validated list never yields several matches; the `Merge` arm covers
/// lists built without validation.
fn unique_match(
    mut matches: impl Iterator<Item = usize>,
    key: impl Fn() -> String,
) -> Result<usize, ModelError> {
    let first = matches
        .next()
        .ok_or_else(|| ModelError::RecordNotFound { key: key() })?;
    let extra = matches.count();
    if extra > 0 {
        return Err(ModelError::Merge {
            key: key(),
            reason: format!("key matches {} records", extra + 1),
        });
    }
    Ok(first)
}
