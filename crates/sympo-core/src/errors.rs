//! Error taxonomy for the record model.
//!
//! `ModelError` covers construction, ingestion, patching and (de)serialization.
//! Projection queries never raise it; they return [`LookupError`] so a single
//! missing cross-reference can be rendered as a placeholder. File-level errors
//! live in [`crate::store::StoreError`].

use thiserror::Error;

use crate::keys::{PaperKey, SessionKey};

/// Errors raised while building, ingesting, merging or parsing records.
///
/// Every variant names the offending key, column or row so an operator can
/// find the bad line in a hand-curated spreadsheet.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Input document or sheet does not have the expected shape.
    #[error("Schema error: {0}")]
    Schema(String),

    /// An entity failed a construction-time constraint.
    #[error("Validation error in {context}: {reason}")]
    Validation { context: String, reason: String },

    /// Two records resolve to the same identifying key.
    #[error("Duplicate key: {key}")]
    DuplicateKey { key: String },

    /// A patch entry or side-file entry targets a key that does not exist.
    #[error("Record not found: {key}")]
    RecordNotFound { key: String },

    /// A paper has zero or several contact authors.
    #[error("Paper {key} has {count} contact authors, expected exactly one")]
    AmbiguousContact { key: String, count: usize },

    /// Patch application would break an invariant; nothing was applied.
    #[error("Merge failed at {key}: {reason}")]
    Merge { key: String, reason: String },

    /// The external page stamper failed for a paper.
    #[error("Stamping failed for paper {key}: {source}")]
    Stamping {
        key: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ModelError {
    pub(crate) fn validation(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Prefix the context of a validation error with an enclosing record.
    pub(crate) fn within(self, outer: &str) -> Self {
        match self {
            Self::Validation { context, reason } => Self::Validation {
                context: format!("{outer}, {context}"),
                reason,
            },
            other => other,
        }
    }

    /// Re-anchor a paper-level error onto its full `(session key, paper id)`.
    pub(crate) fn within_session(self, session: &SessionKey) -> Self {
        match self {
            Self::Validation { context, reason } => Self::Validation {
                context: format!("session {session}, {context}"),
                reason,
            },
            Self::AmbiguousContact { key, count } => Self::AmbiguousContact {
                key: format!("{session}/{key}"),
                count,
            },
            other => other,
        }
    }
}

/// A projection query did not find what it was asked for.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("No session {0}")]
    Session(SessionKey),

    #[error("No paper {0}")]
    Paper(PaperKey),

    #[error("No paper with id {0}")]
    PaperId(u32),

    /// Printed number, `{session code}{order}`.
    #[error("No paper numbered {0}")]
    PaperNumber(String),

    /// The id is used by papers in more than one session.
    #[error("Paper id {id} is ambiguous ({count} matches)")]
    AmbiguousPaperId { id: u32, count: usize },

    #[error("No authorship for {0}")]
    Person(String),

    #[error("No special-session organizers for category {0}")]
    Category(String),

    /// A revised PDF whose stem matches no outstanding request.
    #[error("Revised file {0} answers no revision request")]
    RevisedFile(String),
}
