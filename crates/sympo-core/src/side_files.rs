//! Award and special-session organizer side-files.
//!
//! Both files are turned into ordinary patches, so they go through the same
//! matching and atomic merge as hand-written corrections.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{SessionList, SsOrganizerList};
use crate::errors::{LookupError, ModelError};
use crate::keys::SessionKey;
use crate::patch::{PaperPatchBuilder, SessionPatch, SessionPatchBuilder};

/// Separator between several awards of one paper.
pub const AWARD_SEPARATOR: &str = ", ";

/// One line of the awards file: the awards won by a paper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AwardEntry {
    /// Paper id, unique across the whole program.
    pub id: u32,
    pub awards: Vec<String>,
}

/// Turn award entries into one patch per affected session.
///
/// # Errors
///
/// - `ModelError::Validation` if an entry lists no awards.
/// - `ModelError::RecordNotFound` if no paper has the entry's id.
/// - `ModelError::Merge` if the id is used in more than one session.
pub fn award_patches(
    list: &SessionList,
    awards: &[AwardEntry],
) -> Result<Vec<SessionPatch>, ModelError> {
    let mut by_session: BTreeMap<SessionKey, SessionPatchBuilder> = BTreeMap::new();
    for entry in awards {
        if entry.awards.is_empty() {
            return Err(ModelError::validation(
                format!("award entry for paper {}", entry.id),
                "no awards listed",
            ));
        }
        let (session, _) = list.paper_by_id(entry.id).map_err(|e| match e {
            LookupError::AmbiguousPaperId { id, count } => ModelError::Merge {
                key: format!("paper id {id}"),
                reason: format!("id is used by {count} papers"),
            },
            other => ModelError::RecordNotFound {
                key: other.to_string(),
            },
        })?;
        let key = session.key();
        let builder = by_session
            .remove(&key)
            .unwrap_or_else(|| SessionPatchBuilder::new(key.category.clone(), key.category_order));
        let paper = PaperPatchBuilder::new(entry.id)
            .award(entry.awards.join(AWARD_SEPARATOR))
            .build();
        by_session.insert(key, builder.paper(paper));
    }
    tracing::debug!(entries = awards.len(), sessions = by_session.len(), "award patches built");
    Ok(by_session.into_values().map(SessionPatchBuilder::build).collect())
}

/// Patches setting `ss_organizers` on every session of a served category.
///
/// Categories without any session are logged and skipped.
#[must_use]
pub fn organizer_patches(list: &SessionList, organizers: &SsOrganizerList) -> Vec<SessionPatch> {
    for entry in organizers.iter() {
        for category in &entry.categories {
            if !list.iter().any(|s| &s.category == category) {
                tracing::warn!(%category, title = %entry.title, "no session for organizer category");
            }
        }
    }
    list.iter()
        .filter_map(|session| {
            let entry = organizers.by_category(&session.category).ok()?;
            Some(
                SessionPatchBuilder::new(session.category.clone(), session.category_order)
                    .ss_organizers(entry.organizers.clone())
                    .build(),
            )
        })
        .collect()
}
