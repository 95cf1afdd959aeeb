//! Page assignment through an external stamping collaborator.
//!
//! Stamping a PDF is outside this crate: a [`PageStamper`] is handed each
//! paper together with the page its first page must carry, and reports how
//! many pages the paper occupies. [`assign_pages`] turns those counts into
//! consecutive page ranges on a new list.

use std::collections::BTreeMap;

use anyhow::anyhow;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{PageRange, Paper, Session, SessionList};
use crate::errors::ModelError;

/// Stamps page numbers onto one paper's manuscript.
pub trait PageStamper {
    /// Stamp `paper` starting at `first_page` and return its page count.
    ///
    /// # Errors
    ///
    /// Any failure of the underlying tool, e.g. a missing input file.
    fn stamp(&mut self, session: &Session, paper: &Paper, first_page: u32) -> anyhow::Result<u32>;
}

/// Page counts known in advance, keyed by paper id.
///
/// Reads from a JSON object such as `{"12": 4, "15": 2}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct PageCounts(BTreeMap<u32, u32>);

impl PageCounts {
    #[must_use]
    pub const fn new(counts: BTreeMap<u32, u32>) -> Self {
        Self(counts)
    }

    #[must_use]
    pub fn get(&self, paper_id: u32) -> Option<u32> {
        self.0.get(&paper_id).copied()
    }
}

impl FromIterator<(u32, u32)> for PageCounts {
    fn from_iter<I: IntoIterator<Item = (u32, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl PageStamper for PageCounts {
    fn stamp(&mut self, _session: &Session, paper: &Paper, _first_page: u32) -> anyhow::Result<u32> {
        self.get(paper.id)
            .ok_or_else(|| anyhow!("no page count for paper {}", paper.id))
    }
}

/// Assign consecutive page ranges to every non-plenary paper.
///
/// Papers are visited in list order starting at `first_page`; plenary papers
/// get no pages. `list` is left as is and the paginated copy is returned.
///
/// # Errors
///
/// - `ModelError::Stamping` if the stamper fails or reports zero pages.
/// - `ModelError::Validation` if the page numbers run past `u32::MAX`.
pub fn assign_pages(
    list: &SessionList,
    stamper: &mut impl PageStamper,
    first_page: u32,
) -> Result<SessionList, ModelError> {
    let mut next = first_page.max(1);
    let mut ranges = Vec::new();

    for (s, session) in list.iter().enumerate() {
        for (p, paper) in session.papers.iter().enumerate() {
            if paper.plenary {
                continue;
            }
            let key = session.paper_key(paper).to_string();
            let count = stamper
                .stamp(session, paper, next)
                .map_err(|source| ModelError::Stamping {
                    key: key.clone(),
                    source,
                })?;
            if count == 0 {
                return Err(ModelError::Stamping {
                    key,
                    source: anyhow!("stamper reported zero pages"),
                });
            }
            let last = next
                .checked_add(count - 1)
                .ok_or_else(|| ModelError::validation(key.clone(), "page numbers overflow"))?;
            let range = PageRange::new(next, last)?;
            tracing::debug!(paper = %key, pages = %range, "paper stamped");
            ranges.push((s, p, range));
            next = last.saturating_add(1);
        }
    }

    let mut paged = list.clone();
    for (s, p, range) in ranges {
        paged.sessions_mut()[s].papers[p].pages = Some(range);
    }
    paged.validate()?;
    tracing::info!(first_page, last_page = next - 1, "pages assigned");
    Ok(paged)
}
