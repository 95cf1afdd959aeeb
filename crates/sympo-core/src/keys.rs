//! Identifying keys.
//!
//! Entity identity is decided by these keys only, never by full field
//! contents. Patch matching and projection lookups go through them.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `(category, category_order)`: the unique key of a session.
///
/// Orders by category code, then by order within the category. This is the
/// default session order of a `SessionList`.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct SessionKey {
    pub category: String,
    pub category_order: u32,
}

impl SessionKey {
    #[must_use]
    pub fn new(category: impl Into<String>, category_order: u32) -> Self {
        Self {
            category: category.into(),
            category_order,
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.category, self.category_order)
    }
}

/// `(session key, paper id)`: the unique key of a paper.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaperKey {
    pub session: SessionKey,
    pub paper_id: u32,
}

impl PaperKey {
    #[must_use]
    pub const fn new(session: SessionKey, paper_id: u32) -> Self {
        Self { session, paper_id }
    }
}

impl fmt::Display for PaperKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.session, self.paper_id)
    }
}
