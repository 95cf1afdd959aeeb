use std::cmp::Ordering;
use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Session;
use crate::errors::ModelError;

/// The top-level owned collection of sessions.
///
/// Sessions are unique by `(category, category_order)`. The list owns every
/// session, paper and author transitively; outside code only ever sees shared
/// references, so the patch engine (and the pages-assigning stamping
/// contract) are the only ways to change a list once it exists.
///
/// Serializes transparently as the ordered array of sessions. Deserialization
/// goes through [`crate::json::from_json`], which validates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct SessionList {
    sessions: Vec<Session>,
}

impl SessionList {
    /// Build a list in default order, `(category, category_order)`.
    ///
    /// # Errors
    ///
    /// Returns the first invariant violation found by [`SessionList::validate`].
    pub fn new(sessions: Vec<Session>) -> Result<Self, ModelError> {
        Self::with_order(sessions, SessionOrder::Key)
    }

    /// Build a list sorted by an explicit session order.
    ///
    /// # Errors
    ///
    /// Returns the first invariant violation found by [`SessionList::validate`].
    pub fn with_order(
        sessions: Vec<Session>,
        order: impl SessionComparator,
    ) -> Result<Self, ModelError> {
        let mut sessions = sessions;
        sessions.sort_by(|a, b| order.compare(a, b));
        Self::from_ordered(sessions)
    }

    /// Build a list keeping the given order. Used when reloading persisted
    /// lists, whose order is significant.
    ///
    /// # Errors
    ///
    /// Returns the first invariant violation found by [`SessionList::validate`].
    pub fn from_ordered(sessions: Vec<Session>) -> Result<Self, ModelError> {
        let list = Self { sessions };
        list.validate()?;
        Ok(list)
    }

    /// Check every invariant of the list and everything it owns.
    ///
    /// # Errors
    ///
    /// - `ModelError::DuplicateKey` if two sessions share a key.
    /// - Any session- or paper-level error.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut seen = HashSet::new();
        for session in &self.sessions {
            let key = session.key();
            session.validate()?;
            if !seen.insert(key) {
                return Err(ModelError::DuplicateKey {
                    key: session.key().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Sessions in iteration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Session> {
        self.sessions.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Session] {
        &self.sessions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    #[must_use]
    pub fn into_sessions(self) -> Vec<Session> {
        self.sessions
    }

    /// Mutable access for the patch engine and the stamping contract only.
    /// Callers must re-validate before handing the list back.
    pub(crate) fn sessions_mut(&mut self) -> &mut [Session] {
        &mut self.sessions
    }
}

impl<'a> IntoIterator for &'a SessionList {
    type Item = &'a Session;
    type IntoIter = std::slice::Iter<'a, Session>;

    fn into_iter(self) -> Self::IntoIter {
        self.sessions.iter()
    }
}

/// Something that can order two sessions.
///
/// Implemented for [`SessionOrder`] and for any comparison closure.
pub trait SessionComparator {
    fn compare(&self, a: &Session, b: &Session) -> Ordering;
}

impl<F> SessionComparator for F
where
    F: Fn(&Session, &Session) -> Ordering,
{
    fn compare(&self, a: &Session, b: &Session) -> Ordering {
        self(a, b)
    }
}

/// Named session orders, selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionOrder {
    /// `(category, category_order)`.
    #[default]
    Key,
    /// Printed session code, read as a number with letters replaced by their
    /// alphabet position (`A` = 1, …) and an `L-` prefix ignored. Codes that
    /// do not reduce to a number sort after those that do.
    Code,
}

impl SessionComparator for SessionOrder {
    fn compare(&self, a: &Session, b: &Session) -> Ordering {
        match self {
            Self::Key => a.key().cmp(&b.key()),
            Self::Code => match (session_code_rank(&a.code), session_code_rank(&b.code)) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => a.code.cmp(&b.code),
            }
            .then_with(|| a.key().cmp(&b.key())),
        }
    }
}

/// Numeric rank of a session code: `B12` -> 212, `L-A3` -> 13.
#[must_use]
pub fn session_code_rank(code: &str) -> Option<u64> {
    let code = code.strip_prefix("L-").unwrap_or(code);
    let mut digits = String::new();
    for c in code.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else if c.is_ascii_uppercase() {
            digits.push_str(&(u32::from(c) - u32::from('A') + 1).to_string());
        } else {
            return None;
        }
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, FixedOffset};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::entities::{Author, PageRange, Paper, Person};

    fn time(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn session(category: &str, order: u32, code: &str) -> Session {
        Session {
            category: category.into(),
            category_order: order,
            code: code.into(),
            title: format!("Session {code}"),
            room: "Room 1".into(),
            start_time: time("2024-11-20T09:00:00+09:00"),
            end_time: time("2024-11-20T10:20:00+09:00"),
            chairs: vec![],
            ss_organizers: None,
            papers: vec![],
        }
    }

    fn paper(id: u32, order: u32) -> Paper {
        let author = Author::new(Person::new("Doe", "Jane", "Univ.").unwrap(), 1, true);
        Paper::new(id, format!("Paper {id}"), order, vec![author]).unwrap()
    }

    #[test]
    fn default_order_is_session_key() {
        let list = SessionList::new(vec![
            session("R2", 1, "B1"),
            session("A1", 2, "A2"),
            session("A1", 1, "A1"),
        ])
        .unwrap();
        let codes: Vec<_> = list.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["A1", "A2", "B1"]);
    }

    #[test]
    fn explicit_order_is_kept() {
        let list = SessionList::with_order(
            vec![session("A1", 1, "A1"), session("B1", 1, "B1")],
            |a: &Session, b: &Session| b.code.cmp(&a.code),
        )
        .unwrap();
        let codes: Vec<_> = list.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["B1", "A1"]);
    }

    #[test]
    fn code_order_ranks_letters_numerically() {
        assert_eq!(session_code_rank("B12"), Some(212));
        assert_eq!(session_code_rank("L-A3"), Some(13));
        assert_eq!(session_code_rank("a1"), None);

        let list = SessionList::with_order(
            vec![session("X", 1, "B1"), session("X", 2, "A2"), session("X", 3, "A1")],
            SessionOrder::Code,
        )
        .unwrap();
        let codes: Vec<_> = list.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["A1", "A2", "B1"]);
    }

    #[test]
    fn duplicate_session_key_is_rejected() {
        let err = SessionList::new(vec![session("A1", 1, "A1"), session("A1", 1, "A1b")])
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateKey { ref key } if key == "A1-1"));
    }

    #[test]
    fn duplicate_paper_id_is_rejected() {
        let mut s = session("A1", 1, "A1");
        s.papers = vec![paper(7, 1), paper(7, 2)];
        let err = SessionList::new(vec![s]).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateKey { ref key } if key == "A1-1/7"));
    }

    #[test]
    fn duplicate_presentation_order_is_rejected() {
        let mut s = session("A1", 1, "A1");
        s.papers = vec![paper(7, 1), paper(9, 1)];
        let err = SessionList::new(vec![s]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error in session A1-1: papers 7 and 9 share presentation order 1"
        );
    }

    #[test]
    fn overlapping_sibling_pages_are_rejected() {
        let mut s = session("A1", 1, "A1");
        let mut first = paper(1, 1);
        first.pages = Some(PageRange::new(1, 4).unwrap());
        let mut second = paper(2, 2);
        second.pages = Some(PageRange::new(4, 5).unwrap());
        s.papers = vec![first, second];
        assert!(matches!(
            SessionList::new(vec![s]).unwrap_err(),
            ModelError::Validation { .. }
        ));
    }

    #[test]
    fn paper_errors_name_the_session() {
        let mut s = session("S3", 4, "S3");
        let mut p = paper(12, 1);
        p.authors[0].contact = false;
        s.papers = vec![p];
        let err = SessionList::new(vec![s]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Paper S3-4/12 has 0 contact authors, expected exactly one"
        );
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut s = session("A1", 1, "A1");
        s.end_time = time("2024-11-20T08:00:00+09:00");
        assert!(SessionList::new(vec![s]).is_err());
    }
}
