//! Read-only views over a [`SessionList`] for downstream renderers.
//!
//! Nothing here mutates the list. Lookups return [`LookupError`] on a miss
//! so a batch render can substitute a placeholder and carry on.

mod metadata;
mod revision;

pub use metadata::{
    CommonInfo, Cooperators, MetaCommonRow, MetaPaperRow, MetaSessionRow, metadata_common_row,
    metadata_paper_rows, metadata_session_rows,
};
pub use revision::{
    RevisionRequest, RevisionStatus, ViolationReport, revision_requests, revision_status,
};

use crate::entities::{Author, Paper, Person, Session, SessionList};
use crate::errors::LookupError;
use crate::keys::{PaperKey, SessionKey};

/// One author of one paper, with the records that own it.
#[derive(Debug, Clone, Copy)]
pub struct AuthorEntry<'a> {
    pub session: &'a Session,
    pub paper: &'a Paper,
    pub author: &'a Author,
}

impl SessionList {
    /// # Errors
    ///
    /// Returns `LookupError::Session` if no session has `key`.
    pub fn session(&self, key: &SessionKey) -> Result<&Session, LookupError> {
        self.iter()
            .find(|s| s.has_key(key))
            .ok_or_else(|| LookupError::Session(key.clone()))
    }

    /// # Errors
    ///
    /// Returns `LookupError::Session` or `LookupError::Paper` for a miss.
    pub fn paper(&self, key: &PaperKey) -> Result<&Paper, LookupError> {
        self.session(&key.session)?
            .papers
            .iter()
            .find(|p| p.id == key.paper_id)
            .ok_or_else(|| LookupError::Paper(key.clone()))
    }

    /// Find a paper by its submission id alone.
    ///
    /// # Errors
    ///
    /// - `LookupError::PaperId` if no paper has `id`.
    /// - `LookupError::AmbiguousPaperId` if papers in several sessions share it.
    pub fn paper_by_id(&self, id: u32) -> Result<(&Session, &Paper), LookupError> {
        let mut found = self.papers().filter(|(_, p)| p.id == id);
        let first = found.next().ok_or(LookupError::PaperId(id))?;
        match found.count() {
            0 => Ok(first),
            extra => Err(LookupError::AmbiguousPaperId {
                id,
                count: extra + 1,
            }),
        }
    }

    /// Find a paper by its printed number, e.g. `A1-32` for order 2 of `A1-3`.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::PaperNumber` if no paper prints as `number`.
    pub fn paper_by_number(&self, number: &str) -> Result<(&Session, &Paper), LookupError> {
        self.papers()
            .find(|(s, p)| p.number(&s.code) == number)
            .ok_or_else(|| LookupError::PaperNumber(number.to_string()))
    }

    /// Every paper with its session, in iteration order.
    pub fn papers(&self) -> impl Iterator<Item = (&Session, &Paper)> {
        self.iter()
            .flat_map(|s| s.papers.iter().map(move |p| (s, p)))
    }

    /// Every `(session, paper, author)` triple, in iteration and author order.
    pub fn author_entries(&self) -> impl Iterator<Item = AuthorEntry<'_>> {
        self.papers().flat_map(|(session, paper)| {
            paper.authors.iter().map(move |author| AuthorEntry {
                session,
                paper,
                author,
            })
        })
    }

    /// Every authorship of `person`, for author indexes.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::Person` if the person authored nothing.
    pub fn authorships(&self, person: &Person) -> Result<Vec<AuthorEntry<'_>>, LookupError> {
        let entries: Vec<_> = self
            .author_entries()
            .filter(|e| e.author.person.same_person(person))
            .collect();
        if entries.is_empty() {
            return Err(LookupError::Person(person.display_name()));
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    use super::*;

    fn person(family: &str) -> Person {
        Person::new(family, "A.", "Univ.").unwrap()
    }

    fn session(category: &str, code: &str, papers: Vec<Paper>) -> Session {
        Session {
            category: category.into(),
            category_order: 1,
            code: code.into(),
            title: "T".into(),
            room: "101".into(),
            start_time: DateTime::parse_from_rfc3339("2024-11-20T09:00:00+09:00").unwrap(),
            end_time: DateTime::parse_from_rfc3339("2024-11-20T10:00:00+09:00").unwrap(),
            chairs: Vec::new(),
            ss_organizers: None,
            papers,
        }
    }

    fn list() -> SessionList {
        let p = |id, order, authors: &[&str]| {
            let authors = authors
                .iter()
                .zip(1..)
                .map(|(name, i)| Author::new(person(name), i, i == 1))
                .collect();
            Paper::new(id, format!("Paper {id}"), order, authors).unwrap()
        };
        SessionList::new(vec![
            session("A1", "A1-1", vec![p(12, 1, &["Doe", "Roe"]), p(15, 2, &["Poe"])]),
            session("B2", "B2-1", vec![p(20, 1, &["Roe"])]),
        ])
        .unwrap()
    }

    #[test]
    fn papers_iterate_in_list_order() {
        let ids: Vec<_> = list().papers().map(|(_, p)| p.id).collect();
        assert_eq!(ids, vec![12, 15, 20]);
    }

    #[test]
    fn lookups_report_typed_misses() {
        let list = list();
        let key = PaperKey::new(SessionKey::new("A1", 1), 15);
        assert_eq!(list.paper(&key).unwrap().title, "Paper 15");

        let missing = PaperKey::new(SessionKey::new("A1", 1), 99);
        assert_eq!(list.paper(&missing), Err(LookupError::Paper(missing.clone())));
        assert_eq!(
            list.session(&SessionKey::new("Z9", 1)).unwrap_err(),
            LookupError::Session(SessionKey::new("Z9", 1))
        );
        assert_eq!(list.paper_by_id(7).unwrap_err(), LookupError::PaperId(7));
    }

    #[test]
    fn paper_numbers_join_code_and_order() {
        let list = list();
        let (session, paper) = list.paper_by_number("A1-12").unwrap();
        assert_eq!((session.code.as_str(), paper.id), ("A1-1", 15));
        assert!(list.paper_by_number("A1-13").is_err());
    }

    #[test]
    fn authorships_collect_across_sessions() {
        let list = list();
        let ids: Vec<_> = list
            .authorships(&person("Roe"))
            .unwrap()
            .iter()
            .map(|e| (e.paper.id, e.author.order))
            .collect();
        assert_eq!(ids, vec![(12, 2), (20, 1)]);
        assert!(matches!(list.authorships(&person("Nobody")), Err(LookupError::Person(_))));
    }
}
