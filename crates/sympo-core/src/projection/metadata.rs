//! Flat rows for the proceedings metadata CSV.
//!
//! Person lists are joined with `@@`, plain lists with `;`, names are written
//! family name first and abstract line breaks become `<br>`.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Person, SessionList};
use crate::errors::ModelError;
use crate::side_files::AWARD_SEPARATOR;

const PERSON_SEPARATOR: &str = "@@";
const LIST_SEPARATOR: &str = ";";
/// Separates the four cooperator groups.
const GROUP_SEPARATOR: &str = "/";
const DATE_FORMAT: &str = "%Y-%m-%d";
/// Keyword placeholder used by submitters who have none.
const NO_KEYWORD: &str = "-";

/// One session line of the metadata CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaSessionRow {
    pub comment: String,
    pub number: String,
    pub name: String,
    /// `YYYY-MM-DD` in the session's own offset.
    pub date: String,
    pub organizers: String,
    pub org_affils: String,
    pub chairs: String,
    pub chair_affils: String,
    pub cities: String,
    pub venues: String,
}

/// One paper line of the metadata CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaPaperRow {
    pub comment: String,
    pub title: String,
    /// `{number}.pdf`, empty until pages are assigned.
    pub filename: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub keywords: String,
    pub page_from: Option<u32>,
    pub page_to: Option<u32>,
    pub session: String,
    pub volume: String,
    pub number: String,
    pub awards: String,
    pub authors: String,
    pub affils: String,
}

/// Cooperating bodies by role: hosts, co-hosts, sponsors, supporters.
///
/// Serialized as an array of four name arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Cooperators(
    pub Vec<String>,
    pub Vec<String>,
    pub Vec<String>,
    pub Vec<String>,
);

/// Event-wide description for the metadata CSV (the "common" document).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CommonInfo {
    pub conf_abbr: String,
    pub year: u16,
    pub event_name: String,
    /// First and last day of the event.
    pub event_date: (NaiveDate, NaiveDate),
    #[serde(default)]
    pub event_city: Vec<String>,
    #[serde(default)]
    pub event_venue: Vec<String>,
    #[serde(default)]
    pub event_web_url: String,
    #[serde(default)]
    pub cooperators: Cooperators,
    pub publication: String,
    pub date_published: NaiveDate,
    pub publisher: String,
}

impl CommonInfo {
    /// # Errors
    ///
    /// Returns `ModelError::Validation` for a blank abbreviation, event name,
    /// publication or publisher, or an event that ends before it starts.
    pub fn validate(&self) -> Result<(), ModelError> {
        let context = || format!("common info '{}'", self.event_name);
        for (field, value) in [
            ("conf_abbr", &self.conf_abbr),
            ("event_name", &self.event_name),
            ("publication", &self.publication),
            ("publisher", &self.publisher),
        ] {
            if value.trim().is_empty() {
                return Err(ModelError::validation(context(), format!("{field} is empty")));
            }
        }
        let (from, to) = self.event_date;
        if to < from {
            return Err(ModelError::validation(
                context(),
                format!("event ends on {to} before it starts on {from}"),
            ));
        }
        Ok(())
    }
}

/// The single event line of the metadata CSV.
///
/// Columns the proceedings do not fill (`conf_name`, `body_url`,
/// `copyright_holder`) are written empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaCommonRow {
    pub comment: String,
    pub conf_name: String,
    pub conf_abbr: String,
    pub year: String,
    pub body_url: String,
    pub event_name: String,
    pub event_date_from: String,
    pub event_date_to: String,
    pub event_city: String,
    pub event_venue: String,
    pub event_web_url: String,
    pub cooperators: String,
    pub publication: String,
    pub date_published: String,
    pub copyright_holder: String,
    pub publisher: String,
}

/// Flatten the event description into its metadata row.
#[must_use]
pub fn metadata_common_row(common: &CommonInfo) -> MetaCommonRow {
    let Cooperators(hosts, co_hosts, sponsors, supporters) = &common.cooperators;
    let cooperators = [hosts, co_hosts, sponsors, supporters]
        .map(|group| group.join(LIST_SEPARATOR))
        .join(GROUP_SEPARATOR);
    let (from, to) = common.event_date;
    MetaCommonRow {
        comment: String::new(),
        conf_name: String::new(),
        conf_abbr: common.conf_abbr.clone(),
        year: common.year.to_string(),
        body_url: String::new(),
        event_name: common.event_name.clone(),
        event_date_from: from.format(DATE_FORMAT).to_string(),
        event_date_to: to.format(DATE_FORMAT).to_string(),
        event_city: common.event_city.join(LIST_SEPARATOR),
        event_venue: common.event_venue.join(LIST_SEPARATOR),
        event_web_url: common.event_web_url.clone(),
        cooperators,
        publication: common.publication.clone(),
        date_published: common.date_published.format(DATE_FORMAT).to_string(),
        copyright_holder: String::new(),
        publisher: common.publisher.clone(),
    }
}

fn names<'a>(people: impl IntoIterator<Item = &'a Person>) -> String {
    people
        .into_iter()
        .map(Person::family_first_name)
        .collect::<Vec<_>>()
        .join(PERSON_SEPARATOR)
}

fn affiliations<'a>(people: impl IntoIterator<Item = &'a Person>) -> String {
    people
        .into_iter()
        .map(|p| p.affiliation.as_str())
        .collect::<Vec<_>>()
        .join(PERSON_SEPARATOR)
}

/// Session rows in iteration order. `cities` and `venues` come from the
/// event description and are repeated on every row.
#[must_use]
pub fn metadata_session_rows(
    list: &SessionList,
    cities: &[String],
    venues: &[String],
) -> Vec<MetaSessionRow> {
    list.iter()
        .map(|session| {
            let organizers = session.ss_organizers.as_deref().unwrap_or_default();
            MetaSessionRow {
                comment: String::new(),
                number: session.code.clone(),
                name: session.title.clone(),
                date: session.start_time.format(DATE_FORMAT).to_string(),
                organizers: names(organizers),
                org_affils: affiliations(organizers),
                chairs: names(&session.chairs),
                chair_affils: affiliations(&session.chairs),
                cities: cities.join(LIST_SEPARATOR),
                venues: venues.join(LIST_SEPARATOR),
            }
        })
        .collect()
}

/// Paper rows in iteration order.
#[must_use]
pub fn metadata_paper_rows(list: &SessionList) -> Vec<MetaPaperRow> {
    list.papers()
        .map(|(session, paper)| {
            let number = paper.number(&session.code);
            let people = || paper.authors.iter().map(|a| &a.person);
            MetaPaperRow {
                comment: String::new(),
                title: paper.title.clone(),
                filename: paper
                    .pages
                    .map(|_| format!("{number}.pdf"))
                    .unwrap_or_default(),
                abstract_text: paper.abstract_text.replace("\r\n", "\n").replace('\n', "<br>"),
                keywords: paper
                    .keywords
                    .iter()
                    .map(String::as_str)
                    .filter(|k| *k != NO_KEYWORD)
                    .collect::<Vec<_>>()
                    .join(LIST_SEPARATOR),
                page_from: paper.pages.map(|p| p.first()),
                page_to: paper.pages.map(|p| p.last()),
                session: session.code.clone(),
                volume: String::new(),
                awards: paper
                    .award
                    .as_deref()
                    .map(|a| a.split(AWARD_SEPARATOR).collect::<Vec<_>>().join(LIST_SEPARATOR))
                    .unwrap_or_default(),
                authors: names(people()),
                affils: affiliations(people()),
                number,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::entities::{Author, PageRange, Paper, Session};

    fn list(pages: Option<PageRange>) -> SessionList {
        let authors = vec![
            Author::new(Person::new("Doe", "Jane", "Univ. A").unwrap(), 1, true),
            Author::new(Person::new("Roe", "Rick", "Univ. B").unwrap(), 2, false),
        ];
        let mut paper = Paper::new(12, "Chaos", 3, authors).unwrap();
        paper.pages = pages;
        paper.abstract_text = "Line one\nLine two".into();
        paper.keywords = vec!["chaos".into(), "-".into(), "maps".into()];
        paper.award = Some("Best Paper, Student Award".into());
        let session = Session {
            category: "S3".into(),
            category_order: 1,
            code: "S3-1".into(),
            title: "Reservoirs".into(),
            room: "101".into(),
            start_time: DateTime::parse_from_rfc3339("2024-11-20T23:30:00+09:00").unwrap(),
            end_time: DateTime::parse_from_rfc3339("2024-11-21T00:30:00+09:00").unwrap(),
            chairs: vec![Person::new("Chair", "Carl", "Univ. C").unwrap()],
            ss_organizers: Some(vec![
                Person::new("Org", "Olga", "Univ. D").unwrap(),
                Person::new("Ger", "Gus", "Univ. E").unwrap(),
            ]),
            papers: vec![paper],
        };
        SessionList::new(vec![session]).unwrap()
    }

    #[test]
    fn session_rows_join_people() {
        let rows = metadata_session_rows(&list(None), &["Kyoto".into()], &["Hall A".into(), "Hall B".into()]);
        let row = &rows[0];
        assert_eq!(row.number, "S3-1");
        assert_eq!(row.date, "2024-11-20");
        assert_eq!(row.organizers, "Org Olga@@Ger Gus");
        assert_eq!(row.org_affils, "Univ. D@@Univ. E");
        assert_eq!(row.chairs, "Chair Carl");
        assert_eq!(row.venues, "Hall A;Hall B");
    }

    #[test]
    fn paper_rows_format_lists_and_abstract() {
        let row = &metadata_paper_rows(&list(None))[0];
        assert_eq!(row.number, "S3-13");
        assert_eq!(row.authors, "Doe Jane@@Roe Rick");
        assert_eq!(row.keywords, "chaos;maps");
        assert_eq!(row.awards, "Best Paper;Student Award");
        assert_eq!(row.abstract_text, "Line one<br>Line two");
    }

    #[test]
    fn file_name_only_when_paginated() {
        let unpaged = &metadata_paper_rows(&list(None))[0];
        assert_eq!(unpaged.filename, "");
        assert_eq!(unpaged.page_from, None);

        let paged = &metadata_paper_rows(&list(Some(PageRange::new(45, 48).unwrap())))[0];
        assert_eq!(paged.filename, "S3-13.pdf");
        assert_eq!((paged.page_from, paged.page_to), (Some(45), Some(48)));
    }

    fn common() -> CommonInfo {
        serde_json::from_str(
            r#"{
                "conf_abbr": "NOLTA",
                "year": 2024,
                "event_name": "NOLTA 2024",
                "event_date": ["2024-11-20", "2024-11-22"],
                "event_city": ["Tokyo"],
                "event_venue": ["Forum A", "Forum B"],
                "event_web_url": "https://example.org/nolta2024",
                "cooperators": [["IEICE"], ["IEEE", "RISP"], [], []],
                "publication": "Proceedings of NOLTA 2024",
                "date_published": "2024-11-20",
                "publisher": "IEICE"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn common_row_flattens_event() {
        let row = metadata_common_row(&common());
        assert_eq!(row.conf_abbr, "NOLTA");
        assert_eq!(row.year, "2024");
        assert_eq!((row.event_date_from.as_str(), row.event_date_to.as_str()), ("2024-11-20", "2024-11-22"));
        assert_eq!(row.event_venue, "Forum A;Forum B");
        assert_eq!(row.cooperators, "IEICE/IEEE;RISP//");
        assert_eq!(row.conf_name, "");
        assert_eq!(row.copyright_holder, "");
    }

    #[test]
    fn common_info_rejects_reversed_dates() {
        let mut info = common();
        assert!(info.validate().is_ok());
        info.event_date = (info.event_date.1, info.event_date.0);
        assert!(matches!(info.validate(), Err(ModelError::Validation { .. })));
    }
}
