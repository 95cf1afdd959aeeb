use std::collections::HashMap;

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime};

use crate::entities::{Author, Paper, Person, Session, SessionList, SessionOrder};
use crate::errors::ModelError;
use crate::ingest::columns::{ColumnMap, ResolvedColumns};
use crate::ingest::sheet::Sheet;
use crate::keys::{PaperKey, SessionKey};
use crate::orcid::Orcid;

/// Timestamp format of the conference-system export (GMT wall clock).
const SHEET_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Minutes per regular presentation slot.
pub const DEFAULT_PRESENTATION_MINUTES: u32 = 20;

/// Minutes per plenary talk slot.
pub const DEFAULT_PLENARY_MINUTES: u32 = 60;

/// Convert a sheet into a fresh [`SessionList`] with default settings.
///
/// Equivalent to `SheetLoader::new(column_map).tz_offset_h(tz_offset_h).load(rows)`.
///
/// # Errors
///
/// See [`SheetLoader::load`].
pub fn load_sheet(
    rows: &Sheet,
    tz_offset_h: i32,
    column_map: &ColumnMap,
) -> Result<SessionList, ModelError> {
    SheetLoader::new(column_map)
        .tz_offset_h(tz_offset_h)
        .load(rows)
}

/// Configurable sheet ingestion.
#[derive(Debug, Clone)]
pub struct SheetLoader<'a> {
    columns: &'a ColumnMap,
    tz_offset_h: i32,
    presentation_minutes: u32,
    plenary_minutes: u32,
    accept_value: String,
    order: SessionOrder,
}

impl<'a> SheetLoader<'a> {
    #[must_use]
    pub fn new(columns: &'a ColumnMap) -> Self {
        Self {
            columns,
            tz_offset_h: 0,
            presentation_minutes: DEFAULT_PRESENTATION_MINUTES,
            plenary_minutes: DEFAULT_PLENARY_MINUTES,
            accept_value: "Accept".into(),
            order: SessionOrder::default(),
        }
    }

    /// Hours east of GMT for every session and paper timestamp.
    #[must_use]
    pub const fn tz_offset_h(mut self, hours: i32) -> Self {
        self.tz_offset_h = hours;
        self
    }

    #[must_use]
    pub const fn presentation_minutes(mut self, minutes: u32) -> Self {
        self.presentation_minutes = minutes;
        self
    }

    #[must_use]
    pub const fn plenary_minutes(mut self, minutes: u32) -> Self {
        self.plenary_minutes = minutes;
        self
    }

    /// Decision cell value of rows to keep, when a decision column is mapped.
    #[must_use]
    pub fn accept_value(mut self, value: impl Into<String>) -> Self {
        self.accept_value = value.into();
        self
    }

    #[must_use]
    pub const fn order(mut self, order: SessionOrder) -> Self {
        self.order = order;
        self
    }

    /// Group rows into sessions and papers.
    ///
    /// Timestamps are read as GMT and converted to GMT + `tz_offset_h`.
    /// Authors follow column-group order. Papers are sorted by presentation
    /// order and scheduled back to back from the session start. Pages are
    /// never assigned here.
    ///
    /// # Errors
    ///
    /// - `ModelError::Schema` if a mapped column is missing from the header.
    /// - `ModelError::Validation` for an empty required cell, an unparsable
    ///   number, timestamp or ORCID, or an out-of-range offset (errors name
    ///   the sheet row).
    /// - `ModelError::DuplicateKey` if two rows share `(session key, paper id)`.
    /// - `ModelError::AmbiguousContact` unless each paper has one contact author.
    pub fn load(&self, sheet: &Sheet) -> Result<SessionList, ModelError> {
        let offset = FixedOffset::east_opt(self.tz_offset_h.saturating_mul(3600)).ok_or_else(
            || {
                ModelError::validation(
                    "tz_offset_h",
                    format!("{} hours is not a valid UTC offset", self.tz_offset_h),
                )
            },
        )?;
        let cols = self.columns.resolve(sheet.header())?;

        let mut sessions: Vec<Session> = Vec::new();
        let mut slots: HashMap<SessionKey, usize> = HashMap::new();
        let mut skipped = 0usize;

        for (i, cells) in sheet.rows().iter().enumerate() {
            let row = Row {
                header: sheet.header(),
                cells,
                line: i + 2,
            };

            if let Some(decision) = cols.decision {
                if row.cell(decision) != self.accept_value {
                    tracing::debug!(line = row.line, decision = row.cell(decision), "row not accepted");
                    skipped += 1;
                    continue;
                }
            }

            let key = SessionKey::new(
                row.required(cols.category)?,
                row.number(cols.category_order)?,
            );
            let slot = if let Some(&slot) = slots.get(&key) {
                slot
            } else {
                sessions.push(read_session(&row, &cols, &key, offset)?);
                slots.insert(key.clone(), sessions.len() - 1);
                sessions.len() - 1
            };

            let paper = read_paper(&row, &cols, &key)?;
            let session = &mut sessions[slot];
            if session.papers.iter().any(|p| p.id == paper.id) {
                return Err(ModelError::DuplicateKey {
                    key: PaperKey::new(key, paper.id).to_string(),
                });
            }
            session.papers.push(paper);
        }

        for session in &mut sessions {
            self.schedule(session);
        }
        if skipped > 0 {
            tracing::info!(skipped, accept = %self.accept_value, "skipped rows without accept decision");
        }

        let list = SessionList::with_order(sessions, self.order)?;
        tracing::info!(
            sessions = list.len(),
            papers = list.iter().map(|s| s.papers.len()).sum::<usize>(),
            "sheet loaded"
        );
        Ok(list)
    }

    /// Sort papers by presentation order and derive their start times.
    fn schedule(&self, session: &mut Session) {
        session.papers.sort_by_key(|p| p.order);
        let start = session.start_time;
        for paper in &mut session.papers {
            let slot = if paper.plenary {
                self.plenary_minutes
            } else {
                self.presentation_minutes
            };
            let offset = i64::from(slot) * i64::from(paper.order.saturating_sub(1));
            paper.start_time = Some(start + Duration::minutes(offset));
        }
    }
}

fn read_session(
    row: &Row<'_>,
    cols: &ResolvedColumns,
    key: &SessionKey,
    offset: FixedOffset,
) -> Result<Session, ModelError> {
    let chairs = cols
        .chairs
        .iter()
        .filter(|slot| !row.cell(slot.family_name).is_empty())
        .map(|slot| {
            let chair = Person {
                family_name: row.cell(slot.family_name).to_string(),
                given_name: row.cell(slot.given_name).to_string(),
                affiliation: row.cell(slot.affiliation).to_string(),
                orcid: None,
                country: None,
                email: None,
            };
            chair.validate().map_err(|e| row.anchor(e))?;
            Ok(chair)
        })
        .collect::<Result<Vec<_>, ModelError>>()?;

    let session = Session {
        category: key.category.clone(),
        category_order: key.category_order,
        code: row.required(cols.session_code)?.to_string(),
        title: row.required(cols.session_title)?.to_string(),
        room: row.required(cols.room)?.to_string(),
        start_time: row.time(cols.start_time, offset)?,
        end_time: row.time(cols.end_time, offset)?,
        chairs,
        ss_organizers: None,
        papers: Vec::new(),
    };
    tracing::debug!(session = %key, code = %session.code, line = row.line, "new session");
    Ok(session)
}

fn read_paper(row: &Row<'_>, cols: &ResolvedColumns, key: &SessionKey) -> Result<Paper, ModelError> {
    let mut authors = Vec::new();
    for slot in &cols.authors {
        if row.cell(slot.family_name).is_empty() {
            continue;
        }
        let orcid = row
            .optional(slot.orcid)
            .map(Orcid::parse)
            .transpose()
            .map_err(|e| row.anchor(e))?;
        let person = Person {
            family_name: row.cell(slot.family_name).to_string(),
            given_name: row.cell(slot.given_name).to_string(),
            affiliation: row.cell(slot.affiliation).to_string(),
            orcid,
            country: row.optional(slot.country).map(String::from),
            email: row.optional(slot.email).map(String::from),
        };
        let order = u32::try_from(authors.len() + 1).unwrap_or(u32::MAX);
        authors.push(Author::new(person, order, is_truthy(row.cell(slot.contact))));
    }

    let keywords = row
        .optional(cols.keywords)
        .map(split_keywords)
        .unwrap_or_default();

    let paper = Paper {
        id: row.number(cols.paper_id)?,
        title: row.required(cols.paper_title)?.to_string(),
        order: row.number(cols.paper_order)?,
        authors,
        award: row.optional(cols.award).map(String::from),
        pages: None,
        abstract_text: row.optional(cols.abstract_text).unwrap_or_default().to_string(),
        keywords,
        plenary: cols.plenary.is_some_and(|c| is_truthy(row.cell(c))),
        start_time: None,
    };
    paper.validate().map_err(|e| row.anchor(e.within_session(key)))?;
    Ok(paper)
}

/// Split a keyword cell on ASCII or full-width commas.
fn split_keywords(cell: &str) -> Vec<String> {
    cell.split([',', '\u{ff0c}'])
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}

fn is_truthy(cell: &str) -> bool {
    matches!(
        cell.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "x"
    )
}

/// One data row plus what is needed to report errors against it.
struct Row<'s> {
    header: &'s [String],
    cells: &'s [String],
    /// Spreadsheet row number; the header is row 1.
    line: usize,
}

impl Row<'_> {
    fn cell(&self, index: usize) -> &str {
        self.cells[index].trim()
    }

    fn optional(&self, index: Option<usize>) -> Option<&str> {
        index.map(|i| self.cell(i)).filter(|v| !v.is_empty())
    }

    fn required(&self, index: usize) -> Result<&str, ModelError> {
        let value = self.cell(index);
        if value.is_empty() {
            return Err(self.error(index, "is empty".into()));
        }
        Ok(value)
    }

    /// Whole numbers, tolerating the `12.0` spreadsheets produce for numeric cells.
    fn number(&self, index: usize) -> Result<u32, ModelError> {
        let value = self.required(index)?;
        value
            .parse::<u32>()
            .ok()
            .or_else(|| {
                value
                    .strip_suffix(".0")
                    .and_then(|whole| whole.parse::<u32>().ok())
            })
            .ok_or_else(|| self.error(index, format!("'{value}' is not a whole number")))
    }

    fn time(&self, index: usize, offset: FixedOffset) -> Result<DateTime<FixedOffset>, ModelError> {
        let value = self.required(index)?;
        let naive = NaiveDateTime::parse_from_str(value, SHEET_TIME_FORMAT).map_err(|e| {
            self.error(index, format!("'{value}' is not a {SHEET_TIME_FORMAT} timestamp ({e})"))
        })?;
        Ok(naive.and_utc().with_timezone(&offset))
    }

    fn error(&self, index: usize, reason: String) -> ModelError {
        ModelError::validation(
            format!("sheet row {}", self.line),
            format!("column '{}' {reason}", self.header[index]),
        )
    }

    /// Prefix the row number onto an entity-level validation error.
    fn anchor(&self, error: ModelError) -> ModelError {
        match error {
            ModelError::Validation { context, reason } => ModelError::validation(
                format!("sheet row {}, {context}", self.line),
                reason,
            ),
            other => other,
        }
    }
}
