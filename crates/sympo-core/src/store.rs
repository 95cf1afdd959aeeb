//! File boundary: reading and writing the documents of the pipeline.
//!
//! Every function opens, uses and drops its file handle before returning.
//! Writes go to a sibling temporary file that is renamed over the target,
//! so a failed write leaves neither a half-written data file nor the
//! temporary file behind.

use std::collections::{BTreeSet, HashMap};
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::entities::{SessionList, SsOrganizerList};
use crate::errors::ModelError;
use crate::ingest::Sheet;
use crate::json;
use crate::pagination::PageCounts;
use crate::patch::SessionPatch;
use crate::projection::{CommonInfo, RevisionRequest, ViolationReport};
use crate::side_files::AwardEntry;

/// Column of the format-check sheet holding the submitted file name.
pub const PDF_NAME_COLUMN: &str = "PDF_NAME";
/// Column of the format-check sheet holding a free-form note to the authors.
pub const COMMENT_COLUMN: &str = "EXTRA_COMMENTS";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bad CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The file was read but its content is not a valid document.
    #[error("{}: {source}", path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
}

impl StoreError {
    fn document(path: &Path) -> impl FnOnce(ModelError) -> Self + '_ {
        move |source| Self::Document {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The model error behind a document failure, if any.
    #[must_use]
    pub const fn model_error(&self) -> Option<&ModelError> {
        match self {
            Self::Document { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn read_text(path: &Path) -> Result<String, StoreError> {
    fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // Dropped (and deleted) on every early return.
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "file written");
    Ok(())
}

/// Read a CSV export of the conference system.
///
/// # Errors
///
/// `StoreError::Read` if the file cannot be opened, `StoreError::Document`
/// for malformed or ragged CSV.
pub fn read_sheet(path: &Path) -> Result<Sheet, StoreError> {
    let file = File::open(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Sheet::from_csv_reader(BufReader::new(file)).map_err(StoreError::document(path))
}

/// # Errors
///
/// `StoreError::Read` or `StoreError::Document`.
pub fn read_session_list(path: &Path) -> Result<SessionList, StoreError> {
    json::from_json(&read_text(path)?).map_err(StoreError::document(path))
}

/// # Errors
///
/// `StoreError::Write` or `StoreError::Document`.
pub fn write_session_list(path: &Path, list: &SessionList) -> Result<(), StoreError> {
    write_document(path, list)
}

/// Write any serializable document as four-space indented JSON.
///
/// # Errors
///
/// `StoreError::Write` or `StoreError::Document`.
pub fn write_document<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let mut text = json::to_json_document(value).map_err(StoreError::document(path))?;
    text.push('\n');
    write_bytes(path, text.as_bytes())
}

/// # Errors
///
/// `StoreError::Read` or `StoreError::Document`.
pub fn read_patches(path: &Path) -> Result<Vec<SessionPatch>, StoreError> {
    json::patches_from_json(&read_text(path)?).map_err(StoreError::document(path))
}

/// # Errors
///
/// `StoreError::Read` or `StoreError::Document`.
pub fn read_awards(path: &Path) -> Result<Vec<AwardEntry>, StoreError> {
    json::awards_from_json(&read_text(path)?).map_err(StoreError::document(path))
}

/// # Errors
///
/// `StoreError::Read` or `StoreError::Document`.
pub fn read_organizers(path: &Path) -> Result<SsOrganizerList, StoreError> {
    json::organizers_from_json(&read_text(path)?).map_err(StoreError::document(path))
}

/// # Errors
///
/// `StoreError::Read` or `StoreError::Document`.
pub fn read_page_counts(path: &Path) -> Result<PageCounts, StoreError> {
    serde_json::from_str(&read_text(path)?)
        .map_err(|e| ModelError::Schema(format!("invalid page counts: {e}")))
        .map_err(StoreError::document(path))
}

/// # Errors
///
/// `StoreError::Read` or `StoreError::Document`.
pub fn read_common(path: &Path) -> Result<CommonInfo, StoreError> {
    json::common_from_json(&read_text(path)?).map_err(StoreError::document(path))
}

/// # Errors
///
/// `StoreError::Read` or `StoreError::Document`.
pub fn read_revision_requests(path: &Path) -> Result<Vec<RevisionRequest>, StoreError> {
    json::revision_requests_from_json(&read_text(path)?).map_err(StoreError::document(path))
}

/// Stems of every `*.pdf` under `dir`, searched recursively.
///
/// # Errors
///
/// `StoreError::Read` if `dir` or any entry below it cannot be read.
pub fn revised_pdf_stems(dir: &Path) -> Result<BTreeSet<String>, StoreError> {
    let mut stems = BTreeSet::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| StoreError::Read {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e.into(),
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "pdf") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            stems.insert(stem.to_string());
        }
    }
    tracing::debug!(dir = %dir.display(), count = stems.len(), "revised PDFs found");
    Ok(stems)
}

/// Write rows as CSV with a header taken from the row type's field names.
///
/// # Errors
///
/// `StoreError::Csv` if a row cannot be encoded, `StoreError::Write` on I/O.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), StoreError> {
    let csv_err = |source| StoreError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row).map_err(csv_err)?;
    }
    let bytes = writer.into_inner().map_err(|e| StoreError::Write {
        path: path.to_path_buf(),
        source: e.into_error(),
    })?;
    write_bytes(path, &bytes)
}

/// Read the format-check sheet and its message table into violation reports.
///
/// `checks` has one row per submitted file: a [`PDF_NAME_COLUMN`], an
/// optional [`COMMENT_COLUMN`] and one column per rule, where `1` flags a
/// violation. `messages` maps rule columns to text through its `ERR_KEY` and
/// `ERR_MSG` columns. Columns without a message are ignored.
///
/// # Errors
///
/// `StoreError::Read`, `StoreError::Document` for malformed CSV or a
/// missing required column.
pub fn read_violations(checks: &Path, messages: &Path) -> Result<Vec<ViolationReport>, StoreError> {
    let table = read_sheet(messages)?;
    let column = |sheet: &Sheet, name: &str, path: &Path| {
        sheet
            .header()
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ModelError::Schema(format!("sheet has no column '{name}'")))
            .map_err(StoreError::document(path))
    };
    let key = column(&table, "ERR_KEY", messages)?;
    let msg = column(&table, "ERR_MSG", messages)?;
    let text: HashMap<&str, &str> = table
        .rows()
        .iter()
        .map(|r| (r[key].as_str(), r[msg].as_str()))
        .collect();

    let sheet = read_sheet(checks)?;
    let name = column(&sheet, PDF_NAME_COLUMN, checks)?;
    let comment = sheet.header().iter().position(|h| h == COMMENT_COLUMN);
    let rules: Vec<(usize, &str)> = sheet
        .header()
        .iter()
        .enumerate()
        .filter_map(|(i, h)| text.get(h.as_str()).map(|m| (i, *m)))
        .collect();

    let reports = sheet
        .rows()
        .iter()
        .map(|row| ViolationReport {
            pdf_name: row[name].clone(),
            errors: rules
                .iter()
                .filter(|(i, _)| matches!(row[*i].as_str(), "1" | "1.0"))
                .map(|(_, m)| (*m).to_string())
                .collect(),
            comment: comment.map(|i| row[i].clone()).filter(|c| !c.is_empty()),
        })
        .collect();
    Ok(reports)
}
