//! Revision requests sent to contact authors whose manuscripts need fixes.

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Person, SessionList};
use crate::errors::LookupError;

/// Format check results for one submitted PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ViolationReport {
    /// Submitted file name, `{paper number}.pdf`.
    pub pdf_name: String,
    /// Human-readable descriptions of every violated rule.
    pub errors: Vec<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl ViolationReport {
    /// The paper number encoded in the file name.
    #[must_use]
    pub fn paper_number(&self) -> &str {
        pdf_stem(&self.pdf_name)
    }
}

/// The stem of a PDF file name, `A1-12` for `A1-12.pdf`.
fn pdf_stem(pdf_name: &str) -> &str {
    pdf_name.rsplit_once('.').map_or(pdf_name, |(stem, _)| stem)
}

/// Everything needed to write one revision e-mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RevisionRequest {
    pub pdf_name: String,
    pub paper_id: u32,
    pub title: String,
    pub contact: Person,
    pub errors: Vec<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl RevisionRequest {
    /// The name revised uploads are expected to carry, without extension.
    #[must_use]
    pub fn stem(&self) -> &str {
        pdf_stem(&self.pdf_name)
    }
}

/// Outstanding requests split by whether a revised PDF has come back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RevisionStatus {
    pub revised: Vec<RevisionRequest>,
    pub missing: Vec<RevisionRequest>,
}

impl RevisionStatus {
    #[must_use]
    pub fn total(&self) -> usize {
        self.revised.len() + self.missing.len()
    }

    /// Share of requests answered, in percent; zero when nothing was requested.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn revised_percent(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.revised.len() as f64 * 100.0 / total as f64,
        }
    }
}

/// Partition `requests` by the stems of the revised PDFs received so far.
///
/// Request order is kept within each half. A stem that matches no request is
/// returned as `LookupError::RevisedFile`, in sorted stem order.
#[must_use]
pub fn revision_status(
    requests: &[RevisionRequest],
    revised_stems: &BTreeSet<String>,
) -> (RevisionStatus, Vec<LookupError>) {
    let (revised, missing): (Vec<_>, Vec<_>) = requests
        .iter()
        .cloned()
        .partition(|r| revised_stems.contains(r.stem()));
    let requested: BTreeSet<&str> = requests.iter().map(RevisionRequest::stem).collect();
    let unknown = revised_stems
        .iter()
        .filter(|stem| !requested.contains(stem.as_str()))
        .map(|stem| LookupError::RevisedFile(stem.clone()))
        .collect();
    (RevisionStatus { revised, missing }, unknown)
}

/// Resolve each report against `list`, one result per report in input order.
///
/// A report whose paper cannot be found yields its `LookupError` in place, so
/// callers can list the misses and still send the rest.
#[must_use]
pub fn revision_requests(
    list: &SessionList,
    reports: &[ViolationReport],
) -> Vec<Result<RevisionRequest, LookupError>> {
    reports
        .iter()
        .map(|report| {
            let (_, paper) = list.paper_by_number(report.paper_number())?;
            let contact = paper
                .contact_author()
                .ok_or_else(|| LookupError::Person(format!("contact of paper {}", paper.id)))?;
            Ok(RevisionRequest {
                pdf_name: report.pdf_name.clone(),
                paper_id: paper.id,
                title: paper.title.clone(),
                contact: contact.person.clone(),
                errors: report.errors.clone(),
                comment: report.comment.clone(),
            })
        })
        .collect()
}
