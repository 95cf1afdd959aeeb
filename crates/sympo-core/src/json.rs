//! JSON (de)serialization of the record model and its side documents.
//!
//! Writers indent with four spaces and keep non-ASCII text as is. Readers
//! report shape problems as `ModelError::Schema` (with serde's line/column)
//! and then run the same validation as the constructors, so a bad ORCID or
//! page range is a `ModelError::Validation` naming its session and paper.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::PrettyFormatter;

use crate::entities::{Session, SessionList, SsOrganizer, SsOrganizerList};
use crate::errors::ModelError;
use crate::patch::SessionPatch;
use crate::projection::{CommonInfo, RevisionRequest};
use crate::side_files::AwardEntry;

const INDENT: &[u8] = b"    ";

/// Serialize a session list in iteration order.
///
/// Unassigned pages are written as `null`.
///
/// # Errors
///
/// Returns `ModelError::Schema` if serialization fails.
pub fn to_json(list: &SessionList) -> Result<String, ModelError> {
    to_json_document(list)
}

/// Parse and validate a session list, keeping document order.
///
/// A missing `pages` key and `"pages": null` both read back as absent.
///
/// # Errors
///
/// - `ModelError::Schema` for malformed JSON, missing required keys or
///   values of the wrong type.
/// - Any validation error raised by [`SessionList::from_ordered`].
pub fn from_json(text: &str) -> Result<SessionList, ModelError> {
    let sessions: Vec<Session> = from_json_document(text, "session list")?;
    SessionList::from_ordered(sessions)
}

/// Parse a patch document: an array of session patches.
///
/// # Errors
///
/// - `ModelError::Schema` for malformed JSON or a patch entry without its
///   key fields.
/// - `ModelError::Validation` from [`SessionPatch::validate`].
pub fn patches_from_json(text: &str) -> Result<Vec<SessionPatch>, ModelError> {
    let patches: Vec<SessionPatch> = from_json_document(text, "patch document")?;
    for patch in &patches {
        patch.validate()?;
    }
    Ok(patches)
}

/// Parse an awards side-file.
///
/// # Errors
///
/// Returns `ModelError::Schema` for malformed JSON.
pub fn awards_from_json(text: &str) -> Result<Vec<AwardEntry>, ModelError> {
    from_json_document(text, "awards file")
}

/// Parse and validate an organizers side-file.
///
/// # Errors
///
/// - `ModelError::Schema` for malformed JSON.
/// - Any validation error raised by [`SsOrganizerList::new`].
pub fn organizers_from_json(text: &str) -> Result<SsOrganizerList, ModelError> {
    let entries: Vec<SsOrganizer> = from_json_document(text, "organizers file")?;
    SsOrganizerList::new(entries)
}

/// Parse and validate the event description used for metadata export.
///
/// # Errors
///
/// - `ModelError::Schema` for malformed JSON or missing fields.
/// - Any validation error raised by [`CommonInfo::validate`].
pub fn common_from_json(text: &str) -> Result<CommonInfo, ModelError> {
    let common: CommonInfo = from_json_document(text, "common info")?;
    common.validate()?;
    Ok(common)
}

/// Parse a revision request document written by `revise request`.
///
/// # Errors
///
/// - `ModelError::Schema` for malformed JSON.
/// - `ModelError::Validation` naming the request whose contact is invalid.
pub fn revision_requests_from_json(text: &str) -> Result<Vec<RevisionRequest>, ModelError> {
    let requests: Vec<RevisionRequest> = from_json_document(text, "revision requests")?;
    for request in &requests {
        request
            .contact
            .validate()
            .map_err(|e| e.within(&format!("revision request {}", request.pdf_name)))?;
    }
    Ok(requests)
}

/// Serialize any document with the four-space layout.
///
/// # Errors
///
/// Returns `ModelError::Schema` if serialization fails.
pub fn to_json_document<T: Serialize + ?Sized>(value: &T) -> Result<String, ModelError> {
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
    value
        .serialize(&mut ser)
        .map_err(|e| ModelError::Schema(format!("cannot serialize: {e}")))?;
    String::from_utf8(out).map_err(|e| ModelError::Schema(format!("cannot serialize: {e}")))
}

fn from_json_document<T: DeserializeOwned>(text: &str, what: &str) -> Result<T, ModelError> {
    serde_json::from_str(text).map_err(|e| ModelError::Schema(format!("invalid {what}: {e}")))
}
