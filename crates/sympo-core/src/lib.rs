//! # sympo-core
//!
//! Record model and update-merge protocol for symposium proceedings.
//!
//! This crate owns the in-memory representation every pipeline stage consumes:
//! - Entity structs for sessions, papers, authors, persons and special-session organizers
//! - Sheet ingestion from tabular conference-system exports
//! - The patch engine, the single mutation path for an existing `SessionList`
//! - Lossless JSON (de)serialization
//! - Read-only projections for TeX, metadata CSV and revision-request consumers
//! - Award/organizer side-files and the page-stamping contract
//! - The file boundary (`store`) for reading and writing documents

pub mod entities;
pub mod errors;
pub mod ingest;
pub mod json;
pub mod keys;
pub mod orcid;
pub mod pagination;
pub mod patch;
pub mod projection;
pub mod side_files;
pub mod store;

pub use entities::{Author, PageRange, Paper, Person, Session, SessionList, SsOrganizer, SsOrganizerList};
pub use errors::{LookupError, ModelError};
pub use keys::{PaperKey, SessionKey};
pub use orcid::Orcid;
