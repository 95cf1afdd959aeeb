//! Sheet ingestion: tabular conference-system exports -> [`SessionList`].
//!
//! The export has one row per accepted paper. Session fields repeat on every
//! row of the session; the first row of a session defines them. Author and
//! chair details live in numbered column groups described by a
//! [`ColumnMap`], which is checked against the header before any row is read.
//!
//! [`SessionList`]: crate::entities::SessionList

mod columns;
mod loader;
mod sheet;

pub use columns::{AuthorColumns, ChairColumns, ColumnMap, MAX_SLOTS, SLOT_PLACEHOLDER, slot_column};
pub use loader::{DEFAULT_PLENARY_MINUTES, DEFAULT_PRESENTATION_MINUTES, SheetLoader, load_sheet};
pub use sheet::Sheet;
