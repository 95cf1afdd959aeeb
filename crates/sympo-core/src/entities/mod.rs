//! Entity structs for the proceedings record model.
//!
//! All persisted structs derive `Serialize`, `Deserialize` and `JsonSchema`.
//! Constructors validate eagerly; structs built field-by-field are validated
//! when they enter a [`SessionList`], which is the only owner that can be
//! mutated (through the patch engine).

mod organizer;
mod paper;
mod person;
mod session;
mod session_list;

pub use organizer::{SsOrganizer, SsOrganizerList};
pub use paper::{PageRange, Paper};
pub use person::{Author, Person};
pub use session::Session;
pub use session_list::{SessionList, SessionOrder};
