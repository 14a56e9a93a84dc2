//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! Records serialize with the camelCase column names of the hosted tables.

mod entity;
mod filter;
mod list;
mod note;
mod snapshot;
mod tag;
mod task;
mod trash;
pub(crate) mod wire;

pub use entity::{new_id, require_text, DomainError, DomainResult, Entity};
pub use filter::{FilterCriteria, SavedFilter, StatusFilter};
pub use list::{List, ListKind};
pub use note::{Note, NotePatch};
pub use snapshot::{Record, Snapshot, Table};
pub use tag::Tag;
pub use task::{Priority, Subtask, Task, TaskPatch};
pub use trash::{TrashItem, TrashKind, TrashPayload, TrashRow};
