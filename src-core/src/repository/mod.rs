//! Repository Layer
//!
//! Data access abstractions and the SQLite implementation.

mod traits;
mod db;
mod task_repo;
mod list_repo;
mod tag_repo;
mod filter_repo;
mod note_repo;
mod trash_repo;
mod local;

#[cfg(test)]
mod tests;

pub use traits::{upsert, Repository, SearchableRepository};
pub use db::{init_db, DbState, SharedConn};
pub use task_repo::TaskRepository;
pub use list_repo::ListRepository;
pub use tag_repo::TagRepository;
pub use filter_repo::FilterRepository;
pub use note_repo::NoteRepository;
pub use trash_repo::TrashRepository;
pub use local::LocalDatastore;
