//! Commands Layer
//!
//! Handlers that bridge the CLI to the store and views. Errors are returned
//! as display strings.

mod filter_cmd;
mod list_cmd;
mod note_cmd;
mod sync_cmd;
mod tag_cmd;
mod task_cmd;
mod trash_cmd;
mod view_cmd;


pub use filter_cmd::*;
pub use list_cmd::*;
pub use note_cmd::*;
pub use sync_cmd::*;
pub use tag_cmd::*;
pub use task_cmd::*;
pub use trash_cmd::*;
pub use view_cmd::*;
