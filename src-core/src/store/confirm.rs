//! Confirmation prompts for destructive actions

/// Asks the user before a destructive action; `false` cancels it
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Accepts every prompt (non-interactive use, `--yes`)
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Declines every prompt
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

impl Confirm for NeverConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        log::debug!("Declined: {}", prompt);
        false
    }
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

pub(crate) const DELETE_TASK: &str = "Move this task to the Trash?";
pub(crate) const DELETE_LIST: &str = "Delete this folder? All tasks and notes inside will be moved to the Trash.";
pub(crate) const DELETE_NOTE: &str = "Move this note to the Trash?";
pub(crate) const DELETE_FILTER: &str = "Delete this saved filter?";
pub(crate) const DELETE_SUBTASK: &str = "Delete this subtask?";
pub(crate) const PURGE_ITEM: &str = "Permanently delete this item? This cannot be undone.";
pub(crate) const EMPTY_TRASH: &str = "Empty the trash? ALL items will be permanently deleted.";

pub(crate) fn delete_tag_prompt(name: &str) -> String {
    format!("Delete the tag #{}? It will be removed from all tasks.", name)
}
