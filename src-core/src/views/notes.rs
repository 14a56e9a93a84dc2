//! Note folders and the trash bin listing

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Note, Snapshot, TrashKind};

/// Notes in a folder (`None` for loose notes), most recently updated first
pub fn notes_in_folder(snapshot: &Snapshot, list_id: Option<&str>) -> Vec<Note> {
    let mut notes: Vec<Note> = snapshot
        .notes
        .iter()
        .filter(|n| n.list_id.as_deref() == list_id)
        .cloned()
        .collect();
    notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    notes
}

/// A row of the trash bin
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashEntry {
    pub id: String,
    pub kind: TrashKind,
    pub title: String,
    pub deleted_at: DateTime<Utc>,
}

/// Trash items, newest deletion first
pub fn trash_listing(snapshot: &Snapshot) -> Vec<TrashEntry> {
    let mut entries: Vec<TrashEntry> = snapshot
        .trash
        .iter()
        .map(|item| TrashEntry {
            id: item.id.clone(),
            kind: item.kind(),
            title: item.title(),
            deleted_at: item.deleted_at,
        })
        .collect();
    entries.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Tag, Task, TrashItem, TrashPayload};
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_notes_in_folder_newest_first() {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let mut old = Note::new("old".to_string(), Some("f".to_string()));
        old.updated_at = base;
        let mut new = Note::new("new".to_string(), Some("f".to_string()));
        new.updated_at = base + Duration::hours(1);
        let loose = Note::new("loose".to_string(), None);

        let snapshot = Snapshot { notes: vec![old, new, loose], ..Default::default() };

        let titles: Vec<String> = notes_in_folder(&snapshot, Some("f")).into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["new", "old"]);
        assert_eq!(notes_in_folder(&snapshot, None).len(), 1);
    }

    #[test]
    fn test_trash_listing() {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let task = TrashItem::new(TrashPayload::Task(Task::new("gone".to_string())), base);
        let tag = TrashItem::new(TrashPayload::Tag(Tag::new("later".to_string())), base + Duration::days(1));

        let snapshot = Snapshot { trash: vec![task, tag], ..Default::default() };
        let listing = trash_listing(&snapshot);

        assert_eq!(listing[0].kind, TrashKind::Tag);
        assert_eq!(listing[0].title, "#later");
        assert_eq!(listing[1].title, "gone");
    }
}
