//! Global search over tasks, notes, lists and tags

use serde::Serialize;

use crate::domain::Snapshot;

/// Maximum number of hits returned
pub const SEARCH_LIMIT: usize = 15;

const SUBTITLE_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Task,
    Note,
    List,
    Tag,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub kind: SearchKind,
    pub id: String,
    pub title: String,
    pub subtitle: String,
}

fn preview(text: Option<&str>, fallback: &str) -> String {
    match text {
        Some(text) if !text.is_empty() => text.chars().take(SUBTITLE_CHARS).collect(),
        _ => fallback.to_string(),
    }
}

/// Case-insensitive substring search: tasks, then notes, lists and tags.
/// A blank query finds nothing.
pub fn search(snapshot: &Snapshot, query: &str) -> Vec<SearchHit> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return Vec::new();
    }
    let hit = |text: &str| text.to_lowercase().contains(&q);

    let tasks = snapshot
        .tasks
        .iter()
        .filter(|t| hit(&t.title) || t.description.as_deref().is_some_and(hit))
        .map(|t| SearchHit {
            kind: SearchKind::Task,
            id: t.id.clone(),
            title: t.title.clone(),
            subtitle: preview(t.description.as_deref(), "Task"),
        });

    let notes = snapshot
        .notes
        .iter()
        .filter(|n| hit(&n.title) || hit(&n.content))
        .map(|n| SearchHit {
            kind: SearchKind::Note,
            id: n.id.clone(),
            title: n.title.clone(),
            subtitle: preview(Some(&n.content), "Note"),
        });

    let lists = snapshot.lists.iter().filter(|l| hit(&l.name)).map(|l| SearchHit {
        kind: SearchKind::List,
        id: l.id.clone(),
        title: l.name.clone(),
        subtitle: l.kind.folder_label().to_string(),
    });

    let tags = snapshot.tags.iter().filter(|t| hit(&t.name)).map(|t| SearchHit {
        kind: SearchKind::Tag,
        id: t.id.clone(),
        title: t.display_name(),
        subtitle: "Tag".to_string(),
    });

    tasks.chain(notes).chain(lists).chain(tags).take(SEARCH_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{List, ListKind, Note, Tag, Task};

    fn snapshot() -> Snapshot {
        let mut report = Task::new("Quarterly report".to_string());
        report.description = Some("x".repeat(80));
        let mut call = Task::new("Call bank".to_string());
        call.description = Some("About the REPORT numbers".to_string());
        let mut note = Note::new("Report template".to_string(), None);
        note.content = String::new();

        Snapshot {
            tasks: vec![report, call],
            notes: vec![note],
            lists: vec![List::new("Reports".to_string(), ListKind::Note)],
            tags: vec![Tag::new("report".to_string())],
            ..Default::default()
        }
    }

    #[test]
    fn test_search_order_and_subtitles() {
        let hits = search(&snapshot(), "Report");
        let kinds: Vec<SearchKind> = hits.iter().map(|h| h.kind).collect();
        assert_eq!(
            kinds,
            vec![SearchKind::Task, SearchKind::Task, SearchKind::Note, SearchKind::List, SearchKind::Tag]
        );

        assert_eq!(hits[0].subtitle.chars().count(), 50);
        assert_eq!(hits[1].subtitle, "About the REPORT numbers");
        assert_eq!(hits[2].subtitle, "Note");
        assert_eq!(hits[3].subtitle, "Note Folder");
        assert_eq!(hits[4].title, "#report");
        assert_eq!(hits[4].subtitle, "Tag");
    }

    #[test]
    fn test_search_is_capped() {
        let snapshot = Snapshot {
            tasks: (0..20).map(|i| Task::new(format!("item {}", i))).collect(),
            ..Default::default()
        };
        assert_eq!(search(&snapshot, "item").len(), SEARCH_LIMIT);
    }

    #[test]
    fn test_blank_query_finds_nothing() {
        assert!(search(&snapshot(), "  ").is_empty());
    }
}
