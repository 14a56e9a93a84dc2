//! Text output

use chrono::{DateTime, Local, Utc};

use tickdo_lib::commands::{SyncStatus, TaskListing};
use tickdo_lib::domain::{List, Note, SavedFilter, Tag, Task};
use tickdo_lib::views::{CalendarEvent, DescriptionSegment, Quadrant, SearchHit, TrashEntry};

fn when(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn day(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

pub fn task_line(task: &Task) -> String {
    let mut line = format!(
        "[{}] {}  {}",
        if task.is_completed { "x" } else { " " },
        task.id,
        task.title
    );
    let badge = task.priority.badge();
    if !badge.is_empty() {
        line.push_str(&format!("  {}", badge));
    }
    if let Some(due) = task.due_date {
        line.push_str(&format!("  due {}", day(due)));
    }
    for tag in &task.tags {
        line.push_str(&format!(" #{}", tag));
    }
    let (done, total) = task.subtask_progress();
    if total > 0 {
        line.push_str(&format!("  ({}/{})", done, total));
    }
    line
}

pub fn task_detail(task: &Task) -> String {
    let mut out = vec![
        format!("{}  {}", task.id, task.title),
        format!("  status:   {}", if task.is_completed { "completed" } else { "open" }),
        format!("  priority: {}", task.priority),
        format!("  created:  {}", when(task.created_at)),
    ];
    if let Some(due) = task.due_date {
        let all_day = task.is_all_day.unwrap_or(false);
        out.push(format!("  due:      {}", if all_day { day(due) } else { when(due) }));
    }
    if let Some(list_id) = &task.list_id {
        out.push(format!("  list:     {}", list_id));
    }
    if !task.tags.is_empty() {
        out.push(format!("  tags:     {}", task.tags.iter().map(|t| format!("#{}", t)).collect::<Vec<_>>().join(" ")));
    }
    if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
        out.push(String::new());
        out.push(description.to_string());
    }
    if !task.subtasks.is_empty() {
        out.push(String::new());
        for sub in &task.subtasks {
            out.push(format!("  [{}] {}  {}", if sub.is_completed { "x" } else { " " }, sub.id, sub.title));
        }
    }
    out.join("\n")
}

pub fn listing(view: &TaskListing) -> String {
    let mut out = vec![format!("{} ({})", view.title, view.tasks.len())];
    out.extend(view.tasks.iter().map(task_line));
    out.join("\n")
}

pub fn lists(lists: &[List]) -> String {
    lists
        .iter()
        .map(|l| format!("{}  {}  ({})", l.id, l.name, l.kind.folder_label()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn tags(tags: &[Tag]) -> String {
    tags.iter().map(|t| t.display_name()).collect::<Vec<_>>().join("\n")
}

pub fn notes(notes: &[Note]) -> String {
    notes
        .iter()
        .map(|n| format!("{}  {}  (updated {})", n.id, n.title, when(n.updated_at)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn note(note: &Note) -> String {
    format!("{}  {}\n\n{}", note.id, note.title, note.content)
}

pub fn filters(filters: &[SavedFilter]) -> String {
    filters
        .iter()
        .map(|f| {
            let c = &f.criteria;
            format!(
                "{}  {}  status={} priority={} list={} tag={}",
                f.id,
                f.name,
                c.status,
                c.priority.map(|p| p.to_string()).unwrap_or_else(|| "all".to_string()),
                c.list_id.as_deref().unwrap_or("all"),
                c.tag.as_deref().unwrap_or("all"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn trash(entries: &[TrashEntry]) -> String {
    if entries.is_empty() {
        return "Trash is empty".to_string();
    }
    entries
        .iter()
        .map(|e| format!("{}  {:<5} {}  (deleted {})", e.id, e.kind, e.title, when(e.deleted_at)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn matrix(quadrants: &[Quadrant]) -> String {
    let mut out = Vec::new();
    for q in quadrants {
        out.push(format!("{} - {} ({})", q.title, q.description, q.tasks.len()));
        out.extend(q.tasks.iter().map(|t| format!("  {}", task_line(t))));
    }
    out.join("\n")
}

pub fn calendar(events: &[CalendarEvent]) -> String {
    events
        .iter()
        .map(|e| {
            let start = if e.all_day { format!("{}      ", day(e.start)) } else { when(e.start) };
            format!("{}  {}{}", start, e.title, if e.completed { "  (done)" } else { "" })
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn search(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "No results".to_string();
    }
    hits.iter()
        .map(|h| format!("{:?}  {}  {}  {}", h.kind, h.id, h.title, h.subtitle))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn links(segments: &[DescriptionSegment]) -> String {
    segments
        .iter()
        .map(|s| match s {
            DescriptionSegment::Text { content } => content.clone(),
            DescriptionSegment::Link { text, note_id } => format!("[{}]({})", text, note_id),
        })
        .collect()
}

pub fn sync_status(status: &SyncStatus) -> String {
    let mut out = format!("datastore: {}", status.datastore);
    if let Some(url) = &status.url {
        out.push_str(&format!("\nurl:       {}", url));
    }
    if status.failed_writes > 0 {
        out.push_str(&format!("\nfailed writes this session: {}", status.failed_writes));
    }
    out
}
