//! The six collections held together, plus the table/record vocabulary the
//! datastores speak.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::entity::{DomainError, Entity};
use super::filter::SavedFilter;
use super::list::List;
use super::note::Note;
use super::tag::Tag;
use super::task::Task;
use super::trash::TrashItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Tasks,
    Lists,
    Tags,
    Filters,
    Notes,
    Trash,
}

impl Table {
    pub const ALL: [Table; 6] = [
        Table::Tasks,
        Table::Lists,
        Table::Tags,
        Table::Filters,
        Table::Notes,
        Table::Trash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Tasks => "tasks",
            Table::Lists => "lists",
            Table::Tags => "tags",
            Table::Filters => "filters",
            Table::Notes => "notes",
            Table::Trash => "trash",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Table {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Table::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::InvalidInput(format!("unknown table '{}'", s)))
    }
}

/// One record of any table
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Task(Task),
    List(List),
    Tag(Tag),
    Filter(SavedFilter),
    Note(Note),
    Trash(TrashItem),
}

impl Record {
    pub fn table(&self) -> Table {
        match self {
            Record::Task(_) => Table::Tasks,
            Record::List(_) => Table::Lists,
            Record::Tag(_) => Table::Tags,
            Record::Filter(_) => Table::Filters,
            Record::Note(_) => Table::Notes,
            Record::Trash(_) => Table::Trash,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Record::Task(r) => r.id(),
            Record::List(r) => r.id(),
            Record::Tag(r) => r.id(),
            Record::Filter(r) => r.id(),
            Record::Note(r) => r.id(),
            Record::Trash(r) => r.id(),
        }
    }

    /// JSON row as sent to the hosted backend
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            Record::Task(r) => serde_json::to_value(r),
            Record::List(r) => serde_json::to_value(r),
            Record::Tag(r) => serde_json::to_value(r),
            Record::Filter(r) => serde_json::to_value(r),
            Record::Note(r) => serde_json::to_value(r),
            Record::Trash(r) => serde_json::to_value(r),
        }
    }
}

/// Full client-side state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub lists: Vec<List>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub filters: Vec<SavedFilter>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub trash: Vec<TrashItem>,
}

impl Snapshot {
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn list(&self, id: &str) -> Option<&List> {
        self.lists.iter().find(|l| l.id == id)
    }

    pub fn tag_by_name(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.name == name)
    }

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn filter(&self, id: &str) -> Option<&SavedFilter> {
        self.filters.iter().find(|f| f.id == id)
    }

    pub fn trash_item(&self, id: &str) -> Option<&TrashItem> {
        self.trash.iter().find(|t| t.id == id)
    }

    /// Every record, tables in dependency order (lists and tags before tasks)
    pub fn records(&self) -> Vec<Record> {
        let mut out = Vec::new();
        out.extend(self.lists.iter().cloned().map(Record::List));
        out.extend(self.tags.iter().cloned().map(Record::Tag));
        out.extend(self.tasks.iter().cloned().map(Record::Task));
        out.extend(self.notes.iter().cloned().map(Record::Note));
        out.extend(self.filters.iter().cloned().map(Record::Filter));
        out.extend(self.trash.iter().cloned().map(Record::Trash));
        out
    }

    pub fn record_count(&self) -> usize {
        self.tasks.len() + self.lists.len() + self.tags.len() + self.filters.len() + self.notes.len() + self.trash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ListKind;

    #[test]
    fn test_table_names() {
        assert_eq!(Table::Filters.to_string(), "filters");
        assert_eq!("trash".parse::<Table>().unwrap(), Table::Trash);
        assert!("items".parse::<Table>().is_err());
    }

    #[test]
    fn test_records_put_lists_first() {
        let mut snapshot = Snapshot::default();
        snapshot.tasks.push(Task::new("a".to_string()));
        snapshot.lists.push(List::new("Work".to_string(), ListKind::Task));

        let records = snapshot.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].table(), Table::Lists);
        assert_eq!(records[1].table(), Table::Tasks);
        assert_eq!(snapshot.record_count(), 2);
    }
}
