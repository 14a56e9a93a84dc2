//! List Entity
//!
//! A folder that groups either tasks or notes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::entity::{new_id, DomainError, Entity};

/// What a list holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    #[default]
    Task,
    Note,
}

impl ListKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::Task => "task",
            ListKind::Note => "note",
        }
    }

    /// Label shown in search results
    pub fn folder_label(&self) -> &'static str {
        match self {
            ListKind::Task => "Task Folder",
            ListKind::Note => "Note Folder",
        }
    }
}

impl FromStr for ListKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "task" | "tasks" => Ok(ListKind::Task),
            "note" | "notes" => Ok(ListKind::Note),
            other => Err(DomainError::InvalidInput(format!("unknown list type '{}'", other))),
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-defined folder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ListKind,
}

impl List {
    pub fn new(name: String, kind: ListKind) -> Self {
        Self { id: new_id(), name, kind }
    }

    pub fn holds_notes(&self) -> bool {
        self.kind == ListKind::Note
    }
}

impl Entity for List {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_kind_wire_name() {
        let list = List::new("Journal".to_string(), ListKind::Note);
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["type"], "note");
        assert!(list.holds_notes());
    }

    #[test]
    fn test_list_kind_parse() {
        assert_eq!("Notes".parse::<ListKind>().unwrap(), ListKind::Note);
        assert!("folder".parse::<ListKind>().is_err());
    }

    #[test]
    fn test_missing_type_defaults_to_task() {
        let list: List = serde_json::from_str(r#"{"id":"1","name":"Work"}"#).unwrap();
        assert_eq!(list.kind, ListKind::Task);
    }
}
