//! Trash Entity
//!
//! A soft-deleted task, list, tag or note, kept with its full original record
//! so it can be restored verbatim.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entity::{new_id, DomainError, Entity};
use super::list::List;
use super::note::Note;
use super::tag::Tag;
use super::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrashKind {
    Task,
    List,
    Tag,
    Note,
}

impl fmt::Display for TrashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrashKind::Task => "task",
            TrashKind::List => "list",
            TrashKind::Tag => "tag",
            TrashKind::Note => "note",
        };
        f.write_str(s)
    }
}

/// The original record held by a trash item
#[derive(Debug, Clone, PartialEq)]
pub enum TrashPayload {
    Task(Task),
    List(List),
    Tag(Tag),
    Note(Note),
}

impl TrashPayload {
    pub fn kind(&self) -> TrashKind {
        match self {
            TrashPayload::Task(_) => TrashKind::Task,
            TrashPayload::List(_) => TrashKind::List,
            TrashPayload::Tag(_) => TrashKind::Tag,
            TrashPayload::Note(_) => TrashKind::Note,
        }
    }

    /// Id of the wrapped record
    pub fn record_id(&self) -> &str {
        match self {
            TrashPayload::Task(t) => &t.id,
            TrashPayload::List(l) => &l.id,
            TrashPayload::Tag(t) => &t.id,
            TrashPayload::Note(n) => &n.id,
        }
    }

    /// Title shown in the trash listing
    pub fn display_title(&self) -> String {
        match self {
            TrashPayload::Task(t) => t.title.clone(),
            TrashPayload::List(l) => l.name.clone(),
            TrashPayload::Tag(t) => t.display_name(),
            TrashPayload::Note(n) => n.title.clone(),
        }
    }

    fn to_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            TrashPayload::Task(t) => serde_json::to_value(t),
            TrashPayload::List(l) => serde_json::to_value(l),
            TrashPayload::Tag(t) => serde_json::to_value(t),
            TrashPayload::Note(n) => serde_json::to_value(n),
        }
    }

    fn from_value(kind: TrashKind, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            TrashKind::Task => TrashPayload::Task(serde_json::from_value(value)?),
            TrashKind::List => TrashPayload::List(serde_json::from_value(value)?),
            TrashKind::Tag => TrashPayload::Tag(serde_json::from_value(value)?),
            TrashKind::Note => TrashPayload::Note(serde_json::from_value(value)?),
        })
    }
}

/// A soft-deleted record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TrashRow", into = "TrashRow")]
pub struct TrashItem {
    pub id: String,
    pub payload: TrashPayload,
    pub deleted_at: DateTime<Utc>,
}

impl TrashItem {
    pub fn new(payload: TrashPayload, deleted_at: DateTime<Utc>) -> Self {
        Self { id: new_id(), payload, deleted_at }
    }

    pub fn kind(&self) -> TrashKind {
        self.payload.kind()
    }

    pub fn title(&self) -> String {
        self.payload.display_title()
    }
}

impl Entity for TrashItem {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Stored shape: `{ id, type, payload, deletedAt }`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashRow {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TrashKind,
    pub payload: Value,
    pub deleted_at: DateTime<Utc>,
}

impl TryFrom<TrashRow> for TrashItem {
    type Error = DomainError;

    fn try_from(row: TrashRow) -> Result<Self, Self::Error> {
        let payload = TrashPayload::from_value(row.kind, row.payload).map_err(|e| {
            DomainError::InvalidInput(format!("trash item {} has a malformed {} payload: {}", row.id, row.kind, e))
        })?;
        Ok(TrashItem {
            id: row.id,
            payload,
            deleted_at: row.deleted_at,
        })
    }
}

impl From<TrashItem> for TrashRow {
    fn from(item: TrashItem) -> Self {
        let kind = item.kind();
        // Records only hold strings, numbers and timestamps so this cannot fail
        let payload = item.payload.to_value().unwrap_or(Value::Null);
        TrashRow {
            id: item.id,
            kind,
            payload,
            deleted_at: item.deleted_at,
        }
    }
}
