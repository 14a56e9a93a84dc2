//! Note Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{new_id, Entity};

/// A free-form note kept in a note folder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "super::wire::null_default")]
    pub content: String,
    #[serde(default)]
    pub list_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn new(title: String, list_id: Option<String>) -> Self {
        Self {
            id: new_id(),
            title,
            content: String::new(),
            list_id,
            updated_at: Utc::now(),
        }
    }

    /// Apply a partial update and bump `updated_at`
    pub fn apply(&mut self, patch: &NotePatch, now: DateTime<Utc>) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        if let Some(list_id) = &patch.list_id {
            self.list_id = list_id.clone();
        }
        self.updated_at = now;
    }
}

impl Entity for Note {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub list_id: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_apply_bumps_updated_at() {
        let mut note = Note::new("Ideas".to_string(), Some("folder".to_string()));
        let later = note.updated_at + Duration::minutes(5);

        note.apply(&NotePatch::default(), later);
        assert_eq!(note.updated_at, later);

        note.apply(
            &NotePatch {
                content: Some("body".to_string()),
                list_id: Some(None),
                ..Default::default()
            },
            later,
        );
        assert_eq!(note.content, "body");
        assert!(note.list_id.is_none());
    }

    #[test]
    fn test_note_wire_names() {
        let note = Note::new("n".to_string(), Some("l1".to_string()));
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["listId"], "l1");
        assert!(json.get("updatedAt").is_some());
    }
}
