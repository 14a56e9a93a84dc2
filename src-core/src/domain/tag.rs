//! Tag Entity
//!
//! Tags are attached to tasks by name for categorization and filtering.

use serde::{Deserialize, Serialize};

use super::entity::{new_id, DomainError, DomainResult, Entity};

/// A tag for categorizing tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Unique identifier
    pub id: String,
    /// Tag name, unique across all tags
    pub name: String,
}

impl Tag {
    pub fn new(name: String) -> Self {
        Self { id: new_id(), name }
    }

    /// Strip surrounding whitespace and a leading `#`
    pub fn normalize_name(raw: &str) -> DomainResult<String> {
        let name = raw.trim().trim_start_matches('#').trim();
        if name.is_empty() {
            return Err(DomainError::InvalidInput("tag name must not be empty".to_string()));
        }
        Ok(name.to_string())
    }

    pub fn display_name(&self) -> String {
        format!("#{}", self.name)
    }
}

impl Entity for Tag {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_creation() {
        let tag = Tag::new("Work".to_string());
        assert_eq!(tag.name, "Work");
        assert_eq!(tag.display_name(), "#Work");
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(Tag::normalize_name("  #urgent ").unwrap(), "urgent");
        assert_eq!(Tag::normalize_name("home").unwrap(), "home");
        assert!(Tag::normalize_name(" # ").is_err());
    }
}
