//! Saved Filter Entity
//!
//! A named combination of status/priority/list/tag predicates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::entity::{new_id, DomainError, Entity};
use super::task::{Priority, Task};
use super::wire::{all_or, all_or_priority};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub fn matches(&self, is_completed: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !is_completed,
            StatusFilter::Completed => is_completed,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" | "open" => Ok(StatusFilter::Active),
            "completed" | "done" => Ok(StatusFilter::Completed),
            other => Err(DomainError::InvalidInput(format!("unknown status '{}'", other))),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// Predicates of a filter; `None` means "all"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default, with = "all_or_priority")]
    pub priority: Option<Priority>,
    #[serde(default, with = "all_or")]
    pub list_id: Option<String>,
    #[serde(default, with = "all_or")]
    pub tag: Option<String>,
}

impl FilterCriteria {
    pub fn matches(&self, task: &Task) -> bool {
        if !self.status.matches(task.is_completed) {
            return false;
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        if let Some(list_id) = &self.list_id {
            if task.list_id.as_deref() != Some(list_id.as_str()) {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !task.has_tag(tag) {
                return false;
            }
        }
        true
    }

    pub fn is_unrestricted(&self) -> bool {
        *self == FilterCriteria::default()
    }
}

/// A named, persisted filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedFilter {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub criteria: FilterCriteria,
}

impl SavedFilter {
    pub fn new(name: String, criteria: FilterCriteria) -> Self {
        Self { id: new_id(), name, criteria }
    }
}

impl Entity for SavedFilter {
    fn id(&self) -> &str {
        &self.id
    }
}
