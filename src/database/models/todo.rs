use serde::{Deserialize, Serialize};

use super::ValidationError;
use crate::database::versioned::{Versioning, VersionedModel};

/// One task owned by a person. `active = false` marks a soft-deleted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    #[serde(flatten)]
    pub versioning: Versioning,
    pub person_id: String,
    pub title: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Todo {
    pub fn new(person_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            versioning: Versioning::new(),
            person_id: person_id.into(),
            title: title.into(),
            is_completed: false,
            active: true,
        }
    }

    pub fn validate_person_id(&self) -> Option<String> {
        if self.person_id.trim().is_empty() {
            return Some("person_id is required.".to_string());
        }
        None
    }

    pub fn validate_title(&self) -> Option<String> {
        if self.title.trim().is_empty() {
            return Some("title is required.".to_string());
        }
        None
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::check([
            ("person_id", self.validate_person_id()),
            ("title", self.validate_title()),
        ])
    }
}

impl VersionedModel for Todo {
    const TABLE: &'static str = "todo";

    fn versioning(&self) -> &Versioning {
        &self.versioning
    }

    fn versioning_mut(&mut self) -> &mut Versioning {
        &mut self.versioning
    }
}

/// The mutable fields of a [`Todo`]; `None` leaves a field untouched.
///
/// Soft delete is one way: `active: Some(true)` never revives a deleted record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoUpdate {
    pub title: Option<String>,
    pub is_completed: Option<bool>,
    pub active: Option<bool>,
}

impl TodoUpdate {
    pub fn apply(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(is_completed) = self.is_completed {
            todo.is_completed = is_completed;
        }
        if self.active == Some(false) {
            todo.active = false;
        }
    }
}

/// Canonical list filter. `active`/`inactive` are accepted as legacy aliases
/// for `completed`/`pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TodoStatus {
    #[default]
    All,
    Pending,
    Completed,
}

impl TodoStatus {
    /// `is_completed` value this status narrows to, if any
    pub fn completion(self) -> Option<bool> {
        match self {
            TodoStatus::All => None,
            TodoStatus::Pending => Some(false),
            TodoStatus::Completed => Some(true),
        }
    }
}

/// Unknown values are an error; they never fall back to `All`.
impl std::str::FromStr for TodoStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(TodoStatus::All),
            "pending" | "inactive" => Ok(TodoStatus::Pending),
            "completed" | "active" => Ok(TodoStatus::Completed),
            other => Err(format!("Unknown status '{}'; expected all, pending or completed", other)),
        }
    }
}

/// Flag changes applied to every active record of a person
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkUpdate {
    pub is_completed: Option<bool>,
    pub is_deleted: Option<bool>,
}

impl BulkUpdate {
    pub fn complete_all() -> Self {
        Self { is_completed: Some(true), ..Default::default() }
    }

    pub fn reopen_all() -> Self {
        Self { is_completed: Some(false), ..Default::default() }
    }

    pub fn delete_all() -> Self {
        Self { is_deleted: Some(true), ..Default::default() }
    }

    pub fn apply(&self, todo: &mut Todo) {
        if let Some(is_completed) = self.is_completed {
            todo.is_completed = is_completed;
        }
        if let Some(is_deleted) = self.is_deleted {
            todo.active = !is_deleted;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_todo_defaults() {
        let todo = Todo::new("p1", "Buy milk");
        assert!(todo.active);
        assert!(!todo.is_completed);
        assert!(todo.validate().is_ok());
    }

    #[test]
    fn validation_reports_each_missing_field() {
        let todo = Todo::new("", " ");
        assert_eq!(todo.validate_person_id().as_deref(), Some("person_id is required."));
        assert_eq!(todo.validate_title().as_deref(), Some("title is required."));
        let err = todo.validate().unwrap_err();
        assert_eq!(err.field_errors.len(), 2);
        assert!(err.field_errors.contains_key("title"));
    }

    #[test]
    fn serializes_to_flat_mapping() {
        let todo = Todo::new("p1", "Buy milk");
        let dict = todo.as_dict().unwrap();
        let obj = dict.as_object().unwrap();
        for key in ["entity_id", "version", "changed_on", "person_id", "title", "is_completed", "active"] {
            assert!(obj.contains_key(key), "missing {}", key);
        }
        let back: Todo = serde_json::from_value(dict).unwrap();
        assert_eq!(back, todo);
    }

    #[test]
    fn update_only_touches_given_fields() {
        let mut todo = Todo::new("p1", "Buy milk");
        TodoUpdate { is_completed: Some(true), ..Default::default() }.apply(&mut todo);
        assert!(todo.is_completed);
        assert_eq!(todo.title, "Buy milk");
        assert!(todo.active);
    }

    #[test]
    fn update_cannot_revive_deleted_record() {
        let mut todo = Todo::new("p1", "Buy milk");
        TodoUpdate { active: Some(false), ..Default::default() }.apply(&mut todo);
        assert!(!todo.active);
        TodoUpdate { active: Some(true), ..Default::default() }.apply(&mut todo);
        assert!(!todo.active);
    }

    #[test]
    fn bulk_delete_inverts_into_active() {
        let mut todo = Todo::new("p1", "Buy milk");
        BulkUpdate::delete_all().apply(&mut todo);
        assert!(!todo.active);
        assert!(!todo.is_completed);
    }

    #[test]
    fn status_accepts_both_vocabularies() {
        assert_eq!("active".parse::<TodoStatus>().unwrap(), TodoStatus::Completed);
        assert_eq!("inactive".parse::<TodoStatus>().unwrap(), TodoStatus::Pending);
        assert_eq!("Completed".parse::<TodoStatus>().unwrap(), TodoStatus::Completed);
        assert_eq!("all".parse::<TodoStatus>().unwrap(), TodoStatus::All);
        assert!("archived".parse::<TodoStatus>().is_err());
        assert_eq!(TodoStatus::Pending.completion(), Some(false));
        assert_eq!(TodoStatus::All.completion(), None);
    }
}
