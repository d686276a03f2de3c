//! Versioned entity metadata shared by every persisted model.
//!
//! Each save produces a new `version`; the version being replaced is kept in
//! `previous_version` so the repository can reject writes made from a stale
//! copy of the record.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// 32-char lowercase hex identifier
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Version marker carried by records that have never been saved
pub fn initial_version() -> String {
    Uuid::nil().simple().to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Versioning {
    pub entity_id: String,
    pub version: String,
    pub previous_version: Option<String>,
    pub changed_by_id: Option<String>,
    pub changed_on: DateTime<Utc>,
}

impl Versioning {
    pub fn new() -> Self {
        Self {
            entity_id: new_id(),
            version: initial_version(),
            previous_version: None,
            changed_by_id: None,
            changed_on: Utc::now(),
        }
    }

    pub fn prepare_for_save(&mut self, changed_by_id: &str) {
        let next = new_id();
        self.previous_version = Some(std::mem::replace(&mut self.version, next));
        self.changed_by_id = Some(changed_by_id.to_string());
        self.changed_on = Utc::now();
    }

    pub fn is_new(&self) -> bool {
        self.version == initial_version()
    }
}

impl Default for Versioning {
    fn default() -> Self {
        Self::new()
    }
}

/// A record persisted through a [`Repository`](crate::database::repository::Repository).
///
/// Implementors serialize to a flat JSON object whose keys match the columns
/// of `TABLE` (the `Versioning` block is flattened into the record).
pub trait VersionedModel: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const TABLE: &'static str;

    fn versioning(&self) -> &Versioning;
    fn versioning_mut(&mut self) -> &mut Versioning;

    fn entity_id(&self) -> &str {
        &self.versioning().entity_id
    }

    /// Stamp audit fields; must be called before every save
    fn prepare_for_save(&mut self, changed_by_id: &str) {
        self.versioning_mut().prepare_for_save(changed_by_id);
    }

    /// Plain key/value form used for transport and storage
    fn as_dict(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_versioning_is_unsaved() {
        let v = Versioning::new();
        assert!(v.is_new());
        assert_eq!(v.entity_id.len(), 32);
        assert!(v.previous_version.is_none());
    }

    #[test]
    fn prepare_for_save_rotates_version() {
        let mut v = Versioning::new();
        let entity_id = v.entity_id.clone();
        v.prepare_for_save("p1");
        let first = v.version.clone();
        assert_eq!(v.previous_version.as_deref(), Some(initial_version().as_str()));
        assert_eq!(v.changed_by_id.as_deref(), Some("p1"));

        v.prepare_for_save("p2");
        assert_eq!(v.previous_version.as_deref(), Some(first.as_str()));
        assert_ne!(v.version, first);
        assert_eq!(v.entity_id, entity_id);
        assert!(!v.is_new());
    }
}
