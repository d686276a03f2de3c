use serde::{Deserialize, Serialize};

use crate::database::versioned::{Versioning, VersionedModel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(flatten)]
    pub versioning: Versioning,
    pub first_name: String,
    pub last_name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Person {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            versioning: Versioning::new(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            active: true,
        }
    }
}

impl VersionedModel for Person {
    const TABLE: &'static str = "person";

    fn versioning(&self) -> &Versioning {
        &self.versioning
    }

    fn versioning_mut(&mut self) -> &mut Versioning {
        &mut self.versioning
    }
}

/// Profile fields a person may change; blank values are ignored
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersonUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl PersonUpdate {
    pub fn apply(&self, person: &mut Person) {
        if let Some(first_name) = self.first_name.as_deref().filter(|s| !s.trim().is_empty()) {
            person.first_name = first_name.to_string();
        }
        if let Some(last_name) = self.last_name.as_deref().filter(|s| !s.trim().is_empty()) {
            person.last_name = last_name.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_profile_fields_are_ignored() {
        let mut person = Person::new("Ada", "Lovelace");
        PersonUpdate { first_name: Some("".into()), last_name: Some("Byron".into()) }.apply(&mut person);
        assert_eq!(person.first_name, "Ada");
        assert_eq!(person.last_name, "Byron");
    }
}
