use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::database::manager::DatabaseError;
use crate::database::models::person::{Person, PersonUpdate};
use crate::database::repository::Repository;
use crate::database::versioned::VersionedModel;
use crate::filter::FilterData;

pub struct PersonService {
    repository: Arc<dyn Repository<Person>>,
}

impl PersonService {
    pub fn new(repository: Arc<dyn Repository<Person>>) -> Self {
        Self { repository }
    }

    /// Active person by id; inactive people are treated as absent
    pub async fn get_by_id(&self, entity_id: &str) -> Result<Option<Person>, DatabaseError> {
        let filter = FilterData {
            where_clause: Some(json!({ "entity_id": entity_id, "active": true })),
            ..Default::default()
        };
        self.repository.get_one(filter).await
    }

    pub async fn create(&self, first_name: &str, last_name: &str) -> Result<Person, DatabaseError> {
        let mut person = Person::new(first_name, last_name);
        let self_id = person.entity_id().to_string();
        person.prepare_for_save(&self_id);

        let saved = self.repository.save(person).await?;
        info!("Created person {}", saved.entity_id());
        Ok(saved)
    }

    pub async fn update_profile(&self, mut person: Person, update: &PersonUpdate) -> Result<Person, DatabaseError> {
        update.apply(&mut person);
        let self_id = person.entity_id().to_string();
        person.prepare_for_save(&self_id);
        self.repository.save(person).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryRepository;

    #[tokio::test]
    async fn creates_and_updates_profile() {
        let svc = PersonService::new(Arc::new(MemoryRepository::<Person>::new()));
        let person = svc.create("Ada", "Lovelace").await.unwrap();
        assert_eq!(person.versioning.changed_by_id.as_deref(), Some(person.entity_id()));

        let found = svc.get_by_id(person.entity_id()).await.unwrap().unwrap();
        let update = PersonUpdate { first_name: None, last_name: Some("King".into()) };
        let updated = svc.update_profile(found, &update).await.unwrap();
        assert_eq!(updated.first_name, "Ada");
        assert_eq!(updated.last_name, "King");

        assert!(svc.get_by_id("missing").await.unwrap().is_none());
    }
}
