use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::repository::{audit_table, history_filter, Repository};
use crate::database::versioned::VersionedModel;
use crate::filter::{Filter, FilterData};

#[derive(Default)]
struct Tables {
    current: Vec<Value>,
    audit: Vec<Value>,
}

/// In-process repository with the same filter and versioning semantics as the
/// PostgreSQL backend. Rows are held in their serialized form.
pub struct MemoryRepository<T> {
    tables: RwLock<Tables>,
    _phantom: std::marker::PhantomData<T>,
}

impl<T: VersionedModel> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            _phantom: std::marker::PhantomData,
        }
    }

    fn select(table: &str, rows: &[Value], filter_data: FilterData) -> Result<Vec<T>, DatabaseError> {
        let mut filter = Filter::new(table).map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        filter
            .assign(filter_data)
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        filter
            .apply(rows.to_vec())
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(DatabaseError::from))
            .collect()
    }
}

impl<T: VersionedModel> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: VersionedModel> Repository<T> for MemoryRepository<T> {
    async fn get_one(&self, mut filter_data: FilterData) -> Result<Option<T>, DatabaseError> {
        filter_data.limit = Some(1);
        let tables = self.tables.read().await;
        Ok(Self::select(T::TABLE, &tables.current, filter_data)?.into_iter().next())
    }

    async fn get_many(&self, filter_data: FilterData) -> Result<Vec<T>, DatabaseError> {
        let tables = self.tables.read().await;
        Self::select(T::TABLE, &tables.current, filter_data)
    }

    async fn save(&self, record: T) -> Result<T, DatabaseError> {
        let row = record.as_dict()?;
        let entity_id = record.entity_id();
        let mut tables = self.tables.write().await;

        let existing = tables
            .current
            .iter()
            .position(|r| r.get("entity_id").and_then(Value::as_str) == Some(entity_id));

        match existing {
            Some(index) => {
                let stored_version = tables.current[index].get("version").and_then(Value::as_str);
                if stored_version != record.versioning().previous_version.as_deref() {
                    return Err(DatabaseError::Conflict {
                        table: T::TABLE,
                        entity_id: entity_id.to_string(),
                    });
                }
                tables.current[index] = row.clone();
            }
            None => tables.current.push(row.clone()),
        }
        tables.audit.push(row);

        tracing::debug!("Saved {} {} version {}", T::TABLE, entity_id, record.versioning().version);
        Ok(record)
    }

    async fn history(&self, entity_id: &str) -> Result<Vec<T>, DatabaseError> {
        let tables = self.tables.read().await;
        Self::select(&audit_table(T::TABLE), &tables.audit, history_filter(entity_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::todo::Todo;
    use serde_json::json;

    #[tokio::test]
    async fn saves_and_filters_records() {
        let repo = MemoryRepository::<Todo>::new();
        for (person, title) in [("p1", "a"), ("p1", "b"), ("p2", "c")] {
            let mut todo = Todo::new(person, title);
            todo.prepare_for_save(person);
            repo.save(todo).await.unwrap();
        }

        let mine = repo
            .get_many(FilterData {
                where_clause: Some(json!({ "person_id": "p1" })),
                order: Some(json!("changed_on asc")),
                ..Default::default()
            })
            .await
            .unwrap();
        let titles: Vec<&str> = mine.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);

        let none = repo
            .get_one(FilterData {
                where_clause: Some(json!({ "person_id": "nobody" })),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn rejects_stale_writes() {
        let repo = MemoryRepository::<Todo>::new();
        let mut todo = Todo::new("p1", "Buy milk");
        todo.prepare_for_save("p1");
        let saved = repo.save(todo).await.unwrap();

        let mut first = saved.clone();
        first.title = "Buy oat milk".to_string();
        first.prepare_for_save("p1");
        repo.save(first).await.unwrap();

        // Second writer still holds the original version
        let mut stale = saved;
        stale.title = "Buy bread".to_string();
        stale.prepare_for_save("p1");
        let err = repo.save(stale).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict { .. }));
    }

    #[tokio::test]
    async fn keeps_every_version_in_history() {
        let repo = MemoryRepository::<Todo>::new();
        let mut todo = Todo::new("p1", "Buy milk");
        todo.prepare_for_save("p1");
        let mut todo = repo.save(todo).await.unwrap();
        todo.is_completed = true;
        todo.prepare_for_save("p1");
        let todo = repo.save(todo).await.unwrap();

        let history = repo.history(todo.entity_id()).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(!history[0].is_completed);
        assert!(history[1].is_completed);
        assert_eq!(history[1].versioning.previous_version.as_deref(), Some(history[0].versioning.version.as_str()));
    }
}
