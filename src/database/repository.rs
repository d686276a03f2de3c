use async_trait::async_trait;
use serde_json::{json, Value};
use sqlx::PgPool;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::query_builder::QueryBuilder;
use crate::database::versioned::VersionedModel;
use crate::filter::{Filter, FilterData};

/// Generic persistence for versioned records.
///
/// `save` is optimistic: the incoming record's `previous_version` must equal
/// the stored `version`, otherwise the write is rejected with
/// [`DatabaseError::Conflict`]. Every accepted write is also appended to the
/// record's audit history.
#[async_trait]
pub trait Repository<T: VersionedModel>: Send + Sync {
    async fn get_one(&self, filter_data: FilterData) -> Result<Option<T>, DatabaseError>;

    async fn get_many(&self, filter_data: FilterData) -> Result<Vec<T>, DatabaseError>;

    async fn save(&self, record: T) -> Result<T, DatabaseError>;

    /// Every saved version of one entity, oldest first
    async fn history(&self, entity_id: &str) -> Result<Vec<T>, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

pub(crate) fn audit_table(table: &str) -> String {
    format!("{}_audit", table)
}

pub(crate) fn history_filter(entity_id: &str) -> FilterData {
    FilterData {
        where_clause: Some(json!({ "entity_id": entity_id })),
        order: Some(json!("changed_on asc")),
        ..Default::default()
    }
}

pub struct PgRepository<T> {
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T: VersionedModel> PgRepository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Column names come from the serialized record; reject anything that is not a plain identifier
    fn columns(row: &Value) -> Result<Vec<String>, DatabaseError> {
        let obj = row
            .as_object()
            .ok_or_else(|| DatabaseError::QueryError(format!("{} record must serialize to an object", T::TABLE)))?;
        obj.keys()
            .map(|k| {
                Filter::validate_column(k).map_err(|e| DatabaseError::QueryError(e.to_string()))?;
                Ok(k.clone())
            })
            .collect()
    }
}

#[async_trait]
impl<T: VersionedModel + Unpin> Repository<T> for PgRepository<T> {
    async fn get_one(&self, mut filter_data: FilterData) -> Result<Option<T>, DatabaseError> {
        filter_data.limit = Some(1);
        QueryBuilder::<T>::new(T::TABLE)?
            .filter(filter_data)?
            .select_optional(&self.pool)
            .await
    }

    async fn get_many(&self, filter_data: FilterData) -> Result<Vec<T>, DatabaseError> {
        QueryBuilder::<T>::new(T::TABLE)?
            .filter(filter_data)?
            .select_all(&self.pool)
            .await
    }

    async fn save(&self, record: T) -> Result<T, DatabaseError> {
        let row = record.as_dict()?;
        let set_clause = Self::columns(&row)?
            .iter()
            .filter(|c| c.as_str() != "entity_id")
            .map(|c| format!("\"{c}\" = EXCLUDED.\"{c}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let previous_version = record.versioning().previous_version.clone();

        let upsert = format!(
            "INSERT INTO \"{table}\" SELECT * FROM jsonb_populate_record(NULL::\"{table}\", $1) \
             ON CONFLICT (entity_id) DO UPDATE SET {set_clause} \
             WHERE \"{table}\".\"version\" = $2",
            table = T::TABLE,
        );
        let audit = format!(
            "INSERT INTO \"{audit}\" SELECT * FROM jsonb_populate_record(NULL::\"{audit}\", $1)",
            audit = audit_table(T::TABLE),
        );

        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(&upsert)
            .bind(&row)
            .bind(previous_version)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(DatabaseError::Conflict {
                table: T::TABLE,
                entity_id: record.entity_id().to_string(),
            });
        }

        sqlx::query(&audit).bind(&row).execute(&mut *tx).await?;
        tx.commit().await?;

        tracing::debug!("Saved {} {} version {}", T::TABLE, record.entity_id(), record.versioning().version);
        Ok(record)
    }

    async fn history(&self, entity_id: &str) -> Result<Vec<T>, DatabaseError> {
        QueryBuilder::<T>::new(audit_table(T::TABLE))?
            .filter(history_filter(entity_id))?
            .select_all(&self.pool)
            .await
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
