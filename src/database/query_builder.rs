use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::{self, postgres::PgArguments, PgPool, Row};

use crate::database::manager::DatabaseError;
use crate::filter::types::SqlResult;
use crate::filter::{Filter, FilterData};

/// Runs a [`Filter`] against PostgreSQL and decodes each `row_to_json` row into `T`
pub struct QueryBuilder<T> {
    filter: Filter,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> QueryBuilder<T>
where
    T: DeserializeOwned + Send + Unpin,
{
    pub fn new(table_name: impl Into<String>) -> Result<Self, DatabaseError> {
        let filter = Filter::new(table_name).map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        Ok(Self {
            filter,
            _phantom: std::marker::PhantomData,
        })
    }

    pub fn filter(mut self, filter_data: FilterData) -> Result<Self, DatabaseError> {
        self.filter
            .assign(filter_data)
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        Ok(self)
    }

    pub async fn select_all(self, pool: &PgPool) -> Result<Vec<T>, DatabaseError> {
        let sql_result = self.filter.to_sql();
        let rows = bind_all(&sql_result).fetch_all(pool).await?;
        rows.iter().map(|r| decode_row::<T>(r)).collect()
    }

    pub async fn select_optional(self, pool: &PgPool) -> Result<Option<T>, DatabaseError> {
        let sql_result = self.filter.to_sql();
        let row = bind_all(&sql_result).fetch_optional(pool).await?;
        row.as_ref().map(|r| decode_row::<T>(r)).transpose()
    }
}

fn bind_all(sql_result: &SqlResult) -> sqlx::query::Query<'_, sqlx::Postgres, PgArguments> {
    let mut q = sqlx::query(&sql_result.query);
    for p in sql_result.params.iter() {
        q = bind_param_query(q, p);
    }
    q
}

fn decode_row<T: DeserializeOwned>(row: &sqlx::postgres::PgRow) -> Result<T, DatabaseError> {
    let value: Value = row.try_get("row")?;
    Ok(serde_json::from_value(value)?)
}

pub(crate) fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(u) = n.as_u64() {
                // Postgres doesn't have u64; cast down if safe
                q.bind(u as i64)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        // Arrays are expanded by FilterWhere before binding; objects go in as JSONB
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()),
    }
}
