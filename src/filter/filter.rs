use std::cmp::Ordering;

use serde_json::Value;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{FilterData, FilterOrderInfo, SqlResult, WhereNode};

pub struct Filter {
    table_name: String,
    where_node: WhereNode,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<i32>,
    offset: Option<i32>,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        Self::validate_table_name(&table_name)?;
        Ok(Self {
            table_name,
            where_node: WhereNode::And(vec![]),
            order_data: vec![],
            limit: None,
            offset: None,
        })
    }

    pub fn assign(&mut self, data: FilterData) -> Result<&mut Self, FilterError> {
        if let Some(where_clause) = data.where_clause { self.where_clause(&where_clause)?; }
        if let Some(order) = data.order { self.order(&order)?; }
        if data.limit.is_some() || data.offset.is_some() { self.limit(data.limit, data.offset)?; }
        Ok(self)
    }

    pub fn where_clause(&mut self, conditions: &Value) -> Result<&mut Self, FilterError> {
        self.where_node = FilterWhere::parse(conditions)?;
        Ok(self)
    }

    pub fn order(&mut self, order_spec: &Value) -> Result<&mut Self, FilterError> {
        self.order_data = FilterOrder::validate_and_parse(order_spec)?;
        Ok(self)
    }

    pub fn limit(&mut self, limit: Option<i32>, offset: Option<i32>) -> Result<&mut Self, FilterError> {
        if let Some(l) = limit { if l < 0 { return Err(FilterError::InvalidLimit("Limit must be non-negative".to_string())); } }
        if let Some(off) = offset { if off < 0 { return Err(FilterError::InvalidOffset("Offset must be non-negative".to_string())); } }

        // Apply max limit from config
        let max_limit = crate::config::CONFIG.filter.max_limit.unwrap_or(i32::MAX);
        let applied_limit = limit.map(|l| {
            if l > max_limit {
                if crate::config::CONFIG.filter.debug_logging {
                    tracing::warn!("Limit {} exceeds max {}, capping to max", l, max_limit);
                }
                max_limit
            } else {
                l
            }
        });

        self.limit = applied_limit;
        self.offset = offset;
        Ok(self)
    }

    /// SELECT returning each row as a single JSON column named `row`
    pub fn to_sql(&self) -> SqlResult {
        let mut filter_where = FilterWhere::new(0);
        let where_clause = filter_where.generate(&self.where_node);
        let order_clause = FilterOrder::generate(&self.order_data);
        let limit_clause = self.build_limit_clause();

        let query = [
            "SELECT row_to_json(t) AS row".to_string(),
            format!("FROM \"{}\" t", self.table_name),
            format!("WHERE {}", where_clause),
            order_clause,
            limit_clause,
        ].into_iter().filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ");

        SqlResult { query, params: filter_where.into_params() }
    }

    pub fn matches(&self, record: &Value) -> bool {
        FilterWhere::matches(&self.where_node, record)
    }

    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        FilterOrder::compare(&self.order_data, a, b)
    }

    /// Apply where, order, offset and limit to already-serialized rows
    pub fn apply(&self, rows: Vec<Value>) -> Vec<Value> {
        let mut out: Vec<Value> = rows.into_iter().filter(|r| self.matches(r)).collect();
        if !self.order_data.is_empty() {
            out.sort_by(|a, b| self.compare(a, b));
        }
        let skip = self.offset.unwrap_or(0).max(0) as usize;
        let take = self.limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
        out.into_iter().skip(skip).take(take).collect()
    }

    fn validate_table_name(name: &str) -> Result<(), FilterError> {
        if !Self::is_identifier(name) {
            return Err(FilterError::InvalidTableName(format!("Invalid table name format: {}", name)));
        }
        Ok(())
    }

    pub(crate) fn validate_column(column: &str) -> Result<(), FilterError> {
        if !Self::is_identifier(column) {
            return Err(FilterError::InvalidColumn(format!("Invalid column name format: {}", column)));
        }
        Ok(())
    }

    fn is_identifier(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    }

    fn build_limit_clause(&self) -> String {
        match (self.limit, self.offset) {
            (Some(l), Some(o)) => format!("LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!("LIMIT {}", l),
            (None, Some(o)) => format!("OFFSET {}", o),
            (None, None) => String::new(),
        }
    }
}
