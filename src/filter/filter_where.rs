use serde_json::Value;

use super::error::FilterError;
use super::filter::Filter;
use super::types::{FilterOp, FilterWhereInfo, WhereNode};

pub struct FilterWhere {
    param_values: Vec<Value>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Parse a WHERE object into a tree. The top level is an implicit `$and`.
    pub fn parse(where_data: &Value) -> Result<WhereNode, FilterError> {
        match where_data {
            Value::Null => Ok(WhereNode::And(vec![])),
            Value::Object(obj) => {
                let mut nodes = Vec::with_capacity(obj.len());
                for (key, value) in obj {
                    if key.starts_with('$') {
                        nodes.push(Self::parse_logical_operator(key, value)?);
                    } else {
                        nodes.extend(Self::parse_field_condition(key, value)?);
                    }
                }
                Ok(WhereNode::And(nodes))
            }
            _ => Err(FilterError::InvalidWhereClause("WHERE must be an object".to_string())),
        }
    }

    fn parse_logical_operator(op: &str, value: &Value) -> Result<WhereNode, FilterError> {
        match op {
            "$and" | "$or" => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| FilterError::InvalidOperatorData(format!("{} requires array", op)))?;
                let children = arr.iter().map(Self::parse).collect::<Result<Vec<_>, _>>()?;
                Ok(if op == "$and" { WhereNode::And(children) } else { WhereNode::Or(children) })
            }
            _ => Err(FilterError::UnsupportedOperator(op.to_string())),
        }
    }

    fn parse_field_condition(field: &str, value: &Value) -> Result<Vec<WhereNode>, FilterError> {
        Filter::validate_column(field)?;
        match value {
            Value::Object(obj) if obj.keys().any(|k| k.starts_with('$')) => obj
                .iter()
                .map(|(op_key, op_val)| {
                    let operator = Self::map_operator(op_key)?;
                    if matches!(operator, FilterOp::In | FilterOp::NIn) && !op_val.is_array() {
                        return Err(FilterError::InvalidOperatorData(format!("{} requires array", op_key)));
                    }
                    Ok(WhereNode::Condition(FilterWhereInfo {
                        column: field.to_string(),
                        operator,
                        data: op_val.clone(),
                    }))
                })
                .collect(),
            // Implicit equality: { field: value }
            _ => Ok(vec![WhereNode::Condition(FilterWhereInfo {
                column: field.to_string(),
                operator: FilterOp::Eq,
                data: value.clone(),
            })]),
        }
    }

    fn map_operator(op_key: &str) -> Result<FilterOp, FilterError> {
        Ok(match op_key {
            "$eq" => FilterOp::Eq,
            "$ne" | "$neq" => FilterOp::Ne,
            "$in" => FilterOp::In,
            "$nin" => FilterOp::NIn,
            other => return Err(FilterError::UnsupportedOperator(other.to_string())),
        })
    }

    /// Render a parsed tree as a parameterized SQL predicate
    pub fn generate(&mut self, node: &WhereNode) -> String {
        match node {
            WhereNode::Condition(condition) => self.build_sql_condition(condition),
            WhereNode::And(children) => self.join(children, " AND ", "1=1"),
            WhereNode::Or(children) => self.join(children, " OR ", "1=0"),
        }
    }

    pub fn into_params(self) -> Vec<Value> {
        self.param_values
    }

    fn join(&mut self, children: &[WhereNode], joiner: &str, empty: &str) -> String {
        match children.len() {
            0 => empty.to_string(),
            1 => self.generate(&children[0]),
            _ => {
                let parts: Vec<String> = children.iter().map(|c| format!("({})", self.generate(c))).collect();
                parts.join(joiner)
            }
        }
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> String {
        let quoted_column = format!("\"{}\"", condition.column);
        match condition.operator {
            FilterOp::Eq => {
                if condition.data.is_null() { format!("{} IS NULL", quoted_column) }
                else { format!("{} = {}", quoted_column, self.param(condition.data.clone())) }
            }
            FilterOp::Ne => {
                if condition.data.is_null() { format!("{} IS NOT NULL", quoted_column) }
                else { format!("{} <> {}", quoted_column, self.param(condition.data.clone())) }
            }
            FilterOp::In | FilterOp::NIn => {
                let values = condition.data.as_array().cloned().unwrap_or_default();
                let negated = condition.operator == FilterOp::NIn;
                if values.is_empty() {
                    return if negated { "1=1".to_string() } else { "1=0".to_string() };
                }
                let params: Vec<String> = values.into_iter().map(|v| self.param(v)).collect();
                let keyword = if negated { "NOT IN" } else { "IN" };
                format!("{} {} ({})", quoted_column, keyword, params.join(", "))
            }
        }
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }

    /// Evaluate a parsed tree against a serialized record
    pub fn matches(node: &WhereNode, record: &Value) -> bool {
        match node {
            WhereNode::And(children) => children.iter().all(|c| Self::matches(c, record)),
            WhereNode::Or(children) => children.iter().any(|c| Self::matches(c, record)),
            WhereNode::Condition(condition) => {
                let actual = record.get(&condition.column).unwrap_or(&Value::Null);
                match condition.operator {
                    FilterOp::Eq => actual == &condition.data,
                    FilterOp::Ne => actual != &condition.data,
                    FilterOp::In => condition.data.as_array().map_or(false, |arr| arr.contains(actual)),
                    FilterOp::NIn => condition.data.as_array().map_or(true, |arr| !arr.contains(actual)),
                }
            }
        }
    }
}
