pub mod person;
pub mod todo;

use std::collections::HashMap;

use thiserror::Error;

/// Field-level validation failure, one message per offending field
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub field_errors: HashMap<String, String>,
}

impl ValidationError {
    /// Collect `(field, Option<message>)` checks; `Ok` when every check passed
    pub fn check<'a>(checks: impl IntoIterator<Item = (&'a str, Option<String>)>) -> Result<(), Self> {
        let field_errors: HashMap<String, String> = checks
            .into_iter()
            .filter_map(|(field, message)| message.map(|m| (field.to_string(), m)))
            .collect();

        if field_errors.is_empty() {
            return Ok(());
        }

        let mut messages: Vec<&str> = field_errors.values().map(String::as_str).collect();
        messages.sort_unstable();
        Err(Self {
            message: messages.join(" "),
            field_errors,
        })
    }
}
