use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Decode a JSON body into `T`, reporting malformed JSON and unknown or
/// mistyped fields in the standard error envelope
pub fn parse_body<T: DeserializeOwned>(body: Result<Json<Value>, JsonRejection>) -> Result<T, ApiError> {
    let Json(payload) = body.map_err(|e| ApiError::invalid_json(e.body_text()))?;
    serde_json::from_value(payload).map_err(|e| ApiError::bad_request(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Body {
        title: Option<String>,
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = parse_body::<Body>(Ok(Json(json!({ "owner": "p2" })))).unwrap_err();
        assert_eq!(err.error_code(), "BAD_REQUEST");
        let ok = parse_body::<Body>(Ok(Json(json!({ "title": "x" })))).unwrap();
        assert_eq!(ok.title.as_deref(), Some("x"));
    }
}
