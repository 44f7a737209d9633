//! `POST /actions`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use petition_worldid::CreateActionRequest;
use serde_json::{json, Value};

use crate::validation::Validator;
use crate::{ApiError, AppState};

/// `Authorization: Bearer <key>`, else `x-api-key: <key>`.
fn presented_api_key(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);
    bearer
        .or_else(|| headers.get("x-api-key").and_then(|v| v.to_str().ok()))
        .filter(|k| !k.is_empty())
}

/// Parse and validate the body, reporting every bad field.
fn parse_request(body: &Value) -> Result<CreateActionRequest, ApiError> {
    let mut v = Validator::new(body)?;
    let action = v.required_string("action");
    let description = v.required_string("description");
    let max_verifications = v.positive_integer("max_verifications");
    let name = v.optional_string("name").filter(|n| !n.is_empty());
    v.finish(CreateActionRequest {
        action,
        description,
        max_verifications,
        name,
    })
}

/// Register a World ID action on behalf of an API key holder.
pub async fn create_action(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Some(key) = presented_api_key(&headers) else {
        return Err(ApiError::Unauthorized {
            detail: "API key is required.".into(),
            attribute: Some("api_key".into()),
        });
    };
    if !state.api_key_matches(key) {
        return Err(ApiError::Unauthorized {
            detail: "Invalid API key.".into(),
            attribute: Some("api_key".into()),
        });
    }

    let Json(body) = body?;
    let request = parse_request(&body)?;

    if state.app_id().is_none() {
        return Err(ApiError::ServerConfiguration("APP_ID is not configured.".into()));
    }

    let record = match state.actions.register(&request).await {
        Ok(record) => record,
        Err(e) => {
            state.metrics.action_failures.inc();
            return Err(e.into());
        }
    };

    state.metrics.actions_registered.inc();
    tracing::info!(
        action = %request.action,
        action_id = record.action_id().unwrap_or(""),
        max_verifications = request.max_verifications,
        "action registered"
    );
    Ok(Json(json!({ "action": record.record })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reads_bearer_then_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(presented_api_key(&headers), None);
        headers.insert("x-api-key", HeaderValue::from_static("from-header"));
        assert_eq!(presented_api_key(&headers), Some("from-header"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-bearer"));
        assert_eq!(presented_api_key(&headers), Some("from-bearer"));
    }

    #[test]
    fn empty_bearer_is_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(presented_api_key(&headers), None);
    }

    #[test]
    fn name_is_optional() {
        let request = parse_request(&json!({
            "action": "sign-petition-42",
            "description": "Sign petition 42",
            "max_verifications": 1
        }))
        .unwrap();
        assert_eq!(request.name, None);
        assert_eq!(request.max_verifications, 1);
    }
}
