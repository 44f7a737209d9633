//! Registration of World ID actions.
//!
//! Each petition gets its own signing action so that one person can sign it
//! at most `max_verifications` times. The portal exposes two generations of
//! the endpoint; which one is used is configuration.

use crate::client::WorldIdClient;
use crate::error::WorldIdError;
use crate::types::{ActionRecord, CreateActionRequest};

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// Registers actions with the identity service.
pub trait ActionRegistry: Send + Sync {
    fn register<'a>(
        &'a self,
        request: &'a CreateActionRequest,
    ) -> BoxFuture<'a, Result<ActionRecord, WorldIdError>>;
}

/// Which create-action endpoint to call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionApiVersion {
    /// `POST /api/v1/actions` with `app_id` and `name` in the body.
    V1,
    /// `POST /api/v2/create-action/{app_id}`.
    #[default]
    V2,
}

impl fmt::Display for ActionApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => f.write_str("v1"),
            Self::V2 => f.write_str("v2"),
        }
    }
}

impl FromStr for ActionApiVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(Self::V1),
            "v2" | "2" => Ok(Self::V2),
            other => Err(format!("unknown action API version: {other}")),
        }
    }
}

/// [`ActionRegistry`] backed by the World ID developer portal.
#[derive(Clone)]
pub struct CloudActionRegistry {
    client: WorldIdClient,
    app_id: String,
    api_key: String,
    version: ActionApiVersion,
}

impl CloudActionRegistry {
    pub fn new(
        client: WorldIdClient,
        app_id: impl Into<String>,
        api_key: impl Into<String>,
        version: ActionApiVersion,
    ) -> Self {
        Self {
            client,
            app_id: app_id.into(),
            api_key: api_key.into(),
            version,
        }
    }

    fn endpoint(&self, request: &CreateActionRequest) -> (String, Value) {
        match self.version {
            ActionApiVersion::V2 => (
                self.client
                    .url(&format!("/api/v2/create-action/{}", self.app_id)),
                json!({
                    "action": request.action,
                    "description": request.description,
                    "max_verifications": request.max_verifications,
                }),
            ),
            ActionApiVersion::V1 => (
                self.client.url("/api/v1/actions"),
                json!({
                    "app_id": self.app_id,
                    "action": request.action,
                    "name": request.name.as_deref().unwrap_or(&request.action),
                    "description": request.description,
                    "max_verifications": request.max_verifications,
                }),
            ),
        }
    }

    async fn create_action(
        &self,
        request: &CreateActionRequest,
    ) -> Result<ActionRecord, WorldIdError> {
        let (url, body) = self.endpoint(request);
        let (status, text) = self
            .client
            .post_json(&url, Some(&self.api_key), &body)
            .await?;

        let data: Value = serde_json::from_str(&text).map_err(|e| {
            tracing::error!(status = status.as_u16(), "unparseable create-action response: {e}");
            WorldIdError::InvalidResponse {
                detail: "Received invalid response from World ID API".to_string(),
                raw: text.clone(),
            }
        })?;

        if !status.is_success() {
            let detail = data
                .get("detail")
                .and_then(Value::as_str)
                .unwrap_or("Failed to create action")
                .to_string();
            tracing::error!(
                status = status.as_u16(),
                action = %request.action,
                app_id = %self.app_id,
                "failed to create action: {detail}"
            );
            return Err(WorldIdError::ActionCreationFailed {
                status: status.as_u16(),
                detail,
            });
        }

        tracing::info!(action = %request.action, version = %self.version, "action registered");
        Ok(ActionRecord {
            action: request.action.clone(),
            record: data,
        })
    }
}

impl fmt::Debug for CloudActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudActionRegistry")
            .field("base_url", &self.client.base_url())
            .field("app_id", &self.app_id)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl ActionRegistry for CloudActionRegistry {
    fn register<'a>(
        &'a self,
        request: &'a CreateActionRequest,
    ) -> BoxFuture<'a, Result<ActionRecord, WorldIdError>> {
        Box::pin(self.create_action(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: Option<&str>) -> CreateActionRequest {
        CreateActionRequest {
            action: "sign-petition-42".into(),
            description: "Sign petition 42".into(),
            max_verifications: 1,
            name: name.map(String::from),
        }
    }

    #[test]
    fn v2_endpoint_puts_app_id_in_path() {
        let reg = CloudActionRegistry::new(
            WorldIdClient::new("https://w.test"),
            "app_1",
            "key",
            ActionApiVersion::V2,
        );
        let (url, body) = reg.endpoint(&request(Some("ignored")));
        assert_eq!(url, "https://w.test/api/v2/create-action/app_1");
        assert!(body.get("app_id").is_none());
        assert!(body.get("name").is_none());
        assert_eq!(body["max_verifications"], 1);
    }

    #[test]
    fn v1_endpoint_defaults_name_to_action() {
        let reg = CloudActionRegistry::new(
            WorldIdClient::new("https://w.test"),
            "app_1",
            "key",
            ActionApiVersion::V1,
        );
        let (url, body) = reg.endpoint(&request(None));
        assert_eq!(url, "https://w.test/api/v1/actions");
        assert_eq!(body["app_id"], "app_1");
        assert_eq!(body["name"], "sign-petition-42");
    }

    #[test]
    fn version_parses() {
        assert_eq!("V1".parse::<ActionApiVersion>(), Ok(ActionApiVersion::V1));
        assert_eq!("2".parse::<ActionApiVersion>(), Ok(ActionApiVersion::V2));
        assert!("v3".parse::<ActionApiVersion>().is_err());
    }
}
