//! Wire types exchanged with World ID and with mini-app clients.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Credential strength the user proved with.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VerificationLevel {
    Orb,
    Device,
    /// A level this crate does not know yet, passed through unchanged.
    Other(String),
}

impl VerificationLevel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Orb => "orb",
            Self::Device => "device",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for VerificationLevel {
    fn from(s: String) -> Self {
        match s.as_str() {
            "orb" => Self::Orb,
            "device" => Self::Device,
            _ => Self::Other(s),
        }
    }
}

impl From<VerificationLevel> for String {
    fn from(level: VerificationLevel) -> Self {
        level.as_str().to_string()
    }
}

impl fmt::Display for VerificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of the in-app verify command, as posted by the client.
///
/// `status` is reported by the client itself. An `error` payload is never
/// forwarded upstream, but a `success` payload proves nothing until the cloud
/// verifier accepts it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum VerifyPayload {
    Success(ProofPayload),
    Error(ProofError),
}

impl VerifyPayload {
    pub fn is_error(&self) -> bool {
        matches!(self, VerifyPayload::Error(_))
    }
}

/// A zero-knowledge proof of personhood.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofPayload {
    pub proof: String,
    pub merkle_root: String,
    pub nullifier_hash: String,
    pub verification_level: VerificationLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

/// Client-side failure of the verify command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofError {
    #[serde(default)]
    pub error_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

/// Verdict of the cloud verifier.
///
/// Any fields the verifier returns besides the well-known ones are kept in
/// `extra` and serialized back unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VerifyResponse {
    pub fn accepted() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    pub fn rejected(code: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code.into()),
            detail: Some(detail.into()),
            ..Default::default()
        }
    }

    /// Build a verdict from an upstream JSON object body.
    pub(crate) fn from_upstream(success: bool, mut body: Map<String, Value>) -> Self {
        let mut take = |key: &str| match body.remove(key) {
            Some(Value::String(s)) => Some(s),
            Some(other) if !other.is_null() => Some(other.to_string()),
            _ => None,
        };
        let code = take("code");
        let detail = take("detail");
        let attribute = take("attribute");
        body.remove("success");
        Self {
            success,
            code,
            detail,
            attribute,
            extra: body,
        }
    }
}

/// Body of an action registration request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateActionRequest {
    pub action: String,
    pub description: String,
    pub max_verifications: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// An action as recorded by World ID.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub action: String,
    /// Upstream response body, opaque to this service.
    pub record: Value,
}

impl ActionRecord {
    /// Upstream identifier of the action, when the response carries one.
    pub fn action_id(&self) -> Option<&str> {
        self.record
            .get("id")
            .or_else(|| self.record.get("action").and_then(|a| a.get("id")))
            .and_then(Value::as_str)
    }
}
