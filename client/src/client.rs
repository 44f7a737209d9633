//! HTTP client for the gateway routes.

use crate::error::ClientError;

use petition_auth::IssuedNonce;
use petition_types::{Petition, PetitionId};
use petition_worldid::{CreateActionRequest, VerifyPayload, VerifyResponse};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

/// Default timeout for gateway requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// What `POST /verify-proof` answered, accepted or not.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct VerifyOutcome {
    #[serde(rename = "verifyRes")]
    pub verify_res: VerifyResponse,
    pub status: u16,
}

#[derive(Deserialize)]
struct PetitionList {
    petitions: Vec<Petition>,
}

#[derive(Serialize)]
struct VerifyBody<'a> {
    payload: &'a VerifyPayload,
    action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    signal: Option<&'a str>,
}

/// Client for one gateway deployment.
#[derive(Clone, Debug)]
pub struct GatewayClient {
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
    base_url: String,
    /// Sent as a bearer token to `POST /actions`.
    api_key: Option<String>,
}

impl GatewayClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http_client
            .request(method, format!("{}{}", self.base_url, path))
    }

    /// Send, then decode a 2xx body as `T` or a non-2xx body as the gateway
    /// error body.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let (status, text) = self.send_raw(request).await?;
        if !status.is_success() {
            return Err(api_error(status, &text));
        }
        serde_json::from_str(&text)
            .map_err(|e| ClientError::InvalidResponse(format!("{e}: {text}")))
    }

    async fn send_raw(&self, request: RequestBuilder) -> Result<(StatusCode, String), ClientError> {
        let response = request.send().await.map_err(ClientError::from_send)?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("failed to read body: {e}")))?;
        tracing::debug!(status = status.as_u16(), "gateway response");
        Ok((status, text))
    }

    /// `GET /petitions`
    pub async fn list_petitions(&self) -> Result<Vec<Petition>, ClientError> {
        let list: PetitionList = self.send(self.request(Method::GET, "/petitions")).await?;
        Ok(list.petitions)
    }

    /// `POST /petitions`
    pub async fn create_petition(
        &self,
        title: &str,
        description: &str,
    ) -> Result<Petition, ClientError> {
        let body = json!({ "title": title, "description": description });
        self.send(self.request(Method::POST, "/petitions").json(&body))
            .await
    }

    /// `PUT /petitions`
    pub async fn sign_petition(&self, id: &PetitionId) -> Result<Petition, ClientError> {
        let body = json!({ "id": id });
        self.send(self.request(Method::PUT, "/petitions").json(&body))
            .await
    }

    /// `POST /verify-proof`
    ///
    /// A rejection is an `Ok` outcome with `verify_res.success == false`;
    /// `Err` means no verdict was obtained.
    pub async fn verify_proof(
        &self,
        payload: &VerifyPayload,
        action: &str,
        signal: Option<&str>,
    ) -> Result<VerifyOutcome, ClientError> {
        let body = VerifyBody {
            payload,
            action,
            signal,
        };
        let (status, text) = self
            .send_raw(self.request(Method::POST, "/verify-proof").json(&body))
            .await?;
        // Rejections come back as 400 with a verdict; other 400s are errors.
        if status.is_success() || status == StatusCode::BAD_REQUEST {
            match serde_json::from_str::<VerifyOutcome>(&text) {
                Ok(outcome) => return Ok(outcome),
                Err(e) if status.is_success() => {
                    return Err(ClientError::InvalidResponse(format!("{e}: {text}")))
                }
                Err(_) => {}
            }
        }
        Err(api_error(status, &text))
    }

    /// `POST /actions`, returning the upstream action record.
    pub async fn register_action(&self, request: &CreateActionRequest) -> Result<Value, ClientError> {
        let mut builder = self.request(Method::POST, "/actions").json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let mut body: Value = self.send(builder).await?;
        Ok(body.get_mut("action").map(Value::take).unwrap_or(Value::Null))
    }

    /// `GET /auth/nonce`
    pub async fn nonce(&self) -> Result<IssuedNonce, ClientError> {
        self.send(self.request(Method::GET, "/auth/nonce")).await
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<Value, ClientError> {
        self.send(self.request(Method::GET, "/health")).await
    }
}

fn api_error(status: StatusCode, text: &str) -> ClientError {
    let body: Value = serde_json::from_str(text).unwrap_or(Value::Null);
    let field = |key: &str| body.get(key).and_then(Value::as_str).map(String::from);
    ClientError::Api {
        status: status.as_u16(),
        code: field("code").unwrap_or_else(|| "unknown".to_string()),
        detail: field("detail")
            .or_else(|| field("error"))
            .unwrap_or_else(|| text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_reads_gateway_body() {
        let e = api_error(
            StatusCode::NOT_FOUND,
            r#"{"error":"Petition not found","code":"not_found","detail":"No petition with id x."}"#,
        );
        assert_eq!(e.code(), Some("not_found"));
        assert!(e.to_string().contains("No petition with id x."));
    }

    #[test]
    fn api_error_tolerates_plain_text() {
        let e = api_error(StatusCode::BAD_GATEWAY, "upstream down");
        match e {
            ClientError::Api { status, code, detail } => {
                assert_eq!(status, 502);
                assert_eq!(code, "unknown");
                assert_eq!(detail, "upstream down");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn base_url_is_normalised() {
        assert_eq!(GatewayClient::new("http://localhost:3000/").base_url(), "http://localhost:3000");
    }
}
