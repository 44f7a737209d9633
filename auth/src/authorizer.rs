//! The sign-in decision.

use crate::nonce::NonceIssuer;
use crate::types::{SiweOutcome, UserInfo, WalletAuthPayload, WalletCredentials, WalletUser};
use crate::AuthError;

use futures_util::future::BoxFuture;
use petition_utils::{retry_with_backoff, RetryPolicy};
use std::sync::Arc;

/// Checks a SIWE message signature against the chain.
pub trait SiweVerifier: Send + Sync {
    fn verify<'a>(
        &'a self,
        payload: &'a WalletAuthPayload,
        nonce: &'a str,
        rpc_url: &'a str,
    ) -> BoxFuture<'a, Result<SiweOutcome, AuthError>>;
}

/// Resolves a wallet address to a public profile.
pub trait UserDirectory: Send + Sync {
    fn user_info<'a>(&'a self, address: &'a str) -> BoxFuture<'a, Result<UserInfo, AuthError>>;
}

pub struct WalletAuthorizer {
    nonces: NonceIssuer,
    siwe: Arc<dyn SiweVerifier>,
    users: Arc<dyn UserDirectory>,
    rpc_url: String,
    retry: RetryPolicy,
}

impl WalletAuthorizer {
    pub fn new(
        nonces: NonceIssuer,
        siwe: Arc<dyn SiweVerifier>,
        users: Arc<dyn UserDirectory>,
        rpc_url: impl Into<String>,
    ) -> Self {
        Self {
            nonces,
            siwe,
            users,
            rpc_url: rpc_url.into(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn nonces(&self) -> &NonceIssuer {
        &self.nonces
    }

    /// Authorize a wallet sign-in.
    ///
    /// Rate-limited SIWE checks and profile lookups are retried with backoff.
    /// A profile lookup that still fails yields an anonymous profile rather
    /// than refusing the sign-in.
    pub async fn authorize(&self, credentials: &WalletCredentials) -> Result<WalletUser, AuthError> {
        if !self
            .nonces
            .verify(&credentials.nonce, &credentials.signed_nonce)
        {
            tracing::warn!("wallet auth rejected: signed nonce mismatch");
            return Err(AuthError::InvalidNonce);
        }

        let payload: WalletAuthPayload = serde_json::from_str(&credentials.final_payload_json)
            .map_err(|e| AuthError::InvalidPayload(e.to_string()))?;

        let outcome = retry_with_backoff(self.retry, || {
            self.siwe.verify(&payload, &credentials.nonce, &self.rpc_url)
        })
        .await?;

        let address = match outcome.address {
            Some(address) if outcome.is_valid && !address.is_empty() => address,
            address => {
                tracing::warn!(is_valid = outcome.is_valid, ?address, "wallet auth rejected: invalid SIWE message");
                return Err(AuthError::InvalidSignature);
            }
        };

        let info = match retry_with_backoff(self.retry, || self.users.user_info(&payload.address)).await {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!(%address, "user lookup failed, continuing anonymously: {e}");
                UserInfo::anonymous(&payload.address)
            }
        };

        tracing::info!(%address, username = %info.username, "wallet authenticated");
        Ok(WalletUser {
            id: payload.address.clone(),
            info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    struct ScriptedSiwe {
        rate_limited_first: u32,
        valid: bool,
        calls: AtomicU32,
    }

    impl SiweVerifier for ScriptedSiwe {
        fn verify<'a>(
            &'a self,
            payload: &'a WalletAuthPayload,
            _nonce: &'a str,
            _rpc_url: &'a str,
        ) -> BoxFuture<'a, Result<SiweOutcome, AuthError>> {
            Box::pin(async move {
                let n = self.calls.fetch_add(1, Ordering::SeqCst);
                if n < self.rate_limited_first {
                    return Err(AuthError::RateLimited("429".into()));
                }
                Ok(SiweOutcome {
                    is_valid: self.valid,
                    address: Some(payload.address.clone()),
                })
            })
        }
    }

    struct Directory(Option<UserInfo>);

    impl UserDirectory for Directory {
        fn user_info<'a>(&'a self, _address: &'a str) -> BoxFuture<'a, Result<UserInfo, AuthError>> {
            Box::pin(async move {
                self.0
                    .clone()
                    .ok_or_else(|| AuthError::Upstream("directory down".into()))
            })
        }
    }

    const SECRET: &str = "hmac";

    fn authorizer(siwe: ScriptedSiwe, dir: Directory) -> WalletAuthorizer {
        WalletAuthorizer::new(NonceIssuer::new(SECRET), Arc::new(siwe), Arc::new(dir), "http://rpc")
            .with_retry(RetryPolicy::new(3, Duration::from_millis(1)))
    }

    fn credentials(issuer: &NonceIssuer) -> WalletCredentials {
        let issued = issuer.issue().unwrap();
        WalletCredentials {
            nonce: issued.nonce,
            signed_nonce: issued.signed_nonce,
            final_payload_json: r#"{"address":"0xabc","message":"m","signature":"s","version":1}"#.into(),
        }
    }

    fn siwe(rate_limited_first: u32, valid: bool) -> ScriptedSiwe {
        ScriptedSiwe {
            rate_limited_first,
            valid,
            calls: AtomicU32::new(0),
        }
    }

    #[tokio::test]
    async fn valid_sign_in_returns_profile() {
        let profile = UserInfo {
            wallet_address: "0xabc".into(),
            username: "alice".into(),
            profile_picture_url: "https://pic".into(),
        };
        let auth = authorizer(siwe(0, true), Directory(Some(profile.clone())));
        let user = auth.authorize(&credentials(auth.nonces())).await.unwrap();
        assert_eq!(user.id, "0xabc");
        assert_eq!(user.info, profile);
    }

    #[tokio::test]
    async fn tampered_nonce_is_rejected() {
        let auth = authorizer(siwe(0, true), Directory(None));
        let mut creds = credentials(auth.nonces());
        creds.nonce.push('x');
        assert!(matches!(
            auth.authorize(&creds).await,
            Err(AuthError::InvalidNonce)
        ));
    }

    #[tokio::test]
    async fn malformed_payload_is_rejected() {
        let auth = authorizer(siwe(0, true), Directory(None));
        let mut creds = credentials(auth.nonces());
        creds.final_payload_json = "{".into();
        assert!(matches!(
            auth.authorize(&creds).await,
            Err(AuthError::InvalidPayload(_))
        ));
    }

    #[tokio::test]
    async fn rate_limited_siwe_is_retried() {
        let auth = authorizer(siwe(2, true), Directory(None));
        let user = auth.authorize(&credentials(auth.nonces())).await.unwrap();
        assert_eq!(user.info, UserInfo::anonymous("0xabc"));
    }

    #[tokio::test]
    async fn invalid_signature_is_rejected() {
        let auth = authorizer(siwe(0, false), Directory(None));
        assert!(matches!(
            auth.authorize(&credentials(auth.nonces())).await,
            Err(AuthError::InvalidSignature)
        ));
    }

    #[tokio::test]
    async fn persistent_rate_limit_surfaces() {
        let auth = authorizer(siwe(10, true), Directory(None));
        assert!(matches!(
            auth.authorize(&credentials(auth.nonces())).await,
            Err(AuthError::RateLimited(_))
        ));
    }
}
