//! Nullable wallet-auth collaborators.

use futures_util::future::BoxFuture;
use petition_auth::{AuthError, SiweOutcome, SiweVerifier, UserDirectory, UserInfo, WalletAuthPayload};
use std::collections::HashMap;
use std::sync::Mutex;

/// Accepts (or rejects) every SIWE message, echoing the payload's address.
pub struct NullSiweVerifier {
    valid: bool,
}

impl NullSiweVerifier {
    pub fn accepting() -> Self {
        Self { valid: true }
    }

    pub fn rejecting() -> Self {
        Self { valid: false }
    }
}

impl SiweVerifier for NullSiweVerifier {
    fn verify<'a>(
        &'a self,
        payload: &'a WalletAuthPayload,
        _nonce: &'a str,
        _rpc_url: &'a str,
    ) -> BoxFuture<'a, Result<SiweOutcome, AuthError>> {
        let outcome = SiweOutcome {
            is_valid: self.valid,
            address: Some(payload.address.clone()),
        };
        Box::pin(async move { Ok(outcome) })
    }
}

/// Profiles keyed by address; unknown addresses fail the lookup.
#[derive(Default)]
pub struct NullUserDirectory {
    users: Mutex<HashMap<String, UserInfo>>,
}

impl NullUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, info: UserInfo) {
        if let Ok(mut users) = self.users.lock() {
            users.insert(info.wallet_address.clone(), info);
        }
    }
}

impl UserDirectory for NullUserDirectory {
    fn user_info<'a>(&'a self, address: &'a str) -> BoxFuture<'a, Result<UserInfo, AuthError>> {
        let found = self
            .users
            .lock()
            .ok()
            .and_then(|users| users.get(address).cloned());
        Box::pin(async move { found.ok_or_else(|| AuthError::Upstream(format!("no profile for {address}"))) })
    }
}
