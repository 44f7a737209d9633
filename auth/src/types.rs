//! Wallet-auth wire types.

use serde::{Deserialize, Serialize};

/// What the client submits to sign in.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletCredentials {
    pub nonce: String,
    pub signed_nonce: String,
    /// The wallet's auth payload, JSON encoded.
    pub final_payload_json: String,
}

/// Successful result of the in-app wallet-auth command.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct WalletAuthPayload {
    pub address: String,
    pub message: String,
    pub signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

/// Verdict of the SIWE check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiweOutcome {
    pub is_valid: bool,
    /// Address recovered from the signed message.
    pub address: Option<String>,
}

/// Public profile of a wallet.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub wallet_address: String,
    pub username: String,
    pub profile_picture_url: String,
}

impl UserInfo {
    /// Profile used when the directory cannot be reached.
    pub fn anonymous(address: &str) -> Self {
        Self {
            wallet_address: address.to_string(),
            username: "Anonymous".to_string(),
            profile_picture_url: String::new(),
        }
    }
}

/// An authenticated user.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WalletUser {
    pub id: String,
    #[serde(flatten)]
    pub info: UserInfo,
}
