//! Wallet authentication for the mini-app.
//!
//! The handshake:
//! 1. The server issues a nonce and its HMAC ([`NonceIssuer`]).
//! 2. The wallet signs a SIWE message embedding the nonce.
//! 3. The client returns nonce, signed nonce and the wallet's payload;
//!    [`WalletAuthorizer`] checks the HMAC, delegates the signature check to a
//!    [`SiweVerifier`] and resolves the user's profile via a
//!    [`UserDirectory`].
//!
//! Signature recovery and session issuance belong to external collaborators
//! and are reached only through those traits.

pub mod authorizer;
pub mod error;
pub mod nonce;
pub mod types;

pub use authorizer::{SiweVerifier, UserDirectory, WalletAuthorizer};
pub use error::AuthError;
pub use nonce::{IssuedNonce, NonceIssuer};
pub use types::{SiweOutcome, UserInfo, WalletAuthPayload, WalletCredentials, WalletUser};
