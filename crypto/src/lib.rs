//! Cryptographic helpers for the petitions service.
//!
//! - **HMAC-SHA256** over OS randomness for petition ids
//! - **HMAC-SHA256** nonce signing for the wallet-auth handshake
//! - **Keccak-256** signal hashing compatible with World ID's `hashToField`
//! - constant-time comparison of shared secrets

pub mod error;
pub mod id;
pub mod nonce;
pub mod secret;
pub mod signal;

pub use error::CryptoError;
pub use id::{IdGenerator, FALLBACK_ID_SECRET};
pub use nonce::{generate_nonce, hash_nonce, verify_signed_nonce, NONCE_LEN};
pub use secret::constant_time_eq;
pub use signal::hash_to_field;
