//! Opaque petition identifier.

use crate::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a stored petition.
///
/// Ids minted by this workspace are 64 lowercase hex characters (an
/// HMAC-SHA256 digest). Parsing is deliberately looser: any non-empty string
/// without whitespace is accepted so that files written with shorter random
/// ids still load.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PetitionId(String);

impl PetitionId {
    /// Length of ids produced by the id generator.
    pub const GENERATED_LEN: usize = 64;

    pub fn new(id: impl Into<String>) -> Result<Self, TypesError> {
        let id = id.into();
        if id.is_empty() {
            return Err(TypesError::EmptyId);
        }
        if id.chars().any(char::is_whitespace) {
            return Err(TypesError::InvalidId(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this id has the shape of a generated id (64 lowercase hex).
    pub fn is_generated_form(&self) -> bool {
        self.0.len() == Self::GENERATED_LEN
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }
}

impl TryFrom<String> for PetitionId {
    type Error = TypesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PetitionId> for String {
    fn from(id: PetitionId) -> Self {
        id.0
    }
}

impl FromStr for PetitionId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for PetitionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PetitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(8).collect();
        write!(f, "PetitionId({prefix})")
    }
}

impl fmt::Display for PetitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
