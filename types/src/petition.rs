//! The petition record.

use crate::{PetitionId, Timestamp};
use serde::{Deserialize, Serialize};

/// A stored petition.
///
/// `id` and `created_at` never change once set. `signature_count` only moves
/// through [`Petition::record_signature`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Petition {
    pub id: PetitionId,
    pub title: String,
    pub description: String,
    pub signature_count: u64,
    pub created_at: Timestamp,
}

impl Petition {
    /// A fresh petition with no signatures.
    pub fn new(
        id: PetitionId,
        title: impl Into<String>,
        description: impl Into<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            signature_count: 0,
            created_at,
        }
    }

    /// Count one verified signature.
    pub fn record_signature(&mut self) {
        self.signature_count = self.signature_count.saturating_add(1);
    }
}
