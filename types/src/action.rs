//! World ID action names used by the petition flows.

use crate::PetitionId;

/// Action every creator proves against before a petition is stored.
pub const CREATE_PETITION_ACTION: &str = "create-petition";

/// Prefix of the per-petition signing action.
pub const SIGN_ACTION_PREFIX: &str = "sign-petition-";

/// Name of the action a signer must verify against for `id`.
pub fn sign_action_name(id: &PetitionId) -> String {
    format!("{SIGN_ACTION_PREFIX}{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_action_embeds_id() {
        let id = PetitionId::new("42").unwrap();
        assert_eq!(sign_action_name(&id), "sign-petition-42");
    }
}
