//! Nullable action registry.

use futures_util::future::BoxFuture;
use petition_worldid::{ActionRecord, ActionRegistry, CreateActionRequest, WorldIdError};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// An [`ActionRegistry`] that records requests and answers locally.
#[derive(Default)]
pub struct NullActionRegistry {
    requests: Mutex<Vec<CreateActionRequest>>,
    failing: AtomicBool,
}

impl NullActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent registrations fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<CreateActionRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

impl ActionRegistry for NullActionRegistry {
    fn register<'a>(
        &'a self,
        request: &'a CreateActionRequest,
    ) -> BoxFuture<'a, Result<ActionRecord, WorldIdError>> {
        let n = match self.requests.lock() {
            Ok(mut requests) => {
                requests.push(request.clone());
                requests.len()
            }
            Err(_) => 0,
        };
        let failing = self.failing.load(Ordering::SeqCst);
        Box::pin(async move {
            if failing {
                return Err(WorldIdError::ActionCreationFailed {
                    status: 400,
                    detail: "null registry refusing".into(),
                });
            }
            Ok(ActionRecord {
                action: request.action.clone(),
                record: json!({
                    "id": format!("action_null_{n}"),
                    "action": request.action,
                    "max_verifications": request.max_verifications,
                }),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(action: &str) -> CreateActionRequest {
        CreateActionRequest {
            action: action.into(),
            description: "d".into(),
            max_verifications: 1,
            name: None,
        }
    }

    #[tokio::test]
    async fn hands_out_sequential_ids() {
        let r = NullActionRegistry::new();
        let first = r.register(&req("a")).await.unwrap();
        let second = r.register(&req("b")).await.unwrap();
        assert_eq!(first.action_id(), Some("action_null_1"));
        assert_eq!(second.action_id(), Some("action_null_2"));
        assert_eq!(r.call_count(), 2);
    }

    #[tokio::test]
    async fn can_be_made_to_fail() {
        let r = NullActionRegistry::new();
        r.set_failing(true);
        assert!(r.register(&req("a")).await.is_err());
        assert_eq!(r.requests()[0].action, "a");
    }
}
