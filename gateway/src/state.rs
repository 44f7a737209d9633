//! Shared state handed to every handler.

use petition_auth::{NonceIssuer, WalletAuthorizer};
use petition_crypto::{constant_time_eq, IdGenerator};
use petition_nullables::NullStore;
use petition_store::{PetitionFactory, PetitionStore};
use petition_store_json::JsonFileStore;
use petition_types::SystemClock;
use petition_worldid::{ActionRegistry, CloudActionRegistry, CloudVerifier, ProofVerifier, WorldIdClient};
use std::sync::Arc;
use std::time::Duration;

use crate::{GatewayConfig, GatewayError, GatewayMetrics, StoreBackend};

/// Everything the routes need, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PetitionStore>,
    pub verifier: Arc<dyn ProofVerifier>,
    pub actions: Arc<dyn ActionRegistry>,
    pub metrics: Arc<GatewayMetrics>,
    app_id: Option<String>,
    api_key: Option<String>,
    nonces: Option<NonceIssuer>,
    authorizer: Option<Arc<WalletAuthorizer>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn PetitionStore>,
        verifier: Arc<dyn ProofVerifier>,
        actions: Arc<dyn ActionRegistry>,
        metrics: Arc<GatewayMetrics>,
    ) -> Self {
        Self {
            store,
            verifier,
            actions,
            metrics,
            app_id: None,
            api_key: None,
            nonces: None,
            authorizer: None,
        }
    }

    /// Wire the production collaborators described by `config`.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let factory = PetitionFactory::new(
            IdGenerator::from_config(config.id_secret.as_deref()),
            Arc::new(SystemClock),
        );
        let store: Arc<dyn PetitionStore> = match config.store {
            StoreBackend::Json => Arc::new(JsonFileStore::open(config.data_file.clone(), factory)?),
            StoreBackend::Memory => Arc::new(NullStore::new(factory)),
        };

        let client = WorldIdClient::with_timeout(
            &config.world_id_base_url,
            Duration::from_secs(config.request_timeout_secs),
        );
        let app_id = config.app_id.clone().unwrap_or_default();
        let verifier = CloudVerifier::new(client.clone(), app_id.clone());
        let actions = CloudActionRegistry::new(
            client,
            app_id,
            config.upstream_api_key().unwrap_or_default(),
            config.action_api_version,
        );

        let mut state = Self::new(
            store,
            Arc::new(verifier),
            Arc::new(actions),
            Arc::new(GatewayMetrics::new()?),
        );
        state.app_id = config.app_id.clone().filter(|s| !s.is_empty());
        state.api_key = config.api_key.clone().filter(|s| !s.is_empty());
        state.nonces = config
            .hmac_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(NonceIssuer::new);
        Ok(state)
    }

    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_nonce_issuer(mut self, nonces: NonceIssuer) -> Self {
        self.nonces = Some(nonces);
        self
    }

    /// Enable `POST /auth/wallet`. Nonces are then issued with the
    /// authorizer's own key.
    pub fn with_authorizer(mut self, authorizer: Arc<WalletAuthorizer>) -> Self {
        self.authorizer = Some(authorizer);
        self
    }

    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }

    pub fn authorizer(&self) -> Option<&Arc<WalletAuthorizer>> {
        self.authorizer.as_ref()
    }

    pub fn nonce_issuer(&self) -> Option<&NonceIssuer> {
        match &self.authorizer {
            Some(authorizer) => Some(authorizer.nonces()),
            None => self.nonces.as_ref(),
        }
    }

    /// Whether `presented` matches the configured action API key. Always
    /// false when no key is configured.
    pub fn api_key_matches(&self, presented: &str) -> bool {
        match &self.api_key {
            Some(expected) => constant_time_eq(expected.as_bytes(), presented.as_bytes()),
            None => false,
        }
    }
}
