//! Axum HTTP server.

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers;
use crate::{AppState, GatewayConfig, GatewayError, ShutdownController};

/// Build the router over `state`.
///
/// `POST /auth/wallet` exists only when the state carries a wallet
/// authorizer; `GET /metrics` only when `enable_metrics` is set.
pub fn router(state: AppState, enable_metrics: bool) -> Router {
    let mut app = Router::new()
        .route(
            "/petitions",
            get(handlers::list_petitions)
                .post(handlers::create_petition)
                .put(handlers::sign_petition),
        )
        .route("/verify-proof", post(handlers::verify_proof))
        .route("/actions", post(handlers::create_action))
        .route("/auth/nonce", get(handlers::issue_nonce))
        .route("/health", get(handlers::health));

    if state.authorizer().is_some() {
        app = app.route("/auth/wallet", post(handlers::wallet_login));
    }
    if enable_metrics {
        app = app.route("/metrics", get(handlers::metrics));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// The gateway, configured with a listen address and shared state.
pub struct GatewayServer {
    pub addr: String,
    pub state: AppState,
    pub enable_metrics: bool,
}

impl GatewayServer {
    pub fn new(addr: impl Into<String>, state: AppState) -> Self {
        Self {
            addr: addr.into(),
            state,
            enable_metrics: false,
        }
    }

    /// Wire production collaborators from `config`.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            addr: config.listen_addr(),
            state: AppState::from_config(config)?,
            enable_metrics: config.enable_metrics,
        })
    }

    /// Bind and serve until `shutdown` fires.
    pub async fn start(self, shutdown: &ShutdownController) -> Result<(), GatewayError> {
        let listener = TcpListener::bind(&self.addr).await?;
        info!(addr = %listener.local_addr()?, "gateway listening");
        self.serve(listener, shutdown.subscribe()).await
    }

    /// Serve on an already bound listener. In-flight requests finish before
    /// this returns.
    pub async fn serve(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), GatewayError> {
        let app = router(self.state, self.enable_metrics);
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;
        info!("gateway stopped");
        Ok(())
    }
}
