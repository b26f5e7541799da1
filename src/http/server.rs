//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the policy engine (store, hasher, authenticator, lockout guard)
//! - Create the Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit, headers)
//! - Serve until the shutdown signal, alongside the lockout pruner

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::Request,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::access::Role;
use crate::auth::{Authenticator, CredentialHasher, PasswordPolicy};
use crate::config::PortalConfig;
use crate::error::PortalError;
use crate::http::handlers;
use crate::http::request::{request_id, UuidRequestId, X_REQUEST_ID};
use crate::lockout::LockoutGuard;
use crate::security::headers;
use crate::store::CredentialStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub authenticator: Arc<Authenticator>,
    pub lockout: Arc<LockoutGuard>,
    /// Role given to self-registered users.
    pub default_role: Role,
}

/// HTTP server for the employee portal.
pub struct HttpServer {
    router: Router,
    config: PortalConfig,
    state: AppState,
}

impl HttpServer {
    /// Load credentials from the configured source and build the server.
    pub fn new(config: PortalConfig) -> Result<Self, PortalError> {
        let store = CredentialStore::load(&config.credentials.path, config.credentials.persist);
        Self::with_store(config, Arc::new(store))
    }

    /// Build the server around an already-populated store.
    pub fn with_store(config: PortalConfig, store: Arc<CredentialStore>) -> Result<Self, PortalError> {
        let default_role: Role = config
            .credentials
            .default_role
            .parse()
            .map_err(|e| PortalError::Config(format!("credentials.default_role: {}", e)))?;

        let hasher = CredentialHasher::new(&config.hashing)?;
        let policy = PasswordPolicy::from(&config.password_policy);
        let authenticator = Arc::new(Authenticator::new(store, hasher, policy)?);
        let lockout = Arc::new(LockoutGuard::from_config(&config.lockout));

        let state = AppState {
            authenticator,
            lockout,
            default_role,
        };

        let router = Self::build_router(&config, state.clone());
        Ok(Self {
            router,
            config,
            state,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &PortalConfig, state: AppState) -> Router {
        let router = Router::new()
            .route("/", get(handlers::login_form).post(handlers::login_submit))
            .route("/new_user", get(handlers::new_user_form).post(handlers::new_user_submit))
            .route("/menu/{username}", get(handlers::menu))
            .route("/menu_option/{username}/{choice}", get(handlers::menu_option))
            .route("/exit", get(handlers::exit))
            .route("/health", get(handlers::health))
            .with_state(state);

        let router = if config.security.enable_headers {
            headers::apply(router)
        } else {
            router
        };

        router
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id(request),
                )
            }))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            employees = self.state.authenticator.store().len(),
            "HTTP server starting"
        );

        let pruner = tokio::spawn(self.state.lockout.clone().run_pruner(
            Duration::from_secs(self.config.lockout.prune_interval_secs),
            shutdown.resubscribe(),
        ));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        let _ = pruner.await;
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for in-process requests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }
}
