use crate::config::{EmailBackend, Settings};
use crate::error::AppError;
use crate::handlers;
use crate::middleware::allowed_hosts::require_allowed_host;
use crate::services::mailer::{ConsoleMailer, Mailer, MemoryMailer, Outbox, SmtpMailer};
use axum::{
    middleware,
    routing::{any, get},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state: read-only settings plus the mail transport.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub mailer: Arc<dyn Mailer>,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
    outbox: Option<Outbox>,
}

impl Application {
    /// Build the application with the given settings. Port 0 binds a
    /// random port for testing.
    pub async fn build(settings: Settings) -> Result<Self, AppError> {
        let (mailer, outbox): (Arc<dyn Mailer>, Option<Outbox>) = match settings.email.backend {
            EmailBackend::Smtp => {
                let mailer = SmtpMailer::new(&settings.email)
                    .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;
                tracing::info!(host = %settings.email.host, "SMTP mailer initialized");
                (Arc::new(mailer), None)
            }
            EmailBackend::Console => {
                tracing::info!("Console mailer initialized");
                (Arc::new(ConsoleMailer), None)
            }
            EmailBackend::Memory => {
                let mailer = MemoryMailer::new();
                let outbox = mailer.outbox();
                (Arc::new(mailer), Some(outbox))
            }
        };

        let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let state = AppState {
            settings: Arc::new(settings),
            mailer,
        };

        Ok(Self {
            port,
            listener,
            state,
            outbox,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The shared outbox, when the memory mail backend is active.
    pub fn outbox(&self) -> Option<Outbox> {
        self.outbox.clone()
    }

    /// Run the application until stopped or signalled.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);
        tracing::info!("Listening on port {}", self.port);
        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::index))
        .route("/healthz", get(handlers::health::healthz))
        .route("/deploy-test", get(handlers::deploy::deploy_test))
        // Any method: the handler owns method validation.
        .route(
            "/api/send-notification/",
            any(handlers::notification::send_notification),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_allowed_host,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
