//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;

use crate::application::services::{EventProcessor, RandomSampling, SamplingPolicy, StatsService};
use crate::config::Settings;
use crate::infrastructure::broadcast::BroadcastHub;
use crate::infrastructure::registry::SessionRegistry;
use crate::presentation::http::{handlers::health, routes};
use crate::presentation::middleware::{cors, logging};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
    pub hub: Arc<BroadcastHub>,
    pub processor: Arc<EventProcessor>,
    pub stats: StatsService,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Wire up the in-memory core. `sampling` decides when events raise alerts.
    pub fn new(settings: Settings, sampling: Arc<dyn SamplingPolicy>) -> Self {
        let registry = Arc::new(SessionRegistry::new());
        let hub = Arc::new(BroadcastHub::new(settings.websocket.outgoing_queue_capacity));
        let processor = Arc::new(EventProcessor::new(
            registry.clone(),
            hub.clone(),
            sampling,
            settings.sampling.recent_window_secs,
        ));
        let stats = StatsService::new(registry.clone());

        Self {
            registry,
            hub,
            processor,
            stats,
            settings: Arc::new(settings),
        }
    }
}

/// Full router with tracing and CORS layers
pub fn build_router(state: AppState) -> Router {
    let cors = cors::create_cors_layer(&state.settings.cors);
    routes::create_router(state)
        .layer(logging::create_trace_layer())
        .layer(cors)
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
    state: AppState,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        let sampling = Arc::new(RandomSampling::from_settings(&settings.sampling));
        tracing::info!(
            probability = sampling.probability(),
            window_secs = settings.sampling.recent_window_secs,
            "Alert sampling configured"
        );

        Self::build_with_sampling(settings, sampling).await
    }

    /// Build the application with a custom sampling policy
    pub async fn build_with_sampling(
        settings: Settings,
        sampling: Arc<dyn SamplingPolicy>,
    ) -> Result<Self> {
        health::init_server_start();

        let addr = settings.server_addr();
        let state = AppState::new(settings, sampling);
        let router = build_router(state.clone());

        // Bind to address
        let listener = TcpListener::bind(&addr).await?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self {
            listener,
            router,
            state,
        })
    }

    /// Run the server until Ctrl-C or SIGTERM
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Shared state behind the router
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
