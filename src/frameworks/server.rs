// Framework bootstrap for the game server runtime.

use crate::frameworks::config;
use crate::interface_adapters::clients::narrative::NarrativeClient;
use crate::interface_adapters::net::{create_session_handler, ws_handler};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{Narrator, SessionRegistry, SessionSettings, SystemClock};

use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::{io::Result, sync::Arc};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/sessions", post(create_session_handler))
        .with_state(state)
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state()?;
    let app = router(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([127, 0, 0, 1], config::http_port()));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn build_state() -> Result<Arc<AppState>> {
    let tuning = config::load_tuning().map_err(|e| {
        tracing::error!(error = %e, "invalid tuning file");
        std::io::Error::other(e.to_string())
    })?;

    let clock = Arc::new(SystemClock);
    let narrative_timeout = config::narrative_timeout();
    let narrative_client = NarrativeClient::new(
        config::narrative_service_url(),
        config::narrative_api_key(),
        narrative_timeout,
        clock.clone(),
    )
    .map_err(|e| std::io::Error::other(format!("failed to initialize narrative client: {e}")))?;
    tracing::debug!(
        configured = narrative_client.is_configured(),
        narrative_timeout_ms = narrative_timeout.as_millis(),
        "narrative client configured"
    );

    // This owns the set of active session world tasks.
    let session_registry = Arc::new(SessionRegistry::new(
        SessionSettings {
            input_channel_capacity: config::INPUT_CHANNEL_CAPACITY,
            world_broadcast_capacity: config::WORLD_BROADCAST_CAPACITY,
            tick_interval: config::TICK_INTERVAL,
            tuning,
            idle_timeout: config::SESSION_IDLE_TIMEOUT,
        },
        Narrator {
            service: Arc::new(narrative_client),
            clock,
        },
    ));

    Ok(Arc::new(AppState { session_registry }))
}
