use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clinic_scheduler_api::{create_router, AppState};
use notification_cell::MailRelayNotifier;
use shared_config::AppConfig;
use shared_storage::JsonFileStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting clinic scheduler API server");

    let config = AppConfig::from_env();

    // Missing mail credentials are fatal before anything is served
    let notifier = MailRelayNotifier::new(&config).context("notifier configuration")?;

    let store = Arc::new(JsonFileStore::from_config(&config));
    info!("Using data directory {}", store.root().display());

    let state = AppState::build(&config, store, Arc::new(notifier))
        .await
        .context("loading scheduler state")?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await.context("binding listener")?;
    axum::serve(listener, app).await.context("serving requests")?;

    Ok(())
}
