use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use auth_cell::{ProfileSession, ThemePreferences};
use diagnosis_cell::DiagnosisClient;
use shared_config::AppConfig;
use shared_storage::{FileStore, KeyValueStore};
use symptom_checker_cell::SymptomCheckerState;

use crate::router::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SymptaCare API server");

    let config = AppConfig::from_env();

    // Local persisted state
    let store: Arc<dyn KeyValueStore> = Arc::new(
        FileStore::open(&config.storage_path)
            .await
            .with_context(|| format!("opening store at {}", config.storage_path.display()))?,
    );

    let session = Arc::new(
        ProfileSession::initialize(store.clone())
            .await
            .context("restoring profile")?,
    );
    let preferences = Arc::new(ThemePreferences::new(store));
    let diagnosis = Arc::new(DiagnosisClient::new(&config).context("building diagnosis client")?);

    let symptom_checker = SymptomCheckerState::new(diagnosis, &session).await;

    let state = AppState {
        session,
        preferences,
        symptom_checker,
    };

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router::create_router(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
