use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use coach_api::config::Config;
use coach_api::db::create_pool;
use coach_api::export::HttpRenderExporter;
use coach_api::generation::AiClient;
use coach_api::routes::build_router;
use coach_api::state::AppState;
use coach_api::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("coach_api={}", &config.rust_log))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting coach API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let pool = create_pool(&config.database_url).await?;
    let store = Arc::new(PgStore::new(pool));

    // Initialize the AI generation client
    let generator = Arc::new(AiClient::new(
        config.anthropic_api_key.clone(),
        config.generation_model.clone(),
    )?);
    info!("AI client initialized (model: {})", generator.model());

    // Initialize the document-render collaborator
    let exporter = Arc::new(HttpRenderExporter::new(config.render_endpoint.clone())?);
    info!("Render exporter initialized ({})", config.render_endpoint);

    // Build app state
    let state = AppState {
        store,
        generator,
        exporter,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
