//! Country Risk Gateway
//!
//! Serves the country catalog, the static risk category list and the
//! editable per-country risk assessments over JSON, plus the static
//! frontend.
//!
//! Usage:
//!   risk-gateway --data-dir data --static-dir frontend --port 5000

use anyhow::{Context, Result};
use axum::{
    routing::get,
    Json, Router,
};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use country_risk::{CountryCatalog, RiskStore, COUNTRIES_FILE, RISK_DATA_FILE};

mod error;
mod routes;

#[derive(Parser, Debug)]
#[command(
    name = "risk-gateway",
    about = "HTTP API for country risk assessments"
)]
struct Args {
    /// Directory holding the country catalog and risk data
    #[arg(long, env = "RISK_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Country catalog file name inside the data directory
    #[arg(long, default_value = COUNTRIES_FILE)]
    countries_file: String,

    /// Risk data file name inside the data directory
    #[arg(long, default_value = RISK_DATA_FILE)]
    risk_file: String,

    /// Directory served at `/`
    #[arg(long, env = "RISK_STATIC_DIR", default_value = "frontend")]
    static_dir: PathBuf,

    #[arg(long, env = "RISK_GATEWAY_HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(short, long, env = "RISK_GATEWAY_PORT", default_value_t = 5000)]
    port: u16,
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CountryCatalog>,
    pub store: Arc<RiskStore>,
}

impl AppState {
    pub fn new(catalog: CountryCatalog, store: RiskStore) -> Self {
        Self {
            catalog: Arc::new(catalog),
            store: Arc::new(store),
        }
    }
}

/// API routes under `/api`, health probe, and the static frontend as fallback
pub fn app(state: AppState, static_dir: &Path) -> Router {
    let api_routes = Router::new()
        .route("/countries", get(routes::list_countries))
        .route("/countries/:code", get(routes::get_country))
        .route(
            "/countries/:code/risk",
            get(routes::get_country_risk).post(routes::update_country_risk),
        )
        .route("/risk-categories", get(routes::list_risk_categories))
        .route("/search", get(routes::search_countries))
        .route("/stats", get(routes::get_stats))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "risk_gateway=debug,country_risk=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let catalog = CountryCatalog::load(args.data_dir.join(&args.countries_file))
        .context("loading country catalog")?;

    let risk_path = args.data_dir.join(&args.risk_file);
    RiskStore::initialize(&risk_path).context("initializing risk data")?;
    let store = RiskStore::open(&risk_path).context("opening risk data")?;

    let state = AppState::new(catalog, store);
    let orphaned = country_risk::RiskStats::compute(&state.catalog, &state.store.keys().await)
        .orphaned_assessments;
    if orphaned > 0 {
        tracing::warn!("   {} stored assessments do not match a catalog country", orphaned);
    }

    if !args.static_dir.exists() {
        tracing::warn!("   Static directory {} not found", args.static_dir.display());
    }
    let app = app(state, &args.static_dir);

    let addr = format!("{}:{}", args.host, args.port);
    tracing::info!("Country risk gateway starting on {}", addr);
    tracing::info!("   Data directory: {}", args.data_dir.display());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "risk-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
