//! Translator Gateway Web - Web front end for the translation gateway.

mod helpers;
mod identity;
mod routes;
mod state;
mod templates;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, header},
    routing::{get, post},
};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir,
    set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use translator_gateway_core::{AppConfig, Database, TranslationGateway};

use state::AppState;

/// Request bodies are short texts; batches stay well below this.
const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Resolve the static files directory.
///
/// Priority:
/// 1. Explicit path if provided
/// 2. ./static if it exists
/// 3. Crate's built-in static directory
fn resolve_static_dir(explicit_path: Option<&str>) -> PathBuf {
    if let Some(path) = explicit_path {
        return PathBuf::from(path);
    }

    let local_static = PathBuf::from("static");
    if local_static.is_dir() {
        return local_static;
    }

    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}

#[derive(Parser, Debug)]
#[command(name = "translator-gateway-web")]
#[command(author, version, about = "Translator Gateway Web Server", long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Configuration file (defaults to the user config dir, then ./config.toml)
    #[arg(short, long, env = "TRANSLATOR_GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// History store directory
    #[arg(long, env = "HISTORY_PATH")]
    history: Option<PathBuf>,

    /// Translation API base URL
    #[arg(long, env = "TRANSLATE_API_BASE")]
    api_base: Option<String>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Static files directory (defaults to ./static or crate's static dir)
    #[arg(long, env = "STATIC_DIR")]
    static_dir: Option<String>,
}

impl Args {
    fn load_config(&self) -> Result<AppConfig> {
        let mut config = match self.config {
            Some(ref path) => AppConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => AppConfig::load(),
        };

        if let Some(ref path) = self.history {
            config.history.path = Some(path.clone());
        }
        if let Some(ref api_base) = self.api_base {
            config.provider.api_base.clone_from(api_base);
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

/// Build the application router.
fn app(state: Arc<AppState>, static_dir: PathBuf) -> Router {
    Router::new()
        // Pages
        .route("/", get(routes::index))
        .route("/languages/", get(routes::languages_page))
        .route("/history/", get(routes::history_page))
        // JSON endpoints
        .route("/translate/", post(routes::translate))
        .route("/translate/batch/", post(routes::translate_batch))
        .route("/detect/", post(routes::detect))
        // Form endpoints
        .route("/delete/{id}/", post(routes::delete_translation))
        // Static files with Cache-Control: no-cache (cache but always revalidate via ETag)
        .nest_service(
            "/static",
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("no-cache"),
                ))
                .service(ServeDir::new(static_dir)),
        )
        // Middleware
        // Translations and history are per-user; never let them be cached
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, max-age=0"),
        ))
        .layer(CompressionLayer::new())
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{default_level},sled=warn,hyper=warn")));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let config = args.load_config()?;

    // The gateway is the one fatal dependency: no provider, no service
    let gateway =
        TranslationGateway::from_config(&config).context("Failed to initialize translation gateway")?;

    let history_path = config.history.resolved_path();
    let db = Database::open(&history_path)
        .with_context(|| format!("Failed to open history store at {}", history_path.display()))?;
    info!("History store at {}", history_path.display());

    let state = Arc::new(
        AppState::new(gateway, &db, config).context("Failed to initialize application state")?,
    );

    let app = app(state, resolve_static_dir(args.static_dir.as_deref()));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
