//! Resource Viewer Server
//!
//! Hosts one content browser session over HTTP: the resource list, the
//! active selection and the last drawn page are exposed as JSON, and
//! navigation runs through browser commands.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use resource_viewer::browser::ContentBrowser;
use resource_viewer::config::Config;
use resource_viewer::document::PdfOpener;
use resource_viewer::fetch::Fetcher;
use resource_viewer::loader::ResourceLoader;
use resource_viewer::manifest::LocationManifest;
use resource_viewer::routes;
use resource_viewer::shell::run_event_pump;
use resource_viewer::state::AppState;
use resource_viewer::storage::{KeyValueStore, MemoryStore, SqliteStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "resource_viewer=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        Config::default()
    });

    tracing::info!("Starting Resource Viewer v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Manifest: {}", config.browser.manifest_location);

    // Counters survive restarts when the database is reachable
    let store: Arc<dyn KeyValueStore> = match SqliteStore::connect(&config.database.url).await {
        Ok(store) => {
            tracing::info!("Counter store at {}", config.database.url);
            Arc::new(store)
        }
        Err(e) => {
            tracing::warn!("Database unavailable ({}), counters kept in memory", e);
            Arc::new(MemoryStore::new())
        }
    };

    let fetcher = Fetcher::new(config.loader.local_root.clone());
    let loader = ResourceLoader::new(
        Arc::new(PdfOpener::new(fetcher.clone())),
        config.loader.clone(),
    );
    let manifest = Arc::new(LocationManifest::new(
        fetcher,
        config.browser.manifest_location.clone(),
        config.browser.manifest_timeout,
    ));

    let (browser, events) =
        ContentBrowser::new(config.browser.clone(), loader.clone(), manifest, store);
    let app_state = AppState::new(browser.clone(), loader.clone());

    let pump = tokio::spawn(run_event_pump(app_state.clone(), events));

    let initial = browser.init().await;
    tracing::info!("Browser ready: {:?}", initial);
    loader.preload(&browser.full_list().await);

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server address")?;
    tracing::info!("Resource Viewer listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pump.abort();
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
