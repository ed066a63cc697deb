//! Presentation server for the `web` command.
//!
//! Read-only: serves the quotes as JSON under `/api`, plus either the built
//! front-end or, in dev mode, a pass-through proxy to the front-end dev
//! server. The store is re-read from disk on every `/api/quotes` and
//! `/api/health` request so quotes added from the CLI while the server runs
//! show up on refresh.

use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::controllers;
use crate::store::QuoteStore;

pub struct AppState {
    /// Shared handle to the one store opened at startup
    pub store: Arc<Mutex<QuoteStore>>,
    pub config: Config,
    /// Client used by the dev-mode proxy (redirects are passed through, not followed)
    pub http_client: reqwest::Client,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(store: QuoteStore, config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("Failed to build HTTP client for the dev proxy")?;

        Ok(Self {
            store: Arc::new(Mutex::new(store)),
            config,
            http_client,
            started_at: Instant::now(),
        })
    }
}

/// Serve index.html for client-side routes the static handler doesn't know
async fn spa_fallback(state: web::Data<AppState>) -> actix_web::Result<NamedFile> {
    let dir = state
        .config
        .static_dir()
        .ok_or_else(|| actix_web::error::ErrorNotFound("Not found"))?;
    Ok(NamedFile::open(dir.join("index.html"))?)
}

/// Register every route on an app. Shared by `run` and the controller tests.
pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    controllers::health::config_routes(cfg);
    controllers::quotes::config(cfg);

    if config.dev_mode {
        cfg.default_service(web::to(controllers::dev_proxy::proxy));
    } else if let Some(dir) = config.static_dir() {
        cfg.service(
            Files::new("/", dir)
                .index_file("index.html")
                .default_handler(web::to(spa_fallback)),
        );
    }
}

/// Run the web server until Ctrl+C
pub async fn run(store: QuoteStore, config: Config) -> anyhow::Result<()> {
    let port = config.port;

    log::info!(
        "Serving {} quotes from {}",
        store.len(),
        store.path().display()
    );
    if config.dev_mode {
        log::info!("Development mode: proxying to front-end dev server at {}", config.dev_server_url);
    } else if let Some(dir) = config.static_dir() {
        log::info!("Serving frontend from: {}", dir.display());
    } else {
        log::warn!("Frontend dist not found - static file serving disabled, only /api is available");
    }

    let state = web::Data::new(AppState::new(store, config)?);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        let config = state.config.clone();
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .wrap(cors)
            .configure(|cfg| configure(cfg, &config))
    })
    .bind(("0.0.0.0", port))
    .with_context(|| format!("Failed to bind port {}", port))?
    .run();

    log::info!("Server is running on http://localhost:{}", port);

    let server_handle = server.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Received Ctrl+C, shutting down...");
            server_handle.stop(true).await;
            log::info!("Shutdown complete");
        }
    });

    server.await.context("HTTP server error")
}
