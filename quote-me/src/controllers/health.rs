use actix_web::{web, HttpResponse, Responder};

use crate::server::AppState;

/// Version from Cargo.toml, available at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/health").route(web::get().to(health_check)));
    cfg.service(web::resource("/api/version").route(web::get().to(get_version)));
}

/// Count comes from a fresh read of the store file; if that read fails the
/// last loaded count is reported instead.
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store = state.store.clone();
    let quotes = web::block(move || {
        let mut store = store.lock();
        if let Err(e) = store.reload() {
            log::warn!("[HEALTH] Failed to reload quotes from {}: {}", store.path().display(), e);
        }
        store.len()
    })
    .await
    .unwrap_or_else(|e| {
        log::warn!("[HEALTH] Quote count task failed: {}", e);
        0
    });

    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": VERSION,
        "quotes": quotes,
        "uptime_secs": state.started_at.elapsed().as_secs(),
        "dev_mode": state.config.dev_mode
    }))
}

async fn get_version() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "version": VERSION
    }))
}
