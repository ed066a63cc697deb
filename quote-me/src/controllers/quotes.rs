//! Quotes REST API — read-only.
//!
//! There are no mutation endpoints; quotes are added, deleted and imported
//! through the CLI.

use actix_web::{web, HttpResponse, Responder};

use crate::server::AppState;

/// GET /api/quotes — every stored quote, insertion order, freshly re-read from disk
async fn list_quotes(state: web::Data<AppState>) -> impl Responder {
    // The reload is blocking file I/O, so it runs on the blocking pool
    let store = state.store.clone();
    let result = web::block(move || {
        let mut store = store.lock();
        store
            .reload()
            .map(|()| store.list().to_vec())
            .map_err(|e| format!("{}: {}", store.path().display(), e))
    })
    .await;

    match result {
        Ok(Ok(quotes)) => HttpResponse::Ok().json(quotes),
        Ok(Err(e)) => {
            log::error!("[API] Failed to reload quotes from {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to load quotes: {}", e)
            }))
        }
        Err(e) => {
            log::error!("[API] Quote reload task failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to load quotes"
            }))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/quotes").route(web::get().to(list_quotes)));
}
