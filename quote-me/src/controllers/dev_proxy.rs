//! Dev-mode pass-through to the front-end dev server.
//!
//! When `QUOTE_ME_DEV` is set, every request that is not an `/api` route is
//! forwarded to `QUOTE_ME_DEV_SERVER_URL`, preserving method, body, status
//! code and content headers. WebSocket upgrades (hot reload) are not proxied.

use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};

use crate::server::AppState;

/// Headers to forward from the browser to the dev server.
const FORWARD_REQUEST_HEADERS: &[&str] = &[
    "accept",
    "accept-language",
    "cache-control",
    "content-type",
    "if-modified-since",
    "if-none-match",
    "user-agent",
];

/// Headers to forward from the dev server response back to the browser.
const FORWARD_RESPONSE_HEADERS: &[&str] = &[
    "cache-control",
    "content-type",
    "etag",
    "last-modified",
    "location",
];

/// Whether a header name should be forwarded (exact match or x-* prefix).
fn should_forward_request_header(name: &str) -> bool {
    let lower = name.to_lowercase();
    FORWARD_REQUEST_HEADERS.contains(&lower.as_str()) || lower.starts_with("x-")
}

fn should_forward_response_header(name: &str) -> bool {
    let lower = name.to_lowercase();
    FORWARD_RESPONSE_HEADERS.contains(&lower.as_str()) || lower.starts_with("x-")
}

fn target_url(base: &str, req: &HttpRequest) -> String {
    let path = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// {any} /{path:.*} — forward to the dev server
pub async fn proxy(state: web::Data<AppState>, req: HttpRequest, body: web::Bytes) -> HttpResponse {
    let target = target_url(&state.config.dev_server_url, &req);

    let method = match reqwest::Method::from_bytes(req.method().as_str().as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            return HttpResponse::MethodNotAllowed().json(serde_json::json!({
                "error": format!("Unsupported method {}", req.method())
            }));
        }
    };

    let mut upstream = state.http_client.request(method, &target);
    for (key, value) in req.headers() {
        if should_forward_request_header(key.as_str()) {
            if let Ok(v) = value.to_str() {
                upstream = upstream.header(key.as_str(), v);
            }
        }
    }

    let proxy_resp = match upstream.body(body.to_vec()).send().await {
        Ok(r) => r,
        Err(e) => {
            log::error!("[DEV] Proxy error for {}: {}", target, e);
            return HttpResponse::BadGateway().json(serde_json::json!({
                "error": format!("Failed to reach front-end dev server: {}", e)
            }));
        }
    };

    let status = StatusCode::from_u16(proxy_resp.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut response = HttpResponse::build(status);

    for (key, value) in proxy_resp.headers() {
        if should_forward_response_header(key.as_str()) {
            if let Ok(v) = value.to_str() {
                response.insert_header((key.as_str(), v));
            }
        }
    }

    match proxy_resp.bytes().await {
        Ok(bytes) => response.body(bytes.to_vec()),
        Err(e) => {
            log::error!("[DEV] Failed to read dev server response for {}: {}", target, e);
            HttpResponse::BadGateway().json(serde_json::json!({
                "error": format!("Failed to read dev server response: {}", e)
            }))
        }
    }
}
