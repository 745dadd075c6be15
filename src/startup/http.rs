//! Admin HTTP surface
//!
//! Serves the liveness endpoint off the store's health check. The config
//! API itself is exposed by the gRPC shell deployed next to this binary.

use std::sync::Arc;

use actix_web::{App, HttpResponse, HttpServer, web};
use serde_json::json;

use yucca_config::VersionedConfigStore;

/// Mount the admin routes on an actix app.
pub fn admin_routes(
    cfg: &mut web::ServiceConfig,
    store: Arc<VersionedConfigStore>,
) {
    cfg.app_data(web::Data::new(store))
        .route("/health", web::get().to(health));
}

async fn health(store: web::Data<Arc<VersionedConfigStore>>) -> HttpResponse {
    if store.health_check().await {
        HttpResponse::Ok().json(json!({"status": "UP"}))
    } else {
        HttpResponse::ServiceUnavailable().json(json!({"status": "DOWN"}))
    }
}

/// Run the admin server until shutdown.
pub async fn serve_admin(store: Arc<VersionedConfigStore>, port: u16) -> std::io::Result<()> {
    tracing::info!(port, "admin server listening");
    HttpServer::new(move || {
        let store = store.clone();
        App::new().configure(move |cfg| admin_routes(cfg, store))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
