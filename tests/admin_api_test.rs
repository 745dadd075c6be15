//! Admin HTTP surface tests

use std::sync::Arc;

use actix_web::{App, test};

use yucca::startup::http::admin_routes;
use yucca_config::{SystemClock, VersionedConfigStore};
use yucca_docstore::EmbeddedDatastore;

#[actix_web::test]
async fn test_health_endpoint_reports_up() {
    let datastore = Arc::new(EmbeddedDatastore::new());
    let store = Arc::new(VersionedConfigStore::new(datastore, Arc::new(SystemClock)).await);

    let app = test::init_service(
        App::new().configure(move |cfg| admin_routes(cfg, store.clone())),
    )
    .await;

    let request = test::TestRequest::get().uri("/health").to_request();
    let response = test::call_service(&app, request).await;
    assert!(response.status().is_success());

    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["status"], "UP");
}
