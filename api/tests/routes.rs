use actix_web::web::Data;
use actix_web::{App, test};
use scikgdash_api::routes::health_check::health_check;
use scikgdash_api::routes::statements::read_statements;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

/// Builds a pool that never connects.
///
/// Requests that fail parameter validation return before touching the pool,
/// so these tests run without a database.
fn lazy_pool() -> PgPool {
    let options = PgConnectOptions::new_without_pgpass()
        .host("localhost")
        .username("postgres");

    PgPoolOptions::new().connect_lazy_with(options)
}

#[actix_web::test]
async fn health_check_returns_ok() {
    let app =
        test::init_service(App::new().app_data(Data::new(lazy_pool())).service(health_check))
            .await;

    let request = test::TestRequest::get().uri("/api/health").to_request();
    let response = test::call_service(&app, request).await;

    assert!(response.status().is_success());

    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body, serde_json::json!({ "ok": true }));
}

#[actix_web::test]
async fn zero_page_size_is_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(Data::new(lazy_pool()))
            .service(read_statements),
    )
    .await;

    let request = test::TestRequest::get()
        .uri("/api/statements?size=0")
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status().as_u16(), 400);

    let body: serde_json::Value = test::read_body_json(response).await;
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("`size` must be between 1 and 5000")
    );
}

#[actix_web::test]
async fn oversized_page_size_is_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(Data::new(lazy_pool()))
            .service(read_statements),
    )
    .await;

    let request = test::TestRequest::get()
        .uri("/api/statements?size=5001")
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status().as_u16(), 400);
}

#[actix_web::test]
async fn negative_page_is_rejected_at_the_boundary() {
    let app = test::init_service(
        App::new()
            .app_data(Data::new(lazy_pool()))
            .service(read_statements),
    )
    .await;

    let request = test::TestRequest::get()
        .uri("/api/statements?page=-1")
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status().as_u16(), 400);
}
