use actix_web::{HttpResponse, Responder, get};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthCheckResponse {
    #[schema(example = true)]
    pub ok: bool,
}

#[utoipa::path(
    summary = "Check API health",
    description = "Returns ok when the API process is up. Does not touch the database.",
    responses(
        (status = 200, description = "API is healthy", body = HealthCheckResponse),
    ),
    tag = "Health"
)]
#[get("/api/health")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthCheckResponse { ok: true })
}
