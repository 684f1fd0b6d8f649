use axum::Json;

use attune_shared::types::HealthResponse;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(
        "attune-discovery",
        env!("CARGO_PKG_VERSION"),
    ))
}
