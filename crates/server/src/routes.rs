use axum::{
    routing::{get, patch},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod branches;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: health, Swagger UI and the branch API.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/api/v1/branches", get(branches::list).post(branches::create))
        .route(
            "/api/v1/branches/:id",
            get(branches::get).put(branches::update).delete(branches::delete),
        )
        .route("/api/v1/branches/:id/phone", patch(branches::update_phone))
        .route(
            "/api/v1/branches/:id/holidays",
            get(branches::list_holidays).post(branches::add_holiday),
        )
        // `check` also matches the DELETE-by-date shape; reject it as a bad date
        .route(
            "/api/v1/branches/:id/holidays/check",
            get(branches::check_holiday).delete(branches::delete_holiday_check),
        )
        .route(
            "/api/v1/branches/:id/holidays/:date",
            axum::routing::delete(branches::delete_holiday),
        )
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
