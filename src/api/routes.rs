use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Users and recommendations
        .route("/users", get(handlers::list_users))
        .route(
            "/users/:user_id/recommendations",
            get(handlers::recommend),
        )
        // Place catalog
        .route("/places", get(handlers::list_places))
        .route("/places/:place_id", get(handlers::get_place))
        // Dataset maintenance
        .route("/ratings", post(handlers::add_ratings))
        .route("/reload", post(handlers::reload))
        .route("/stats", get(handlers::stats))
}
