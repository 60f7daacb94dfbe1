use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{Place, PlaceId, RatingObservation, RecommendedPlace, UserId},
    services::DatasetStats,
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub top_n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub user_id: UserId,
    pub top_n: usize,
    pub snapshot_version: u64,
    pub recommendations: Vec<RecommendedPlace>,
}

#[derive(Debug, Serialize)]
pub struct AddRatingsResponse {
    pub accepted: usize,
    pub version: u64,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub version: u64,
    pub built_at: DateTime<Utc>,
    pub users: usize,
    pub places: usize,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// List every user that has at least one rating
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserId>>> {
    let snapshot = state.snapshot().await?;
    Ok(Json(snapshot.matrix().users().collect()))
}

/// List the place catalog
pub async fn list_places(State(state): State<AppState>) -> Json<Vec<Place>> {
    let catalog = state.catalog().await;
    Json(catalog.sorted().into_iter().cloned().collect())
}

/// Get one place from the catalog
pub async fn get_place(
    State(state): State<AppState>,
    Path(place_id): Path<u32>,
) -> AppResult<Json<Place>> {
    let catalog = state.catalog().await;
    catalog
        .get(PlaceId(place_id))
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Place {} not found", place_id)))
}

/// Recommend unseen places for a user
///
/// An unknown user is not an error: the response simply carries no recommendations.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<u32>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let limits = state.limits;
    let top_n = params.top_n.unwrap_or(limits.default_top_n);
    if top_n == 0 || top_n > limits.max_top_n {
        return Err(AppError::InvalidInput(format!(
            "top_n must be between 1 and {}",
            limits.max_top_n
        )));
    }

    let user_id = UserId(user_id);
    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        top_n,
        "Processing recommendation request"
    );

    let snapshot = state.snapshot().await?;
    let recommendations = snapshot.recommend(user_id, top_n);
    let recommendations = state.catalog().await.join(&recommendations);

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        returned = recommendations.len(),
        snapshot_version = snapshot.version(),
        "Recommendations computed"
    );

    Ok(Json(RecommendationResponse {
        user_id,
        top_n,
        snapshot_version: snapshot.version(),
        recommendations,
    }))
}

/// Append rating observations
pub async fn add_ratings(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<Vec<RatingObservation>>, JsonRejection>,
) -> AppResult<(StatusCode, Json<AddRatingsResponse>)> {
    let Json(observations) = payload?;
    let accepted = observations.len();
    let version = state.add_ratings(observations).await?;

    tracing::info!(request_id = %request_id, accepted, version, "Ratings accepted");

    Ok((
        StatusCode::CREATED,
        Json(AddRatingsResponse { accepted, version }),
    ))
}

/// Reload the dataset from the configured source
pub async fn reload(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<ReloadResponse>> {
    tracing::info!(request_id = %request_id, "Processing reload request");

    let snapshot = state.reload().await?;
    let places = state.catalog().await.len();

    Ok(Json(ReloadResponse {
        version: snapshot.version(),
        built_at: snapshot.built_at(),
        users: snapshot.matrix().user_count(),
        places,
    }))
}

/// Dataset statistics for dashboards
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<DatasetStats>> {
    let snapshot = state.snapshot().await?;
    let inner = state.inner.read().await;

    Ok(Json(DatasetStats::compute(
        inner.ratings.observations(),
        snapshot.matrix(),
        &inner.catalog,
    )))
}
