use crate::domain::booking::ErrorEnvelope;
use crate::domain::field::{CreateFieldRequest, FieldListQuery, FieldPatch};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

const MAX_PAGE_SIZE: i64 = 100;

pub async fn list_fields(
    State(state): State<AppState>,
    Query(query): Query<FieldListQuery>,
) -> impl IntoResponse {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, MAX_PAGE_SIZE);

    match state
        .fields_repo
        .list_active(
            query.price_min,
            query.price_max,
            query.sport_type.as_deref(),
            page,
            limit,
        )
        .await
    {
        Ok((fields, total)) => {
            let total_pages = if total == 0 { 0 } else { (total + limit - 1) / limit };
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "data": fields,
                    "pagination": {
                        "total_results": total,
                        "current_page": page,
                        "total_pages": total_pages,
                        "limit": limit,
                    }
                })),
            )
                .into_response()
        }
        Err(err) => internal(err),
    }
}

pub async fn get_field(
    State(state): State<AppState>,
    Path(field_id): Path<i32>,
) -> impl IntoResponse {
    match state.fields_repo.get_active(field_id).await {
        Ok(Some(field)) => {
            (StatusCode::OK, Json(serde_json::json!({ "data": field }))).into_response()
        }
        Ok(None) => not_found(),
        Err(err) => internal(err),
    }
}

pub async fn create_field(
    State(state): State<AppState>,
    Json(req): Json<CreateFieldRequest>,
) -> impl IntoResponse {
    if req.price_per_hour <= 0.0 {
        return bad_price();
    }

    match state.fields_repo.create(&req).await {
        Ok(field) => {
            (StatusCode::CREATED, Json(serde_json::json!({ "data": field }))).into_response()
        }
        Err(err) => internal(err),
    }
}

pub async fn update_field(
    State(state): State<AppState>,
    Path(field_id): Path<i32>,
    Json(patch): Json<FieldPatch>,
) -> impl IntoResponse {
    if matches!(patch.price_per_hour, Some(p) if p <= 0.0) {
        return bad_price();
    }

    match state.fields_repo.apply_patch(field_id, &patch).await {
        Ok(Some(field)) => {
            (StatusCode::OK, Json(serde_json::json!({ "data": field }))).into_response()
        }
        Ok(None) => not_found(),
        Err(err) => internal(err),
    }
}

pub async fn deactivate_field(
    State(state): State<AppState>,
    Path(field_id): Path<i32>,
) -> impl IntoResponse {
    match state.fields_repo.deactivate(field_id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(serde_json::json!({ "data": { "deactivated": true } })),
        )
            .into_response(),
        Ok(false) => not_found(),
        Err(err) => internal(err),
    }
}

fn not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorEnvelope::new("FIELD_NOT_FOUND", "field not found")),
    )
        .into_response()
}

fn bad_price() -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorEnvelope::new(
            "INVALID_PRICE",
            "price_per_hour must be greater than zero",
        )),
    )
        .into_response()
}

fn internal(err: anyhow::Error) -> axum::response::Response {
    tracing::error!("field operation failed: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorEnvelope::new(
            "INTERNAL_ERROR",
            "something went wrong, try again later",
        )),
    )
        .into_response()
}
