use crate::domain::booking::{
    Booking, BookingPatch, BookingStatus, CancelBookingRequest, CreateBookingRequest,
    CreateBookingResponse, ErrorEnvelope,
};
use crate::http::middleware::auth::AuthedUser;
use crate::repo::bookings_repo::BookingListFilter;
use crate::service::booking_service::BookingError;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    pub status: Option<BookingStatus>,
    pub field_id: Option<i32>,
    pub date: Option<NaiveDate>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AdminBookingListQuery {
    pub status: Option<BookingStatus>,
    pub user_id: Option<Uuid>,
    pub field_id: Option<i32>,
    pub date: Option<NaiveDate>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub user_id: Option<Uuid>,
    pub field_id: Option<i32>,
}

pub async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Json(req): Json<CreateBookingRequest>,
) -> impl IntoResponse {
    if req.end_time <= req.start_time {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorEnvelope::new(
                "INVALID_TIME_RANGE",
                "end_time must be after start_time",
            )),
        )
            .into_response();
    }

    match state.booking_service.create(user.user_id, &req).await {
        Ok(booking) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "data": CreateBookingResponse {
                    booking_id: booking.id,
                    status: booking.status,
                    total_price: booking.total_price,
                    payment_due: booking.payment_due,
                }
            })),
        )
            .into_response(),
        Err(err) => booking_error_response(err),
    }
}

pub async fn list_my_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Query(query): Query<BookingListQuery>,
) -> impl IntoResponse {
    let filter = BookingListFilter {
        status: query.status,
        user_id: Some(user.user_id),
        field_id: query.field_id,
        date: query.date,
        page: query.page.unwrap_or(1).max(1),
        limit: query.limit.unwrap_or(10).clamp(1, MAX_PAGE_SIZE),
    };

    list_response(&state, filter).await
}

pub async fn get_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Path(booking_id): Path<String>,
) -> impl IntoResponse {
    match state.bookings_repo.fetch(&booking_id).await {
        Ok(Some(booking)) if booking.user_id == user.user_id || user.is_admin() => {
            (StatusCode::OK, Json(serde_json::json!({ "data": booking }))).into_response()
        }
        // Hide other users' bookings rather than acknowledging them.
        Ok(_) => booking_error_response(BookingError::NotFound),
        Err(err) => booking_error_response(BookingError::Internal(err)),
    }
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Path(booking_id): Path<String>,
    Json(req): Json<CancelBookingRequest>,
) -> impl IntoResponse {
    let owned = match state.bookings_repo.fetch(&booking_id).await {
        Ok(Some(booking)) => booking.user_id == user.user_id || user.is_admin(),
        Ok(None) => return booking_error_response(BookingError::NotFound),
        Err(err) => return booking_error_response(BookingError::Internal(err)),
    };
    if !owned {
        return booking_error_response(BookingError::NotFound);
    }

    match state
        .booking_service
        .cancel(&booking_id, user.user_id, req.reason.as_deref())
        .await
    {
        Ok(booking) => {
            (StatusCode::OK, Json(serde_json::json!({ "data": booking }))).into_response()
        }
        Err(err) => booking_error_response(err),
    }
}

pub async fn admin_list_bookings(
    State(state): State<AppState>,
    Query(query): Query<AdminBookingListQuery>,
) -> impl IntoResponse {
    let filter = BookingListFilter {
        status: query.status,
        user_id: query.user_id,
        field_id: query.field_id,
        date: query.date,
        page: query.page.unwrap_or(1).max(1),
        limit: query.limit.unwrap_or(10).clamp(1, MAX_PAGE_SIZE),
    };

    list_response(&state, filter).await
}

pub async fn admin_update_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
    Json(patch): Json<BookingPatch>,
) -> impl IntoResponse {
    match state.booking_service.update(&booking_id, &patch).await {
        Ok(booking) => {
            (StatusCode::OK, Json(serde_json::json!({ "data": booking }))).into_response()
        }
        Err(err) => booking_error_response(err),
    }
}

pub async fn admin_booking_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> impl IntoResponse {
    match state.bookings_repo.stats(query.user_id, query.field_id).await {
        Ok(stats) => (StatusCode::OK, Json(serde_json::json!({ "data": stats }))).into_response(),
        Err(err) => booking_error_response(BookingError::Internal(err)),
    }
}

async fn list_response(state: &AppState, filter: BookingListFilter) -> axum::response::Response {
    match state.bookings_repo.list(&filter).await {
        Ok((bookings, total)) => pagination_body(bookings, total, filter.page, filter.limit),
        Err(err) => booking_error_response(BookingError::Internal(err)),
    }
}

fn pagination_body(
    bookings: Vec<Booking>,
    total: i64,
    page: i64,
    limit: i64,
) -> axum::response::Response {
    let total_pages = if total == 0 { 0 } else { (total + limit - 1) / limit };
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "data": bookings,
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

fn booking_error_response(err: BookingError) -> axum::response::Response {
    let (status, code, message) = match &err {
        BookingError::FieldUnavailable => (
            StatusCode::NOT_FOUND,
            "FIELD_UNAVAILABLE",
            "field not found or inactive",
        ),
        BookingError::SlotConflict => (
            StatusCode::CONFLICT,
            "SLOT_CONFLICT",
            "selected time slot is not available",
        ),
        BookingError::NotFound => (StatusCode::NOT_FOUND, "BOOKING_NOT_FOUND", "booking not found"),
        BookingError::NotCancellable => (
            StatusCode::CONFLICT,
            "BOOKING_NOT_CANCELLABLE",
            "booking cannot be cancelled in its current status",
        ),
        BookingError::InvalidTimeRange => (
            StatusCode::BAD_REQUEST,
            "INVALID_TIME_RANGE",
            "end_time must be after start_time",
        ),
        BookingError::Internal(inner) => {
            tracing::error!("booking operation failed: {}", inner);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "something went wrong, try again later",
            )
        }
    };

    (status, Json(ErrorEnvelope::new(code, message))).into_response()
}
