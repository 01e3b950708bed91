use crate::domain::booking::ErrorEnvelope;
use crate::http::middleware::auth::AuthedUser;
use crate::repo::users_repo::UserRecord;
use crate::service::auth_service::AuthError;
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for UserView {
    fn from(user: UserRecord) -> Self {
        UserView {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    if req.name.trim().is_empty() || req.email.trim().is_empty() || req.password.len() < 8 {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorEnvelope::new(
                "INVALID_REQUEST",
                "name and email are required; password must be at least 8 characters",
            )),
        )
            .into_response();
    }

    match state
        .auth_service
        .register(req.name.trim(), req.email.trim(), &req.password)
        .await
    {
        Ok(user) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "data": UserView::from(user) })),
        )
            .into_response(),
        Err(err) => auth_error_response(err),
    }
}

pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> impl IntoResponse {
    match state.auth_service.login(req.email.trim(), &req.password).await {
        Ok((user, pair)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "data": {
                    "access_token": pair.access_token,
                    "refresh_token": pair.refresh_token,
                    "user": UserView::from(user),
                }
            })),
        )
            .into_response(),
        Err(err) => auth_error_response(err),
    }
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> impl IntoResponse {
    match state.auth_service.refresh(&req.refresh_token).await {
        Ok(pair) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "data": {
                    "access_token": pair.access_token,
                    "refresh_token": pair.refresh_token,
                }
            })),
        )
            .into_response(),
        Err(err) => auth_error_response(err),
    }
}

pub async fn profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
) -> impl IntoResponse {
    match state.users_repo.fetch(user.user_id).await {
        Ok(Some(record)) => (
            StatusCode::OK,
            Json(serde_json::json!({ "data": UserView::from(record) })),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorEnvelope::new("USER_NOT_FOUND", "user not found")),
        )
            .into_response(),
        Err(err) => auth_error_response(AuthError::Internal(err)),
    }
}

fn auth_error_response(err: AuthError) -> axum::response::Response {
    let (status, code, message) = match &err {
        AuthError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            "INVALID_CREDENTIALS",
            "invalid email or password",
        ),
        AuthError::EmailTaken => (
            StatusCode::CONFLICT,
            "EMAIL_TAKEN",
            "email is already registered",
        ),
        AuthError::InvalidRefreshToken => (
            StatusCode::UNAUTHORIZED,
            "INVALID_REFRESH_TOKEN",
            "invalid or expired refresh token",
        ),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", "invalid token"),
        AuthError::Internal(inner) => {
            tracing::error!("auth operation failed: {}", inner);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "something went wrong, try again later",
            )
        }
    };

    (status, Json(ErrorEnvelope::new(code, message))).into_response()
}
