use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::User;
use crate::services::sessions;
use crate::state::AppState;

#[derive(Serialize)]
pub struct UserResponse {
    id: String,
    email: String,
    username: String,
    is_staff: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            is_staff: user.is_staff,
        }
    }
}

// POST /api/users/register
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation(format!("invalid email: {}", req.email)));
    }
    if req.username.trim().is_empty() {
        return Err(AppError::Validation("username must not be empty".to_string()));
    }
    if req.password.len() < 8 {
        return Err(AppError::Validation(
            "password must be at least 8 characters".to_string(),
        ));
    }

    let db = state.db.lock().unwrap();

    if queries::get_user_by_email(&db, &email)?.is_some() {
        return Err(AppError::Validation("email already registered".to_string()));
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        email,
        username: req.username.trim().to_string(),
        password_hash: User::hash_password(&req.password)?,
        is_staff: false,
        created_at: Utc::now().naive_utc(),
    };
    queries::create_user(&db, &user)?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

// POST /api/users/login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let db = state.db.lock().unwrap();

    let user = queries::get_user_by_email(&db, &req.email.trim().to_lowercase())?
        .ok_or(AppError::Unauthorized)?;
    if !user.verify_password(&req.password) {
        return Err(AppError::Unauthorized);
    }

    let session = sessions::issue_user_session(&db, &state.config, &user.id)?;

    tracing::info!(user_id = %user.id, "user logged in");
    Ok(Json(LoginResponse {
        token: session.token,
        user: UserResponse::from(&user),
    }))
}

// POST /api/users/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let token = sessions::bearer_token(&headers).ok_or(AppError::Unauthorized)?;

    let db = state.db.lock().unwrap();
    queries::delete_session(&db, &token)?;

    Ok(Json(serde_json::json!({ "detail": "logged out" })))
}

// GET /api/users/user-info
pub async fn user_info(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<UserResponse>, AppError> {
    let db = state.db.lock().unwrap();

    let ctx = sessions::current(&db, &headers)?.ok_or(AppError::Unauthorized)?;
    let user = ctx.user.ok_or(AppError::Unauthorized)?;

    Ok(Json(UserResponse::from(&user)))
}
