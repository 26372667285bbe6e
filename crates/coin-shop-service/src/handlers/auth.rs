//! Login and auto-registration handler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// Login request.
#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    /// Username; unknown usernames are auto-registered.
    pub username: String,
    /// Password in the clear; only its bcrypt hash is stored.
    pub password: String,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
}

/// Authenticate a user, creating the account on first sight, and issue a
/// token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AuthRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if body.username.trim().is_empty() {
        return Err(ApiError::BadRequest("username must not be empty".into()));
    }
    if body.password.is_empty() {
        return Err(ApiError::BadRequest("password must not be empty".into()));
    }

    let account = state.accounts.login(&body.username, &body.password).await?;
    let token = state.tokens.issue(&account)?;

    Ok(Json(AuthResponse { token }))
}
