//! Coin transfer handler.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use coin_shop_engine::EngineError;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Send coins request.
#[derive(Debug, Deserialize)]
pub struct SendCoinRequest {
    /// Recipient username.
    #[serde(rename = "toUser")]
    pub to_user: String,
    /// Amount in coins. Must be positive.
    pub amount: i64,
}

/// Transfer coins from the authenticated user to another user.
pub async fn send_coin(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<SendCoinRequest>,
) -> Result<StatusCode, ApiError> {
    // An unknown recipient is a client error here, not a 404: the caller
    // typed the name.
    let recipient = state
        .accounts
        .resolve_username(&body.to_user)
        .map_err(|err| match err {
            EngineError::AccountNotFound { .. } => {
                ApiError::BadRequest("recipient user not found".into())
            }
            other => other.into(),
        })?;

    state
        .transfers
        .transfer(auth.account_id, recipient.id, body.amount)
        .await?;

    Ok(StatusCode::OK)
}
