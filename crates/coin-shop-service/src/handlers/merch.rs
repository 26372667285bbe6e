//! Merchandise catalog and purchase handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use coin_shop_core::MerchItem;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Catalog item response.
#[derive(Debug, Serialize)]
pub struct MerchResponse {
    /// Item name.
    pub name: String,
    /// Price in coins.
    pub price: i64,
}

impl From<&MerchItem> for MerchResponse {
    fn from(item: &MerchItem) -> Self {
        Self {
            name: item.name.clone(),
            price: item.price,
        }
    }
}

/// List all purchasable items.
pub async fn list_merch(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
) -> Result<Json<Vec<MerchResponse>>, ApiError> {
    let items = state.purchases.catalog()?;
    Ok(Json(items.iter().map(MerchResponse::from).collect()))
}

/// Purchase the named item for the authenticated user.
pub async fn buy_item(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(item): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.purchases.purchase(auth.account_id, &item).await?;
    Ok(StatusCode::OK)
}
