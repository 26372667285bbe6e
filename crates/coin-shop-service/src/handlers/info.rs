//! Balance and history read handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use coin_shop_core::{CoinTransfer, Purchase};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Balance response.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Current balance in coins.
    pub balance: i64,
}

/// Get the authenticated user's current balance.
///
/// Point-in-time read; the engines never reuse this value for a debit
/// decision.
pub async fn balance(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = state.accounts.balance(auth.account_id)?;
    Ok(Json(BalanceResponse { balance }))
}

/// Transfer history entry.
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    /// Record id.
    pub id: i64,
    /// Debited account.
    pub sender_id: i64,
    /// Credited account.
    pub recipient_id: i64,
    /// Amount in coins.
    pub amount: i64,
    /// Commit timestamp.
    pub created_at: String,
}

impl From<&CoinTransfer> for TransferResponse {
    fn from(transfer: &CoinTransfer) -> Self {
        Self {
            id: transfer.id.as_i64(),
            sender_id: transfer.sender_id.as_i64(),
            recipient_id: transfer.recipient_id.as_i64(),
            amount: transfer.amount,
            created_at: transfer.created_at.to_rfc3339(),
        }
    }
}

/// Purchase history entry.
#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    /// Record id.
    pub id: i64,
    /// Item name at purchase time.
    pub item: String,
    /// Price paid in coins.
    pub price: i64,
    /// Commit timestamp.
    pub created_at: String,
}

impl From<&Purchase> for PurchaseResponse {
    fn from(purchase: &Purchase) -> Self {
        Self {
            id: purchase.id.as_i64(),
            item: purchase.item.clone(),
            price: purchase.price,
            created_at: purchase.created_at.to_rfc3339(),
        }
    }
}

/// Account activity response.
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    /// Purchases, newest first.
    pub purchases: Vec<PurchaseResponse>,
    /// Transfers sent, newest first.
    pub sent_transfers: Vec<TransferResponse>,
    /// Transfers received, newest first.
    pub received_transfers: Vec<TransferResponse>,
}

/// Get the authenticated user's purchase and transfer history.
pub async fn info(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<InfoResponse>, ApiError> {
    let purchases = state.purchases.purchases(auth.account_id)?;
    let sent = state.transfers.sent(auth.account_id)?;
    let received = state.transfers.received(auth.account_id)?;

    Ok(Json(InfoResponse {
        purchases: purchases.iter().map(PurchaseResponse::from).collect(),
        sent_transfers: sent.iter().map(TransferResponse::from).collect(),
        received_transfers: received.iter().map(TransferResponse::from).collect(),
    }))
}
