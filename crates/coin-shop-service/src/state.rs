//! Application state.

use std::sync::Arc;

use coin_shop_engine::{AccountService, PurchaseEngine, TransferEngine};
use coin_shop_store::RocksStore;

use crate::auth::TokenService;
use crate::config::ServiceConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<RocksStore>,

    /// Account lifecycle: login, resolution, balance reads.
    pub accounts: AccountService,

    /// The coin transfer engine.
    pub transfers: TransferEngine,

    /// The purchase engine.
    pub purchases: PurchaseEngine,

    /// JWT issuance and verification.
    pub tokens: TokenService,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        let tokens = TokenService::new(&config.jwt_secret, config.token_lifetime_seconds);

        Self {
            accounts: AccountService::new(Arc::clone(&store)),
            transfers: TransferEngine::new(Arc::clone(&store)),
            purchases: PurchaseEngine::new(Arc::clone(&store)),
            tokens,
            store,
            config,
        }
    }
}
