//! Coin Shop HTTP API Service.
//!
//! This crate provides the HTTP API for the coin shop, including:
//!
//! - Login with auto-registration (`POST /api/auth`)
//! - Coin transfers between users (`POST /api/sendCoin`)
//! - Merchandise purchases (`GET /api/buy/:item`)
//! - Balance and history reads (`GET /api/balance`, `GET /api/info`)
//!
//! # Authentication
//!
//! All routes except `/health` and `/api/auth` require a bearer token
//! issued by the auth endpoint (HS256 JWT signed with the configured
//! secret).

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers stay async for a uniform surface

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use auth::{AuthUser, TokenService};
pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
