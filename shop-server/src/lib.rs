//! shop-server: storefront payment settlement and promotional pricing
//!
//! - Opens gateway orders for checkout, verifies payment callbacks and
//!   settles orders exactly once
//! - Renders and stores invoices, alerts admins by email and chat
//! - Serves promotion-aware prices and cart quotes
//! - Offer administration and the admin notification bell (JWT authenticated)

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod invoice;
pub mod notify;
pub mod payment;
pub mod pricing;
pub mod settlement;
pub mod state;
pub mod storage;

pub use config::Config;
pub use state::AppState;
