//! Payment settlement
//!
//! Turns a gateway callback into a one-time order confirmation:
//!
//! ```text
//! callback ─► verify signature ─► load order
//!                                      │
//!                                      ▼
//!                       gateway order matches? ── no ─► reject
//!                                      │ yes
//!                                      ▼
//!                               already paid? ─► replay
//!                                      │
//!                                      ▼
//!                 render + upload invoice (time-boxed, non-fatal)
//!                                      │
//!                                      ▼
//!           conditional write (payment_status <> 'paid') ── lost ─► re-read ─► replay
//!                                      │ won
//!                                      ▼
//!                 notification dedup/create ─► fan-out (async)
//! ```

mod pipeline;

use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use crate::db::StoreError;

pub use pipeline::{SettlementOptions, SettlementPipeline};

/// Gateway callback payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementRequest {
    pub gateway_order_ref: String,
    pub gateway_payment_ref: String,
    pub signature: String,
    pub order_id: String,
}

impl SettlementRequest {
    /// First empty field, if any
    fn missing_field(&self) -> Option<&'static str> {
        [
            ("gateway_order_ref", &self.gateway_order_ref),
            ("gateway_payment_ref", &self.gateway_payment_ref),
            ("signature", &self.signature),
            ("order_id", &self.order_id),
        ]
        .into_iter()
        .find(|(_, v)| v.trim().is_empty())
        .map(|(name, _)| name)
    }
}

/// Result of a successful settlement call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementOutcome {
    pub order_id: String,
    pub invoice_url: Option<String>,
    /// `true` when the order was already paid and nothing was written
    pub replayed: bool,
}

/// Settlement rejection
#[derive(Debug, thiserror::Error)]
pub enum SettlementError {
    #[error("missing required field: {0}")]
    Malformed(&'static str),
    #[error("payment signature mismatch")]
    InvalidSignature,
    #[error("order not found: {0}")]
    OrderNotFound(String),
    #[error("gateway order does not belong to order {0}")]
    GatewayOrderMismatch(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<SettlementError> for AppError {
    fn from(err: SettlementError) -> Self {
        match err {
            SettlementError::Malformed(field) => AppError::with_message(
                ErrorCode::PaymentPayloadInvalid,
                format!("missing required field: {field}"),
            )
            .with_detail("field", field),
            SettlementError::InvalidSignature => AppError::new(ErrorCode::PaymentSignatureInvalid),
            SettlementError::OrderNotFound(id) => {
                AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", id)
            }
            SettlementError::GatewayOrderMismatch(id) => {
                AppError::new(ErrorCode::GatewayOrderMismatch).with_detail("order_id", id)
            }
            SettlementError::Store(e) => {
                tracing::error!(error = %e, "Settlement store error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}
