//! Invoice generation
//!
//! Settlement renders one invoice per paid order and hands the bytes to
//! object storage. Rendering is behind [`InvoiceRenderer`] so the layout can
//! change without touching the pipeline.

mod layout;
mod renderer;

use async_trait::async_trait;
use shared::models::Order;

pub use renderer::PdfInvoiceRenderer;

/// Rendered invoice ready for upload
#[derive(Debug, Clone)]
pub struct InvoiceDocument {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

/// Invoice rendering error
#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    #[error("order {0} has no line items")]
    EmptyOrder(String),
    #[error("pdf encoding failed: {0}")]
    Pdf(String),
}

#[async_trait]
pub trait InvoiceRenderer: Send + Sync {
    async fn render(&self, order: &Order) -> Result<InvoiceDocument, InvoiceError>;
}

/// Invoice number: `INV-` + first 8 characters of the order id, uppercased
pub fn invoice_number(order: &Order) -> String {
    format!("INV-{}", order.short_id().to_uppercase())
}

/// Deterministic storage key, so a repeated upload overwrites the same object
pub fn object_key(order: &Order) -> String {
    format!("invoices/invoice_{}.pdf", order.id)
}
