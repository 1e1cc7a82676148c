//! PDF invoice renderer
//!
//! The invoice is laid out as fixed-width lines with [`TextBuilder`] and then
//! drawn onto A4 pages in a monospace builtin font.

use async_trait::async_trait;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use shared::models::{Order, ShippingAddress};
use shared::util::format_date;

use super::layout::TextBuilder;
use super::{InvoiceDocument, InvoiceError, InvoiceRenderer, invoice_number};

const PAGE_WIDTH: usize = 48;
// Item | Qty | Price | Amount
const COLUMNS: [usize; 4] = [24, 5, 9, 10];

// A4 portrait, millimetres
const PAGE_W_MM: f32 = 210.0;
const PAGE_H_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 5.0;
const FONT_SIZE_PT: f32 = 10.0;

/// Renders an A4 PDF invoice
pub struct PdfInvoiceRenderer {
    store_name: String,
    currency: &'static str,
}

impl PdfInvoiceRenderer {
    pub fn new(store_name: impl Into<String>) -> Self {
        Self {
            store_name: store_name.into(),
            currency: "INR",
        }
    }

    fn render_text(&self, order: &Order) -> String {
        let mut b = TextBuilder::new(PAGE_WIDTH);

        self.render_header(&mut b, order);
        render_bill_to(&mut b, order);
        self.render_items(&mut b, order);

        b.newline();
        b.center("Thank you for your purchase!");
        b.build()
    }

    fn render_header(&self, b: &mut TextBuilder, order: &Order) {
        b.center(&self.store_name.to_uppercase());
        b.center("TAX INVOICE");
        b.sep_double();
        b.line_lr("Invoice No:", &invoice_number(order));
        b.line_lr("Date:", &format_date(order.paid_at.unwrap_or(order.created_at)));
        b.line_lr("Order ID:", &order.id);
        if let Some(payment_ref) = &order.gateway_payment_ref {
            b.line_lr("Payment ID:", payment_ref);
        }
        b.sep_single();
    }

    fn render_items(&self, b: &mut TextBuilder, order: &Order) {
        let [item_w, qty_w, price_w, amount_w] = COLUMNS;
        b.columns(&[
            ("Item", item_w),
            ("Qty", qty_w),
            ("Price", price_w),
            ("Amount", amount_w),
        ]);
        b.sep_single();
        for item in &order.items {
            let qty = item.quantity.to_string();
            let price = item.price.to_string();
            let amount = item.line_total().to_string();
            b.columns(&[
                (item.title.as_str(), item_w),
                (qty.as_str(), qty_w),
                (price.as_str(), price_w),
                (amount.as_str(), amount_w),
            ]);
        }
        b.sep_single();
        b.line_lr(
            &format!("Total ({})", self.currency),
            &order.total_amount.to_string(),
        );
        b.sep_double();
    }
}

fn render_bill_to(b: &mut TextBuilder, order: &Order) {
    b.line("Bill To:");
    match &order.shipping_address {
        Some(ShippingAddress {
            name,
            address,
            city,
            state,
            pincode,
            phone,
        }) => {
            b.line(name);
            b.line(address);
            b.line(&format!("{city}, {state} - {pincode}"));
            b.line(&format!("Phone: {phone}"));
        }
        None => {
            b.line("(no shipping address)");
        }
    }
    b.line(&format!("Email: {}", order.user_email));
    b.sep_single();
}

/// Draw `text` line by line, starting a new page when the current one is full
fn write_pdf(title: &str, text: &str) -> Result<Vec<u8>, InvoiceError> {
    let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W_MM), Mm(PAGE_H_MM), "Invoice");
    let font = doc
        .add_builtin_font(BuiltinFont::Courier)
        .map_err(|e| InvoiceError::Pdf(e.to_string()))?;

    let top = PAGE_H_MM - MARGIN_MM;
    {
        let mut current = doc.get_page(page).get_layer(layer);
        let mut y = top;
        for line in text.lines() {
            if y < MARGIN_MM {
                let (page, layer) = doc.add_page(Mm(PAGE_W_MM), Mm(PAGE_H_MM), "Invoice");
                current = doc.get_page(page).get_layer(layer);
                y = top;
            }
            if !line.is_empty() {
                current.use_text(line, FONT_SIZE_PT, Mm(MARGIN_MM), Mm(y), &font);
            }
            y -= LINE_HEIGHT_MM;
        }
    }

    doc.save_to_bytes().map_err(|e| InvoiceError::Pdf(e.to_string()))
}

#[async_trait]
impl InvoiceRenderer for PdfInvoiceRenderer {
    async fn render(&self, order: &Order) -> Result<InvoiceDocument, InvoiceError> {
        if order.items.is_empty() {
            return Err(InvoiceError::EmptyOrder(order.id.clone()));
        }
        let text = self.render_text(order);
        let body = write_pdf(&invoice_number(order), &text)?;
        Ok(InvoiceDocument {
            file_name: format!("invoice_{}.pdf", order.id),
            content_type: "application/pdf",
            body,
        })
    }
}
