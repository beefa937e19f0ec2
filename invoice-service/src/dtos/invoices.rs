use serde::{Deserialize, Serialize};

use crate::models::Invoice;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoiceRequest {
    pub order_no: String,
    pub due_date: String,
    pub currency: String,
    pub receivers_name: String,
    pub customer_email: String,
    /// Smallest currency unit.
    pub amount: i64,
    pub service_description: String,
    pub invoice_items: Vec<serde_json::Value>,
}

impl CreateInvoiceRequest {
    /// Map onto the provider schema, injecting the merchant public key.
    pub fn into_invoice(self, public_key: &str) -> Invoice {
        Invoice {
            id: None,
            public_key: public_key.to_string(),
            order_no: self.order_no,
            due_date: self.due_date,
            currency: self.currency,
            amount: self.amount,
            service_description: self.service_description,
            receivers_name: self.receivers_name,
            customer_email: self.customer_email,
            invoice_items: self.invoice_items,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateInvoiceResponse {
    pub message: String,
    pub invoice_id: String,
}

/// Public projection of a stored invoice.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct InvoiceSummaryResponse {
    pub client_name: String,
    pub service_description: String,
    pub amount: i64,
    pub due_date: String,
    pub client_email: String,
}

impl From<Invoice> for InvoiceSummaryResponse {
    fn from(invoice: Invoice) -> Self {
        Self {
            client_name: invoice.receivers_name,
            service_description: invoice.service_description,
            amount: invoice.amount,
            due_date: invoice.due_date,
            client_email: invoice.customer_email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendInvoiceResponse {
    pub message: String,
}
