pub mod invoices;

pub use invoices::{
    CreateInvoiceRequest, CreateInvoiceResponse, InvoiceSummaryResponse, SendInvoiceResponse,
};
