pub mod repository;
pub mod seerbit;

pub use repository::{InMemoryInvoiceStore, InvoiceStore, MongoInvoiceStore};
pub use seerbit::{InvoiceProvider, ProviderError, SeerbitClient};
