use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::ClientOptions,
    Client, Collection, Database,
};
use service_core::error::AppError;
use tokio::sync::RwLock;

use crate::models::Invoice;

pub const INVOICE_COLLECTION: &str = "invoices";

/// Persistence for provider-acknowledged invoices.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Insert the invoice and return the store-assigned identifier.
    async fn insert(&self, invoice: &Invoice) -> Result<ObjectId, AppError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Invoice>, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct MongoInvoiceStore {
    client: Client,
    db: Database,
    invoices: Collection<Invoice>,
}

impl MongoInvoiceStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(uri).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB connection string: {}", e);
            AppError::from(e)
        })?;
        client_options.app_name = Some("invoice-service".to_string());

        let client = Client::with_options(client_options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "MongoDB client configured");

        Ok(Self::from_database(client, db))
    }

    pub fn from_database(client: Client, db: Database) -> Self {
        let invoices = db.collection(INVOICE_COLLECTION);
        Self {
            client,
            db,
            invoices,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl InvoiceStore for MongoInvoiceStore {
    async fn insert(&self, invoice: &Invoice) -> Result<ObjectId, AppError> {
        let result = self.invoices.insert_one(invoice, None).await?;

        result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::DatabaseError(anyhow::anyhow!(
                "Inserted invoice id is not an ObjectId: {}",
                result.inserted_id
            ))
        })
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Invoice>, AppError> {
        let invoice = self.invoices.find_one(doc! { "_id": id }, None).await?;
        Ok(invoice)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}

/// Process-local store with the same contract as the MongoDB one.
#[derive(Clone, Default)]
pub struct InMemoryInvoiceStore {
    invoices: Arc<RwLock<HashMap<ObjectId, Invoice>>>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.invoices.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.invoices.read().await.is_empty()
    }

    pub async fn all(&self) -> Vec<Invoice> {
        self.invoices.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn insert(&self, invoice: &Invoice) -> Result<ObjectId, AppError> {
        let id = ObjectId::new();
        let mut stored = invoice.clone();
        stored.id = Some(id);

        self.invoices.write().await.insert(id, stored);
        Ok(id)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Invoice>, AppError> {
        Ok(self.invoices.read().await.get(&id).cloned())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
