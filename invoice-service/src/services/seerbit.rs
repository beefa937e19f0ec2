//! SeerBit invoicing API client.
//!
//! Two calls are used: a POST that registers an invoice and a GET that asks
//! SeerBit to deliver a registered invoice to its recipient. Both carry the
//! merchant's encrypted key as a bearer token. Only HTTP 200 counts as
//! acceptance; every other status is handed back with its raw body.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use thiserror::Error;

use crate::config::SeerbitConfig;
use crate::models::Invoice;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider responded with {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Provider unreachable: {0}")]
    Transport(String),
}

impl ProviderError {
    /// Convert into the HTTP-facing error, prefixing the operation context.
    pub fn into_app_error(self, context: &str) -> AppError {
        match self {
            ProviderError::Rejected { status, body } => AppError::Upstream {
                status,
                message: context.to_string(),
                body,
            },
            ProviderError::Transport(reason) => {
                AppError::BadGateway(format!("{}: {}", context, reason))
            }
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Transport(err.to_string())
    }
}

/// Outbound invoicing capability.
#[async_trait]
pub trait InvoiceProvider: Send + Sync {
    /// Register `invoice` with the provider.
    async fn create_invoice(&self, invoice: &Invoice) -> Result<(), ProviderError>;

    /// Ask the provider to deliver the invoice stored under `invoice_id`.
    async fn send_invoice(&self, invoice_id: &str) -> Result<(), ProviderError>;
}

#[derive(Clone)]
pub struct SeerbitClient {
    client: Client,
    config: SeerbitConfig,
}

impl SeerbitClient {
    pub fn new(config: SeerbitConfig) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// `{send_base}/{public_key}/send/{invoice_id}`
    pub fn send_invoice_url(&self, invoice_id: &str) -> String {
        format!(
            "{}/{}/send/{}",
            self.config.send_invoice_api.trim_end_matches('/'),
            self.config.public_key,
            invoice_id
        )
    }

    async fn check(response: reqwest::Response) -> Result<(), ProviderError> {
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, body = %body, "SeerBit response");

        if status == StatusCode::OK {
            Ok(())
        } else {
            Err(ProviderError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl InvoiceProvider for SeerbitClient {
    async fn create_invoice(&self, invoice: &Invoice) -> Result<(), ProviderError> {
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(self.config.encrypted_key.expose_secret())
            .json(invoice)
            .send()
            .await?;

        let result = Self::check(response).await;
        match &result {
            Ok(()) => tracing::info!(
                order_no = %invoice.order_no,
                amount = invoice.amount,
                currency = %invoice.currency,
                "SeerBit invoice created"
            ),
            Err(e) => tracing::warn!(
                order_no = %invoice.order_no,
                error = %e,
                "SeerBit invoice creation failed"
            ),
        }
        result
    }

    async fn send_invoice(&self, invoice_id: &str) -> Result<(), ProviderError> {
        let url = self.send_invoice_url(invoice_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.config.encrypted_key.expose_secret())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let result = Self::check(response).await;
        match &result {
            Ok(()) => tracing::info!(invoice_id = %invoice_id, "SeerBit invoice sent"),
            Err(e) => tracing::warn!(
                invoice_id = %invoice_id,
                error = %e,
                "SeerBit invoice send failed"
            ),
        }
        result
    }
}
