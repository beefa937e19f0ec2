//! Invoice endpoints: create, retrieve, send.

use axum::{
    extract::{Path, State},
    Json,
};
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;

use crate::{
    dtos::{
        CreateInvoiceRequest, CreateInvoiceResponse, InvoiceSummaryResponse, SendInvoiceResponse,
    },
    models::Invoice,
    startup::AppState,
    utils::ValidatedJson,
};

fn invoice_not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Invoice not found"))
}

/// Malformed identifiers are reported exactly like unknown ones.
async fn load_invoice(state: &AppState, invoice_id: &str) -> Result<Invoice, AppError> {
    let id = ObjectId::parse_str(invoice_id).map_err(|e| {
        tracing::debug!(invoice_id = %invoice_id, error = %e, "Malformed invoice id");
        invoice_not_found()
    })?;

    state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(invoice_not_found)
}

/// Register the invoice with SeerBit, then mirror the provider payload locally.
#[tracing::instrument(skip(state, request), fields(order_no = %request.order_no))]
pub async fn create_invoice(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateInvoiceRequest>,
) -> Result<Json<CreateInvoiceResponse>, AppError> {
    let invoice = request.into_invoice(&state.config.seerbit.public_key);

    state
        .provider
        .create_invoice(&invoice)
        .await
        .map_err(|e| e.into_app_error("Error creating invoice"))?;

    // Provider has accepted by now; an insert failure leaves it without a local copy.
    let invoice_id = state.store.insert(&invoice).await.map_err(|e| {
        tracing::error!(
            order_no = %invoice.order_no,
            error = %e,
            "Invoice accepted by SeerBit but not recorded locally"
        );
        AppError::PartialSuccess(anyhow::anyhow!(
            "Invoice {} was created with the provider but could not be recorded locally",
            invoice.order_no
        ))
    })?;

    tracing::info!(invoice_id = %invoice_id, "Invoice created");

    Ok(Json(CreateInvoiceResponse {
        message: "Invoice created successfully".to_string(),
        invoice_id: invoice_id.to_hex(),
    }))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
) -> Result<Json<InvoiceSummaryResponse>, AppError> {
    tracing::info!(invoice_id = %invoice_id, "Fetching invoice");

    let invoice = load_invoice(&state, &invoice_id).await?;

    Ok(Json(InvoiceSummaryResponse::from(invoice)))
}

/// `GET /invoice/create` shares its path with the create route; the segment
/// is looked up like any other id.
pub async fn get_invoice_named_create(
    state: State<AppState>,
) -> Result<Json<InvoiceSummaryResponse>, AppError> {
    get_invoice(state, Path("create".to_string())).await
}

/// Ask SeerBit to deliver a previously created invoice.
pub async fn send_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
) -> Result<Json<SendInvoiceResponse>, AppError> {
    tracing::info!(invoice_id = %invoice_id, "Sending invoice");

    // Existence gates the provider call; the record itself is not needed.
    let _invoice = load_invoice(&state, &invoice_id).await?;

    state
        .provider
        .send_invoice(&invoice_id)
        .await
        .map_err(|e| e.into_app_error("Failed to send invoice"))?;

    Ok(Json(SendInvoiceResponse {
        message: "Invoice sent successfully".to_string(),
    }))
}
