use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// An invoice in the provider's schema.
///
/// The same shape is sent to SeerBit and stored in the `invoices` collection,
/// so field names follow the provider's camel-case convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub public_key: String,
    pub order_no: String,
    pub due_date: String,
    pub currency: String,
    pub amount: i64,
    pub service_description: String,
    pub receivers_name: String,
    pub customer_email: String,
    pub invoice_items: Vec<serde_json::Value>,
}
