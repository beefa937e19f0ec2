#![allow(dead_code)]

use invoice_service::config::{InvoiceConfig, MongoConfig, SeerbitConfig};
use invoice_service::services::{InMemoryInvoiceStore, InvoiceStore, SeerbitClient};
use invoice_service::Application;
use secrecy::Secret;
use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_PUBLIC_KEY: &str = "SBPUBK_TEST";
pub const TEST_ENCRYPTED_KEY: &str = "test-encrypted-key";
pub const TEST_BEARER: &str = "Bearer test-encrypted-key";
pub const CREATE_PATH: &str = "/api/v2/invoices";
pub const SEND_BASE_PATH: &str = "/api/v2/invoices";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: InMemoryInvoiceStore,
    pub provider: MockServer,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let store = InMemoryInvoiceStore::new();
        Self::spawn_inner(store.clone(), Arc::new(store), None, None).await
    }

    /// Spawn with a custom store; `self.store` is then left unused.
    pub async fn spawn_with_store(store: Arc<dyn InvoiceStore>) -> Self {
        Self::spawn_inner(InMemoryInvoiceStore::new(), store, None, None).await
    }

    /// Spawn with the create endpoint pointing at `api_url` instead of the mock.
    pub async fn spawn_with_api_url(api_url: &str) -> Self {
        let store = InMemoryInvoiceStore::new();
        Self::spawn_inner(store.clone(), Arc::new(store), Some(api_url.to_string()), None).await
    }

    /// Spawn with the send base pointing at `send_api` instead of the mock.
    pub async fn spawn_with_send_api(send_api: &str) -> Self {
        let store = InMemoryInvoiceStore::new();
        Self::spawn_inner(store.clone(), Arc::new(store), None, Some(send_api.to_string())).await
    }

    async fn spawn_inner(
        store: InMemoryInvoiceStore,
        app_store: Arc<dyn InvoiceStore>,
        api_url: Option<String>,
        send_api: Option<String>,
    ) -> Self {
        let provider = MockServer::start().await;

        let config = InvoiceConfig {
            common: CoreConfig {
                port: 0, // Random port
                log_level: "debug".to_string(),
            },
            mongodb: MongoConfig {
                uri: Secret::new("mongodb://localhost:27017".to_string()),
                database: "invoice_test".to_string(),
            },
            seerbit: SeerbitConfig {
                api_url: api_url
                    .unwrap_or_else(|| format!("{}{}", provider.uri(), CREATE_PATH)),
                send_invoice_api: send_api
                    .unwrap_or_else(|| format!("{}{}", provider.uri(), SEND_BASE_PATH)),
                encrypted_key: Secret::new(TEST_ENCRYPTED_KEY.to_string()),
                public_key: TEST_PUBLIC_KEY.to_string(),
                timeout_seconds: Some(5),
            },
        };

        let seerbit =
            SeerbitClient::new(config.seerbit.clone()).expect("Failed to build SeerBit client");

        let app = Application::build_with(config, app_store, Arc::new(seerbit))
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            store,
            provider,
            client,
        }
    }

    pub async fn create_invoice(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}/invoice/create", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_invoice(&self, invoice_id: &str) -> reqwest::Response {
        self.client
            .get(format!("{}/invoice/{}", self.address, invoice_id))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn send_invoice(&self, invoice_id: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/invoice/send/{}", self.address, invoice_id))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Provider answers authenticated create calls with `status` and `body`;
    /// exactly `expected` calls must arrive.
    pub async fn mount_create(&self, status: u16, body: &str, expected: u64) {
        let mut mock = Mock::given(method("POST"))
            .and(path(CREATE_PATH))
            .and(header("Authorization", TEST_BEARER))
            .respond_with(ResponseTemplate::new(status).set_body_string(body));
        if expected > 0 {
            mock = mock.up_to_n_times(expected);
        }
        mock.expect(expected).mount(&self.provider).await;
    }

    /// Provider answers the authenticated send call for `invoice_id`.
    pub async fn mount_send(&self, invoice_id: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(Self::send_path(invoice_id)))
            .and(header("Authorization", TEST_BEARER))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .up_to_n_times(1)
            .expect(1)
            .mount(&self.provider)
            .await;
    }

    /// Create an invoice through the API with the provider answering 200.
    pub async fn create_accepted_invoice(&self, body: &Value) -> String {
        self.mount_create(200, r#"{"status":"SUCCESS"}"#, 1).await;

        let response = self.create_invoice(body).await;
        assert_eq!(response.status().as_u16(), 200);

        let body: Value = response.json().await.expect("Failed to parse JSON");
        body["invoice_id"]
            .as_str()
            .expect("invoice_id missing")
            .to_string()
    }

    pub fn send_path(invoice_id: &str) -> String {
        format!("{}/{}/send/{}", SEND_BASE_PATH, TEST_PUBLIC_KEY, invoice_id)
    }

    pub async fn provider_requests(&self) -> Vec<wiremock::Request> {
        self.provider.received_requests().await.unwrap_or_default()
    }
}

pub fn sample_invoice() -> Value {
    json!({
        "order_no": "O1",
        "due_date": "2024-01-01",
        "currency": "NGN",
        "receivers_name": "Jane",
        "customer_email": "jane@x.com",
        "amount": 1000,
        "service_description": "consulting",
        "invoice_items": []
    })
}
