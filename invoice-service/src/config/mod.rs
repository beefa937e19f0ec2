use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct InvoiceConfig {
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub seerbit: SeerbitConfig,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: Secret<String>,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct SeerbitConfig {
    /// Invoice creation endpoint.
    pub api_url: String,
    /// Base URL for the send endpoint; `/{public_key}/send/{id}` is appended.
    pub send_invoice_api: String,
    /// Bearer token for every provider call.
    pub encrypted_key: Secret<String>,
    /// Merchant public key embedded in payloads and send URLs.
    pub public_key: String,
    /// Unset means outbound calls may wait indefinitely.
    pub timeout_seconds: Option<u64>,
}

impl SeerbitConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl InvoiceConfig {
    pub fn load() -> Result<Self, AppError> {
        // Common config also loads .env
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let timeout_seconds = match env::var("SEERBIT_TIMEOUT_SECONDS") {
            Ok(raw) => Some(raw.parse::<u64>().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "SEERBIT_TIMEOUT_SECONDS must be a whole number of seconds: {}",
                    e
                ))
            })?),
            Err(_) => None,
        };

        Ok(InvoiceConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: Secret::new(get_env("DATABASE_URI", None, is_prod)?),
                database: get_env("DATABASE_NAME", Some("invoice_db"), is_prod)?,
            },
            seerbit: SeerbitConfig {
                api_url: get_env("SEERBIT_API_URL", None, is_prod)?,
                send_invoice_api: get_env("SEERBIT_SEND_INVOICE_API", None, is_prod)?,
                encrypted_key: Secret::new(get_env("SEERBIT_ENCRYPTED_KEY", None, is_prod)?),
                public_key: get_env("PUBLIC_KEY", None, is_prod)?,
                timeout_seconds,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    lookup(key, env::var(key).ok(), default, is_prod)
}

fn lookup(
    key: &str,
    value: Option<String>,
    default: Option<&str>,
    is_prod: bool,
) -> Result<String, AppError> {
    match value {
        Some(val) => Ok(val),
        None => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
