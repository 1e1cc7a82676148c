//! Shop server configuration

use std::time::Duration;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shop server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP port
    pub http_port: u16,
    /// PostgreSQL connection URL (optional in development: in-memory store)
    pub database_url: Option<String>,
    /// Gateway public key id (also the Orders API username)
    pub payment_key_id: String,
    /// Gateway key secret used to sign payment callbacks
    pub payment_key_secret: String,
    /// Gateway REST base URL
    pub payment_api_base: String,
    /// JWT secret for admin authentication
    pub jwt_secret: String,
    /// S3 bucket for invoice documents
    pub invoice_s3_bucket: String,
    /// Public base URL invoices are served from (CloudFront or S3 website)
    pub invoice_public_base_url: String,
    /// Time budget for invoice render + upload
    pub invoice_timeout: Duration,
    /// TTL of the in-process offer cache
    pub offer_cache_ttl: Duration,
    /// SES sender email address
    pub ses_from_email: String,
    /// Recipient of paid-order alerts
    pub admin_email: Option<String>,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    /// Store name printed on invoices
    pub store_name: String,
    /// Fan-out queue capacity
    pub notify_queue_size: usize,
    /// Per-channel send budget for alerts
    pub notify_send_timeout: Duration,
    /// `json` switches log output to JSON lines
    pub log_format: String,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    fn optional(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|s| !s.is_empty())
    }

    fn parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
        std::env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let database_url = Self::optional("DATABASE_URL");
        if database_url.is_none() && environment != "development" {
            return Err(format!("DATABASE_URL must be set in {environment} environment").into());
        }

        Ok(Self {
            http_port: Self::parsed("HTTP_PORT", 8080),
            database_url,
            payment_key_id: Self::require_secret("PAYMENT_KEY_ID", &environment)?,
            payment_key_secret: Self::require_secret("PAYMENT_KEY_SECRET", &environment)?,
            payment_api_base: std::env::var("PAYMENT_API_BASE")
                .unwrap_or_else(|_| crate::payment::DEFAULT_API_BASE.into()),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            invoice_s3_bucket: std::env::var("INVOICE_S3_BUCKET")
                .unwrap_or_else(|_| "shop-invoices".into()),
            invoice_public_base_url: std::env::var("INVOICE_PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "https://shop-invoices.s3.amazonaws.com".into()),
            invoice_timeout: Duration::from_millis(Self::parsed("INVOICE_TIMEOUT_MS", 5000)),
            offer_cache_ttl: Duration::from_secs(Self::parsed("OFFER_CACHE_TTL_SECS", 5)),
            ses_from_email: std::env::var("SES_FROM_EMAIL")
                .unwrap_or_else(|_| "alerts@shop.local".into()),
            admin_email: Self::optional("ADMIN_EMAIL"),
            telegram_bot_token: Self::optional("TELEGRAM_BOT_TOKEN"),
            telegram_chat_id: Self::optional("TELEGRAM_CHAT_ID"),
            store_name: std::env::var("STORE_NAME").unwrap_or_else(|_| "Storefront".into()),
            notify_queue_size: Self::parsed("NOTIFY_QUEUE_SIZE", 256),
            notify_send_timeout: Duration::from_secs(Self::parsed("NOTIFY_SEND_TIMEOUT_SECS", 15)),
            log_format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".into()),
            environment,
        })
    }
}
