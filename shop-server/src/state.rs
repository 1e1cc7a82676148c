//! Application state for shop-server

use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use aws_sdk_sesv2::Client as SesClient;

use crate::config::Config;
use crate::db::{MemoryStore, OfferStore, OrderStore, PgStore};
use crate::invoice::PdfInvoiceRenderer;
use crate::notify::{NotificationChannel, SesEmailChannel, TelegramChannel, spawn_fanout};
use crate::payment::{PaymentGateway, RazorpayGateway};
use crate::pricing::{OfferCache, PricingService};
use crate::settlement::{SettlementOptions, SettlementPipeline};
use crate::storage::S3Storage;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Order + notification persistence
    pub orders: Arc<dyn OrderStore>,
    /// Product lookups and cached offers
    pub pricing: PricingService,
    /// Gateway order creation
    pub gateway: Arc<dyn PaymentGateway>,
    /// Payment callback settlement
    pub settlement: Arc<SettlementPipeline>,
    /// JWT secret for admin authentication
    pub jwt_secret: String,
}

impl AppState {
    /// Create a new AppState
    ///
    /// Connects to Postgres (or falls back to the in-memory store in
    /// development), builds AWS clients and starts the alert worker.
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let (orders, offers): (Arc<dyn OrderStore>, Arc<dyn OfferStore>) =
            match &config.database_url {
                Some(url) => {
                    let store = Arc::new(PgStore::connect(url).await?);
                    tracing::info!("PostgreSQL store ready");
                    (store.clone() as Arc<dyn OrderStore>, store as Arc<dyn OfferStore>)
                }
                None => {
                    tracing::warn!("DATABASE_URL not set, using in-memory store");
                    let store = Arc::new(MemoryStore::new());
                    (store.clone() as Arc<dyn OrderStore>, store as Arc<dyn OfferStore>)
                }
            };

        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let s3 = S3Client::new(&aws_config);
        let ses = if let Ok(ses_region) = std::env::var("SES_REGION") {
            let ses_config = aws_config
                .to_builder()
                .region(aws_config::Region::new(ses_region))
                .build();
            SesClient::new(&ses_config)
        } else {
            SesClient::new(&aws_config)
        };

        let channels: Vec<Arc<dyn NotificationChannel>> = vec![
            Arc::new(SesEmailChannel::new(
                ses,
                config.ses_from_email.clone(),
                config.admin_email.clone(),
            )),
            Arc::new(TelegramChannel::new(
                config.telegram_bot_token.clone(),
                config.telegram_chat_id.clone(),
            )),
        ];
        let (fanout, _worker) =
            spawn_fanout(channels, config.notify_queue_size, config.notify_send_timeout);

        let settlement = SettlementPipeline::new(
            orders.clone(),
            Arc::new(PdfInvoiceRenderer::new(config.store_name.clone())),
            Arc::new(S3Storage::new(
                s3,
                config.invoice_s3_bucket.clone(),
                &config.invoice_public_base_url,
            )),
            fanout,
            SettlementOptions {
                payment_secret: config.payment_key_secret.clone(),
                invoice_timeout: config.invoice_timeout,
            },
        );

        Ok(Self {
            orders,
            pricing: PricingService::new(offers, OfferCache::new(config.offer_cache_ttl)),
            gateway: Arc::new(RazorpayGateway::new(
                config.payment_key_id.clone(),
                config.payment_key_secret.clone(),
                &config.payment_api_base,
            )),
            settlement: Arc::new(settlement),
            jwt_secret: config.jwt_secret.clone(),
        })
    }
}
