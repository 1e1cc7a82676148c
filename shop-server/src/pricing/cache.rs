//! Short-lived cache of the offer snapshot
//!
//! Every price lookup needs all category offers plus the sale switch. They
//! change rarely, so one snapshot is shared for a few seconds and dropped on
//! any admin write.

use std::sync::Arc;
use std::time::Duration;

use shared::models::{CategoryOffer, GlobalSaleConfig};
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Offers and sale switch as read at one moment
#[derive(Debug, Clone, Default)]
pub struct OfferSnapshot {
    pub category_offers: Vec<CategoryOffer>,
    pub sale_config: Option<GlobalSaleConfig>,
}

struct CacheEntry {
    snapshot: Arc<OfferSnapshot>,
    expires_at: Instant,
}

#[derive(Clone)]
pub struct OfferCache {
    entry: Arc<RwLock<Option<CacheEntry>>>,
    ttl: Duration,
}

impl OfferCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entry: Arc::new(RwLock::new(None)),
            ttl,
        }
    }

    /// Cached snapshot, if still fresh
    pub async fn get(&self) -> Option<Arc<OfferSnapshot>> {
        let entry = self.entry.read().await;
        entry
            .as_ref()
            .filter(|e| e.expires_at > Instant::now())
            .map(|e| e.snapshot.clone())
    }

    pub async fn put(&self, snapshot: Arc<OfferSnapshot>) {
        if self.ttl.is_zero() {
            return;
        }
        *self.entry.write().await = Some(CacheEntry {
            snapshot,
            expires_at: Instant::now() + self.ttl,
        });
    }

    pub async fn invalidate(&self) {
        *self.entry.write().await = None;
    }
}
