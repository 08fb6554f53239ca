use std::{sync::Arc, time::Duration};

use anyhow::Result;
use moka::future::Cache;
use rust_decimal::Decimal;

use optivault_types::Asset;

use crate::pyth::PythSource;

/// Something able to quote an asset in USD.
#[async_trait::async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch(&self, asset: Asset) -> Result<Decimal>;
}

/// Cached asset prices with a short TTL in front of a [`PriceSource`].
#[derive(Clone)]
pub struct AssetPrices {
    source: Arc<dyn PriceSource>,
    cache: Cache<Asset, Decimal>,
}

impl AssetPrices {
    const CACHE_DURATION: Duration = Duration::from_secs(10);

    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self {
            source,
            cache: Cache::builder().time_to_live(Self::CACHE_DURATION).build(),
        }
    }

    /// Price of `asset` in USD. Served from cache when a quote younger than
    /// the TTL exists.
    pub async fn of(&self, asset: Asset) -> Result<Decimal> {
        if asset.is_usd() {
            return Ok(Decimal::ONE);
        }

        if let Some(cached_price) = self.cache.get(&asset).await {
            return Ok(cached_price);
        }

        match self.source.fetch(asset).await {
            Ok(price) if price.is_sign_negative() => {
                Err(anyhow::anyhow!("Negative price {price} quoted for {asset}"))
            }
            Ok(price) => {
                self.cache.insert(asset, price).await;
                Ok(price)
            }
            Err(e) => {
                tracing::warn!(asset = %asset, error = %e, "Failed to fetch asset price");
                Err(e.context(format!("Failed to fetch price for {asset}")))
            }
        }
    }
}

impl Default for AssetPrices {
    fn default() -> Self {
        Self::new(Arc::new(PythSource::new()))
    }
}
