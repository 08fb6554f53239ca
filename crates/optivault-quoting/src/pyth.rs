use anyhow::anyhow;
use rust_decimal::Decimal;
use serde::Deserialize;

use optivault_types::Asset;

use crate::prices::PriceSource;

const HERMES_LATEST_URL: &str = "https://hermes.pyth.network/v2/updates/price/latest";

// Pyth response structures
#[derive(Debug, Deserialize)]
struct PythResponse {
    parsed: Vec<PythPriceFeed>,
}

#[derive(Debug, Deserialize)]
struct PythPriceFeed {
    id: String,
    price: PriceData,
}

#[derive(Debug, Deserialize)]
struct PriceData {
    price: String,
    expo: i32,
}

/// Latest prices from the Pyth Hermes API.
#[derive(Debug, Clone, Default)]
pub struct PythSource {
    client: reqwest::Client,
}

impl PythSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PriceSource for PythSource {
    async fn fetch(&self, asset: Asset) -> anyhow::Result<Decimal> {
        let Some(feed_id) = feed_id(asset) else {
            return Ok(Decimal::ONE);
        };

        let url = format!("{HERMES_LATEST_URL}?ids[]={feed_id}");
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let pyth_response: PythResponse = response.json().await?;

        let price_feed = pyth_response
            .parsed
            .iter()
            .find(|feed| feed.id.trim_start_matches("0x") == feed_id.trim_start_matches("0x"))
            .ok_or_else(|| anyhow!("No price feed found for {asset}"))?;

        scale_price(&price_feed.price.price, price_feed.price.expo)
    }
}

/// Turn Pyth's integer mantissa and exponent into a decimal price.
fn scale_price(mantissa: &str, expo: i32) -> anyhow::Result<Decimal> {
    let price_int: i64 = mantissa.parse()?;
    if expo > 0 {
        return Err(anyhow!("Unexpected positive exponent {expo}"));
    }
    Decimal::try_new(price_int, expo.unsigned_abs()).map_err(|e| anyhow!(e))
}

/// Pyth feed ID for an asset (all against USD). `None` for USD itself.
const fn feed_id(asset: Asset) -> Option<&'static str> {
    match asset {
        Asset::USD => None,
        Asset::USDC => Some("0xeaa020c61cc479712813461ce153894a96a6c00b21ed0cfc2798d1f9a9e9c94a"),
        Asset::BTC => Some("0xe62df6c8b4a85fe1a67db44dc12de5db330f7ac66b72dc658afedf0f4a415b43"),
        Asset::ETH => Some("0xff61491a931112ddf1bd8147cd1b641375f79f5825126d665480874634fd0ace"),
    }
}
