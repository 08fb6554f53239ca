use rust_decimal::Decimal;

use optivault_quoting::AssetPrices;
use optivault_types::Asset;

use crate::{error::StatsError, sources::PriceFeed};

#[async_trait::async_trait]
impl PriceFeed for AssetPrices {
    async fn current_price(&self, asset: Asset) -> Result<Decimal, StatsError> {
        self.of(asset)
            .await
            .map_err(|e| StatsError::Price(format!("{e:#}")))
    }
}
