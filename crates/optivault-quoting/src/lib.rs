pub mod prices;
pub mod pyth;

pub use prices::{AssetPrices, PriceSource};
pub use pyth::PythSource;
