//! Projection of external market data into Layer 1 witnesses.

use serde::{Deserialize, Serialize};

const PROJECTED_PRICE: u64 = 50_000;
const PROJECTED_VOLUME: u64 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketData {
    pub symbol: String,
    pub price: u64,
    pub volume: u64,
}

#[derive(Debug, Clone)]
pub struct MarketOracle {
    pub provider_id: String,
}

impl MarketOracle {
    pub fn new(provider: &str) -> Self {
        Self {
            provider_id: provider.to_string(),
        }
    }

    /// Stable, normalised projection of a symbol. No network access.
    pub fn fetch_live_projection(&self, symbol: &str) -> MarketData {
        tracing::debug!("Projecting {} via {}", symbol, self.provider_id);
        MarketData {
            symbol: symbol.to_string(),
            price: PROJECTED_PRICE,
            volume: PROJECTED_VOLUME,
        }
    }

    pub fn generate_market_witness(&self, data: &MarketData) -> String {
        format!(
            "Witness_π(Symbol: {}, Price: {}, Provider: {})",
            data.symbol, data.price, self.provider_id
        )
    }

    pub fn verify_data_integrity(&self, data: &MarketData) -> bool {
        data.price > 0 && !data.symbol.is_empty()
    }
}
