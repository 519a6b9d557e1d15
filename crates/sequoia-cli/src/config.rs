// crates/sequoia-cli/src/config.rs
//
// Runtime configuration for the Sequoia CLI.
// Loaded from a TOML file or populated with defaults matching the stock
// deployment (four rarity tiers paying 15/25/35/50 tokens per block).

use serde::Deserialize;
use std::fs;

use sequoia_core::error::SequoiaError;
use sequoia_core::types::{Amount, Identity};
use sequoia_farming::{
    FarmingEngine, FeePolicy, RateTable, DEFAULT_BLOCKS_PER_DAY, DEFAULT_RATES_WHOLE,
};
use sequoia_market::SaleMarket;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SequoiaConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub farming: FarmingConfig,

    #[serde(default)]
    pub market: MarketConfig,
}

/// Farming engine parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct FarmingConfig {
    /// Engine administrator.
    #[serde(default = "default_admin")]
    pub admin: Identity,

    /// Approximate blocks per day; only used for per-day figures.
    #[serde(default = "default_blocks_per_day")]
    pub blocks_per_day: u64,

    /// Decimals of the reward token; rates are scaled by 10^decimals.
    #[serde(default = "default_reward_decimals")]
    pub reward_decimals: u32,

    /// Whole-token reward per block, ordered by rarity class (index 0 = class 1).
    #[serde(default = "default_rates")]
    pub rates: Vec<u64>,

    /// Fee skimmed from each settlement, in basis points.
    #[serde(default)]
    pub fee_bps: u16,

    /// Fee recipient. No fee is taken when unset.
    #[serde(default)]
    pub fee_to: Option<Identity>,
}

/// Sale market parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    /// Market administrator and proceeds recipient.
    #[serde(default = "default_admin")]
    pub admin: Identity,

    /// Price per position in the payment asset's smallest unit.
    #[serde(default = "default_price")]
    pub price: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_admin() -> Identity {
    Identity::ZERO
}

fn default_blocks_per_day() -> u64 {
    DEFAULT_BLOCKS_PER_DAY
}

fn default_reward_decimals() -> u32 {
    18
}

fn default_rates() -> Vec<u64> {
    DEFAULT_RATES_WHOLE.iter().map(|&r| r as u64).collect()
}

fn default_price() -> u64 {
    1
}

impl Default for SequoiaConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            farming: FarmingConfig::default(),
            market: MarketConfig::default(),
        }
    }
}

impl Default for FarmingConfig {
    fn default() -> Self {
        Self {
            admin: default_admin(),
            blocks_per_day: default_blocks_per_day(),
            reward_decimals: default_reward_decimals(),
            rates: default_rates(),
            fee_bps: 0,
            fee_to: None,
        }
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            admin: default_admin(),
            price: default_price(),
        }
    }
}

impl SequoiaConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config = Self::parse(&contents)?;
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self, SequoiaError> {
        toml::from_str(contents).map_err(|e| SequoiaError::InvalidConfig(e.to_string()))
    }
}

impl FarmingConfig {
    /// Rates scaled to base units.
    pub fn rate_table(&self) -> Result<RateTable, SequoiaError> {
        let unit = Amount::from(10u8)
            .checked_pow(self.reward_decimals)
            .ok_or(SequoiaError::ArithmeticOverflow("reward decimals"))?;
        let scaled = self
            .rates
            .iter()
            .map(|&whole| {
                Amount::from(whole)
                    .checked_mul(unit)
                    .ok_or(SequoiaError::ArithmeticOverflow("scaled rate"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        RateTable::from_ordered(&scaled)
    }

    pub fn fee_policy(&self) -> Result<FeePolicy, SequoiaError> {
        FeePolicy::new(self.fee_to, self.fee_bps)
    }

    /// Build an engine with the configured rates and fee.
    pub fn build_engine(&self) -> Result<FarmingEngine, SequoiaError> {
        let fee = self.fee_policy()?;
        let mut engine = FarmingEngine::new(self.admin, self.blocks_per_day, self.rate_table()?);
        engine.set_fee_to(&self.admin, fee.recipient)?;
        engine.set_fee_bps(&self.admin, fee.fee_bps)?;
        Ok(engine)
    }
}

impl MarketConfig {
    /// Build a closed market with the configured price.
    pub fn build_market(&self) -> Result<SaleMarket, SequoiaError> {
        let mut market = SaleMarket::new(self.admin);
        market.set_price(&self.admin, Amount::from(self.price))?;
        Ok(market)
    }
}
