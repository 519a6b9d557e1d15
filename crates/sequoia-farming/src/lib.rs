// crates/sequoia-farming/src/lib.rs
//
// sequoia-farming: block-based reward accrual for rarity-tiered positions.
//
// Holders enable positions for farming and later settle the accrued reward,
// paid through an external reward ledger. All amounts are in the reward
// token's smallest unit.

pub mod engine;
pub mod fee;
pub mod rates;

pub use engine::{FarmingEngine, Position, Settlement};
pub use fee::{FeePolicy, BPS_DENOMINATOR};
pub use rates::{RateTable, DEFAULT_BLOCKS_PER_DAY, DEFAULT_RATES_WHOLE, TOKEN_UNIT};
