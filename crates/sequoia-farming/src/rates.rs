// crates/sequoia-farming/src/rates.rs
//
// Per-block reward rates keyed by rarity class.
//
// The stock table has four tiers, 1 through 4, paying 15, 25, 35 and 50
// reward tokens per block (in 18-decimal base units). Rates are fixed at
// construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use sequoia_core::error::SequoiaError;
use sequoia_core::types::{Amount, RarityClass};

/// One whole reward token in base units (18 decimals).
pub const TOKEN_UNIT: Amount = 1_000_000_000_000_000_000;

/// Stock per-block rates for classes 1..=4, in whole tokens.
pub const DEFAULT_RATES_WHOLE: [Amount; 4] = [15, 25, 35, 50];

/// Approximate blocks per day on the host chain. Informational only; it is
/// never part of the accrual formula.
pub const DEFAULT_BLOCKS_PER_DAY: u64 = 6_500;

/// Immutable mapping from rarity class to reward per block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    rates: BTreeMap<RarityClass, Amount>,
}

impl RateTable {
    /// Build a table from rates ordered by class: `rates[0]` is class 1.
    ///
    /// # Errors
    /// Returns `SequoiaError::InvalidConfig` if `rates` is empty or has more
    /// entries than there are rarity classes.
    pub fn from_ordered(rates: &[Amount]) -> Result<Self, SequoiaError> {
        if rates.is_empty() {
            return Err(SequoiaError::InvalidConfig(
                "rate table must have at least one rarity class".to_string(),
            ));
        }
        if rates.len() > usize::from(u8::MAX) {
            return Err(SequoiaError::InvalidConfig(format!(
                "rate table has {} classes, at most {} supported",
                rates.len(),
                u8::MAX
            )));
        }
        let rates = rates
            .iter()
            .enumerate()
            .map(|(i, &rate)| (RarityClass(i as u8 + 1), rate))
            .collect();
        Ok(Self { rates })
    }

    /// The stock four-tier table in base units.
    pub fn standard() -> Self {
        let rates = DEFAULT_RATES_WHOLE
            .iter()
            .enumerate()
            .map(|(i, &whole)| (RarityClass(i as u8 + 1), whole * TOKEN_UNIT))
            .collect();
        Self { rates }
    }

    /// Reward per block for `class`.
    ///
    /// # Errors
    /// Returns `SequoiaError::UnknownRarityClass` if the class has no rate.
    pub fn rate(&self, class: RarityClass) -> Result<Amount, SequoiaError> {
        self.rates
            .get(&class)
            .copied()
            .ok_or(SequoiaError::UnknownRarityClass(class))
    }

    pub fn iter(&self) -> impl Iterator<Item = (RarityClass, Amount)> + '_ {
        self.rates.iter().map(|(class, rate)| (*class, *rate))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
