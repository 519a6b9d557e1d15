// crates/sequoia-core/src/traits.rs
//
// Interfaces to the external collaborators the engines consult. Each engine
// operation receives its collaborators by reference; nothing is cached across
// calls.

use serde::{Deserialize, Serialize};

use crate::error::SequoiaError;
use crate::types::{Amount, Identity, PositionId, RarityClass};

/// Read-only source of a position's rarity class.
///
/// Implemented by `memory::MemoryRegistry`.
pub trait RarityRegistry {
    /// Rarity class of `id`, or `None` if the registry has no entry.
    fn rarity_of(&self, id: PositionId) -> Option<RarityClass>;
}

/// Answers who controls a position.
///
/// Implemented by `memory::MemoryCollection`.
pub trait OwnershipOracle {
    /// Whether the position has been issued.
    fn exists(&self, id: PositionId) -> bool;

    /// Whether `caller` owns `id` or is an approved operator for it.
    fn is_authorized(&self, caller: &Identity, id: PositionId) -> bool;
}

/// A single payout line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub to: Identity,
    pub amount: Amount,
}

/// Fungible reward ledger that pays out settled rewards.
///
/// Implemented by `memory::MemoryLedger`.
pub trait RewardLedger {
    /// Move `amount` from the reward pool to `to`.
    fn transfer(&mut self, to: &Identity, amount: Amount) -> Result<(), SequoiaError>;

    /// Whether the pool can currently pay out `total`.
    fn can_cover(&self, total: Amount) -> bool;

    /// Pay every line or none of them.
    ///
    /// The default pre-checks the summed total with [`RewardLedger::can_cover`]
    /// and then transfers line by line. Ledgers that can fail for reasons other
    /// than pool size must override this.
    fn transfer_all(&mut self, transfers: &[Transfer]) -> Result<(), SequoiaError> {
        let total = transfers
            .iter()
            .try_fold(0u128, |acc, t| acc.checked_add(t.amount))
            .ok_or(SequoiaError::ArithmeticOverflow("transfer total"))?;
        if !self.can_cover(total) {
            return Err(SequoiaError::Ledger(format!(
                "reward pool cannot cover {}",
                total
            )));
        }
        for t in transfers.iter().filter(|t| t.amount > 0) {
            self.transfer(&t.to, t.amount)?;
        }
        Ok(())
    }
}

/// Issues new positions to a buyer.
///
/// Implemented by `memory::MemoryCollection`.
pub trait PositionMinter {
    /// Issue `amount` new positions to `to`, returning their ids.
    fn issue(&mut self, to: &Identity, amount: u32) -> Result<Vec<PositionId>, SequoiaError>;
}
