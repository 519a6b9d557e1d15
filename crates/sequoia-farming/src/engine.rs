// crates/sequoia-farming/src/engine.rs
//
// Reward accrual for enabled positions.
//
// A position earns `rate(rarity) * (current_block - last_settle_block)`.
// Enabling (or re-enabling) a position starts a fresh window at the current
// block; any reward left unclaimed in the previous window is forfeited.
// Settling pays the accrued amount through the reward ledger and moves the
// window start to the settlement block, so a claim includes the block it
// executes in.
//
// Every mutating operation validates the whole request and computes every
// derived value before touching engine state. The ledger call is the last
// fallible step; engine state is only written after it succeeds.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use sequoia_core::error::SequoiaError;
use sequoia_core::traits::{OwnershipOracle, RarityRegistry, RewardLedger, Transfer};
use sequoia_core::types::{first_duplicate, Amount, BlockHeight, Identity, PositionId, RarityClass};

use crate::fee::{validate_bps, FeePolicy};
use crate::rates::RateTable;

/// Accrual bookkeeping for an enabled position.
///
/// Positions that were never enabled have no record and accrue nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    /// Resolved from the rarity registry on first enable; never re-read.
    pub rarity_class: RarityClass,
    /// Block at which the current accrual window was opened.
    pub enabled_at_block: BlockHeight,
    /// Block of the last successful settlement; equals `enabled_at_block`
    /// until the first claim.
    pub last_settle_block: BlockHeight,
}

/// Outcome of a successful `earn` / `earn_batch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Total accrued across the settled positions.
    pub gross: Amount,
    /// Portion routed to the fee recipient.
    pub fee: Amount,
    /// Portion paid to the claimant.
    pub net: Amount,
    pub settled_at: BlockHeight,
}

/// The farming engine: owns position accrual state and the rate table.
///
/// Collaborators (ownership, rarity, ledger) are passed into each call and
/// re-queried every time.
#[derive(Debug, Clone)]
pub struct FarmingEngine {
    admin: Identity,
    blocks_per_day: u64,
    rates: RateTable,
    fee: FeePolicy,
    positions: HashMap<PositionId, Position>,
}

impl FarmingEngine {
    /// Create an engine administered by `admin`.
    pub fn new(admin: Identity, blocks_per_day: u64, rates: RateTable) -> Self {
        Self {
            admin,
            blocks_per_day,
            rates,
            fee: FeePolicy::default(),
            positions: HashMap::new(),
        }
    }

    /// Start (or restart) accrual for every id in `ids` at `current_block`.
    ///
    /// # Errors
    /// - `DuplicateInput` if an id repeats.
    /// - `UnknownPosition` if an id was never issued or has no rarity entry.
    /// - `NotAuthorized` if `caller` neither owns nor is approved for an id.
    /// - `UnknownRarityClass` if the registry class has no configured rate.
    /// - `BlockRegression` if an enabled id was last settled after `current_block`.
    pub fn enable<O, R>(
        &mut self,
        ids: &[PositionId],
        caller: &Identity,
        current_block: BlockHeight,
        oracle: &O,
        registry: &R,
    ) -> Result<(), SequoiaError>
    where
        O: OwnershipOracle + ?Sized,
        R: RarityRegistry + ?Sized,
    {
        if let Some(dup) = first_duplicate(ids) {
            return Err(SequoiaError::DuplicateInput(dup));
        }

        let mut staged = Vec::with_capacity(ids.len());
        for &id in ids {
            check_control(oracle, caller, id)?;
            let rarity_class = match self.positions.get(&id) {
                Some(existing) => {
                    if current_block < existing.last_settle_block {
                        return Err(SequoiaError::BlockRegression {
                            current: current_block,
                            last: existing.last_settle_block,
                        });
                    }
                    existing.rarity_class
                }
                None => registry
                    .rarity_of(id)
                    .ok_or(SequoiaError::UnknownPosition(id))?,
            };
            self.rates.rate(rarity_class)?;
            staged.push(Position {
                id,
                rarity_class,
                enabled_at_block: current_block,
                last_settle_block: current_block,
            });
        }

        for position in staged {
            tracing::debug!(
                "Enabled position {} (class {}) at block {}",
                position.id,
                position.rarity_class,
                current_block
            );
            self.positions.insert(position.id, position);
        }
        Ok(())
    }

    /// Reward accrued by `id` as of `current_block`. Zero if not enabled.
    ///
    /// Fails with `BlockRegression` if `current_block` precedes the last
    /// settlement.
    pub fn pending_reward(
        &self,
        id: PositionId,
        current_block: BlockHeight,
    ) -> Result<Amount, SequoiaError> {
        match self.positions.get(&id) {
            Some(position) => self.accrued(position, current_block),
            None => Ok(0),
        }
    }

    /// Sum of `pending_reward` over `ids`. Disabled ids contribute zero.
    pub fn pending_reward_batch(
        &self,
        ids: &[PositionId],
        current_block: BlockHeight,
    ) -> Result<Amount, SequoiaError> {
        ids.iter().try_fold(0, |total: Amount, &id| {
            total
                .checked_add(self.pending_reward(id, current_block)?)
                .ok_or(SequoiaError::ArithmeticOverflow("pending reward total"))
        })
    }

    /// Settle a single position. See [`FarmingEngine::earn_batch`].
    pub fn earn<O, L>(
        &mut self,
        id: PositionId,
        caller: &Identity,
        current_block: BlockHeight,
        oracle: &O,
        ledger: &mut L,
    ) -> Result<Settlement, SequoiaError>
    where
        O: OwnershipOracle + ?Sized,
        L: RewardLedger + ?Sized,
    {
        self.earn_batch(&[id], caller, current_block, oracle, ledger)
    }

    /// Settle every id in `ids` and pay the summed reward to `caller`.
    ///
    /// All-or-nothing: if any id fails a check, or the ledger refuses the
    /// payout, no position is settled.
    ///
    /// # Errors
    /// - `DuplicateInput` if an id repeats.
    /// - `UnknownPosition` / `NotAuthorized` as for [`FarmingEngine::enable`].
    /// - `NotEnabled` if an id has no open accrual window.
    /// - `BlockRegression` if `current_block` precedes an id's last settlement.
    /// - `ArithmeticOverflow` if the reward does not fit.
    /// - `Ledger` if the payout is refused.
    pub fn earn_batch<O, L>(
        &mut self,
        ids: &[PositionId],
        caller: &Identity,
        current_block: BlockHeight,
        oracle: &O,
        ledger: &mut L,
    ) -> Result<Settlement, SequoiaError>
    where
        O: OwnershipOracle + ?Sized,
        L: RewardLedger + ?Sized,
    {
        if let Some(dup) = first_duplicate(ids) {
            return Err(SequoiaError::DuplicateInput(dup));
        }

        let mut gross: Amount = 0;
        for &id in ids {
            check_control(oracle, caller, id)?;
            let position = self
                .positions
                .get(&id)
                .ok_or(SequoiaError::NotEnabled(id))?;
            gross = gross
                .checked_add(self.accrued(position, current_block)?)
                .ok_or(SequoiaError::ArithmeticOverflow("settlement total"))?;
        }

        let (net, fee) = self.fee.split(gross)?;
        let mut transfers = vec![Transfer { to: *caller, amount: net }];
        if let Some(recipient) = self.fee.recipient.filter(|_| fee > 0) {
            transfers.push(Transfer { to: recipient, amount: fee });
        }
        ledger.transfer_all(&transfers)?;

        for id in ids {
            if let Some(position) = self.positions.get_mut(id) {
                position.last_settle_block = current_block;
            }
        }

        tracing::debug!(
            "Settled {} position(s) for {} at block {}: gross {}, fee {}",
            ids.len(),
            caller,
            current_block,
            gross,
            fee
        );

        Ok(Settlement {
            gross,
            fee,
            net,
            settled_at: current_block,
        })
    }

    /// Reward per block for `class`.
    pub fn rewards_per_block(&self, class: RarityClass) -> Result<Amount, SequoiaError> {
        self.rates.rate(class)
    }

    /// Reward per day for `class`, using the informational blocks-per-day
    /// constant.
    pub fn daily_reward(&self, class: RarityClass) -> Result<Amount, SequoiaError> {
        self.rates
            .rate(class)?
            .checked_mul(Amount::from(self.blocks_per_day))
            .ok_or(SequoiaError::ArithmeticOverflow("daily reward"))
    }

    /// Replace the fee recipient. Administrator only.
    pub fn set_fee_to(
        &mut self,
        caller: &Identity,
        recipient: Option<Identity>,
    ) -> Result<(), SequoiaError> {
        self.require_admin(caller)?;
        self.fee.recipient = recipient;
        match recipient {
            Some(r) => tracing::info!("Fee recipient set to {}", r),
            None => tracing::info!("Fee recipient cleared"),
        }
        Ok(())
    }

    /// Replace the fee fraction. Administrator only.
    pub fn set_fee_bps(&mut self, caller: &Identity, fee_bps: u16) -> Result<(), SequoiaError> {
        self.require_admin(caller)?;
        validate_bps(fee_bps)?;
        self.fee.fee_bps = fee_bps;
        tracing::info!("Fee set to {} bps", fee_bps);
        Ok(())
    }

    pub fn position(&self, id: PositionId) -> Option<&Position> {
        self.positions.get(&id)
    }

    pub fn is_enabled(&self, id: PositionId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn fee_policy(&self) -> &FeePolicy {
        &self.fee
    }

    pub fn rate_table(&self) -> &RateTable {
        &self.rates
    }

    pub fn blocks_per_day(&self) -> u64 {
        self.blocks_per_day
    }

    pub fn admin(&self) -> &Identity {
        &self.admin
    }

    fn accrued(&self, position: &Position, current_block: BlockHeight) -> Result<Amount, SequoiaError> {
        let elapsed = current_block.checked_sub(position.last_settle_block).ok_or(
            SequoiaError::BlockRegression {
                current: current_block,
                last: position.last_settle_block,
            },
        )?;
        self.rates
            .rate(position.rarity_class)?
            .checked_mul(Amount::from(elapsed))
            .ok_or(SequoiaError::ArithmeticOverflow("pending reward"))
    }

    fn require_admin(&self, caller: &Identity) -> Result<(), SequoiaError> {
        if caller != &self.admin {
            return Err(SequoiaError::NotAuthorized(format!(
                "{} is not the farming administrator",
                caller
            )));
        }
        Ok(())
    }
}

fn check_control<O>(oracle: &O, caller: &Identity, id: PositionId) -> Result<(), SequoiaError>
where
    O: OwnershipOracle + ?Sized,
{
    if !oracle.exists(id) {
        return Err(SequoiaError::UnknownPosition(id));
    }
    if !oracle.is_authorized(caller, id) {
        return Err(SequoiaError::NotAuthorized(format!(
            "{} does not control position {}",
            caller, id
        )));
    }
    Ok(())
}
