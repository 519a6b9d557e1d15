// crates/sequoia-market/src/market.rs
//
// Phased sale of new positions.
//
// Public mint: open to anyone while the phase is `Public`, unlimited per
// identity. Presale mint: open while the phase is `Presale` to identities
// proven against the current allowlist root, once per identity regardless of
// the amount minted. Both require payment of exactly `amount * price`.
//
// Requests are validated in full before the minter is called; the claim
// record and proceeds are only written once issuance has succeeded.

use std::collections::HashSet;

use sequoia_core::crypto::identity_leaf;
use sequoia_core::error::SequoiaError;
use sequoia_core::merkle;
use sequoia_core::traits::PositionMinter;
use sequoia_core::types::{format_hash32, Amount, Hash32, Identity, PositionId};

use crate::phase::SalePhase;

/// Sale state: phase, price, allowlist root, presale claims, and proceeds.
#[derive(Debug, Clone)]
pub struct SaleMarket {
    admin: Identity,
    phase: SalePhase,
    price: Amount,
    merkle_root: Hash32,
    claimed: HashSet<Identity>,
    proceeds: Amount,
}

impl SaleMarket {
    /// Create a closed market with price zero and an empty allowlist root.
    /// `admin` controls the setters and receives the proceeds.
    pub fn new(admin: Identity) -> Self {
        Self {
            admin,
            phase: SalePhase::Closed,
            price: 0,
            merkle_root: [0u8; 32],
            claimed: HashSet::new(),
            proceeds: 0,
        }
    }

    pub fn set_status(&mut self, caller: &Identity, phase: SalePhase) -> Result<(), SequoiaError> {
        self.require_admin(caller)?;
        self.phase = phase;
        tracing::info!("Sale phase set to {}", phase);
        Ok(())
    }

    pub fn set_price(&mut self, caller: &Identity, price: Amount) -> Result<(), SequoiaError> {
        self.require_admin(caller)?;
        self.price = price;
        tracing::info!("Sale price set to {}", price);
        Ok(())
    }

    /// Replace the allowlist. Existing presale claims remain recorded.
    pub fn set_whitelist_merkle_root(
        &mut self,
        caller: &Identity,
        root: Hash32,
    ) -> Result<(), SequoiaError> {
        self.require_admin(caller)?;
        self.merkle_root = root;
        tracing::info!("Allowlist root set to {}", format_hash32(&root));
        Ok(())
    }

    /// Whether `proof` places `leaf` under `root` (sorted-pair Keccak-256).
    pub fn verify(root: &Hash32, leaf: &Hash32, proof: &[Hash32]) -> bool {
        merkle::verify(root, leaf, proof)
    }

    /// Payment due for `amount` positions at the current price.
    pub fn required_payment(&self, amount: u32) -> Result<Amount, SequoiaError> {
        self.price
            .checked_mul(Amount::from(amount))
            .ok_or(SequoiaError::ArithmeticOverflow("sale payment"))
    }

    /// Public mint.
    ///
    /// # Errors
    /// - `WrongPhase` unless the phase is `Public`.
    /// - `ZeroAmount` if `amount` is zero.
    /// - `IncorrectPayment` unless `payment == amount * price`.
    /// - `Mint` if the minter refuses.
    pub fn mint<M>(
        &mut self,
        amount: u32,
        caller: &Identity,
        payment: Amount,
        minter: &mut M,
    ) -> Result<Vec<PositionId>, SequoiaError>
    where
        M: PositionMinter + ?Sized,
    {
        self.require_phase(SalePhase::Public)?;
        let proceeds = self.check_payment(amount, payment)?;

        let ids = minter.issue(caller, amount)?;
        self.proceeds = proceeds;
        tracing::debug!("Public mint of {} position(s) to {}", ids.len(), caller);
        Ok(ids)
    }

    /// Allowlisted presale mint, once per identity.
    ///
    /// # Errors
    /// - `WrongPhase` unless the phase is `Presale`.
    /// - `AlreadyClaimed` if `caller` already completed a presale mint.
    /// - `NotWhitelisted` if `proof` does not place `caller` under the root.
    /// - `ZeroAmount` if `amount` is zero.
    /// - `IncorrectPayment` unless `payment == amount * price`.
    /// - `Mint` if the minter refuses.
    pub fn mint_presale<M>(
        &mut self,
        amount: u32,
        proof: &[Hash32],
        caller: &Identity,
        payment: Amount,
        minter: &mut M,
    ) -> Result<Vec<PositionId>, SequoiaError>
    where
        M: PositionMinter + ?Sized,
    {
        self.require_phase(SalePhase::Presale)?;
        if self.claimed.contains(caller) {
            return Err(SequoiaError::AlreadyClaimed(*caller));
        }
        if !Self::verify(&self.merkle_root, &identity_leaf(caller), proof) {
            return Err(SequoiaError::NotWhitelisted(*caller));
        }
        let proceeds = self.check_payment(amount, payment)?;

        let ids = minter.issue(caller, amount)?;
        self.claimed.insert(*caller);
        self.proceeds = proceeds;
        tracing::debug!("Presale mint of {} position(s) to {}", ids.len(), caller);
        Ok(ids)
    }

    /// Hand the accumulated proceeds to the administrator, resetting them.
    pub fn take_proceeds(&mut self, caller: &Identity) -> Result<Amount, SequoiaError> {
        self.require_admin(caller)?;
        let taken = std::mem::take(&mut self.proceeds);
        tracing::info!("Withdrew {} in sale proceeds", taken);
        Ok(taken)
    }

    pub fn has_claimed(&self, identity: &Identity) -> bool {
        self.claimed.contains(identity)
    }

    pub fn phase(&self) -> SalePhase {
        self.phase
    }

    pub fn price(&self) -> Amount {
        self.price
    }

    pub fn merkle_root(&self) -> Hash32 {
        self.merkle_root
    }

    pub fn proceeds(&self) -> Amount {
        self.proceeds
    }

    pub fn admin(&self) -> &Identity {
        &self.admin
    }

    fn require_admin(&self, caller: &Identity) -> Result<(), SequoiaError> {
        if caller != &self.admin {
            return Err(SequoiaError::NotAuthorized(format!(
                "{} is not the market administrator",
                caller
            )));
        }
        Ok(())
    }

    fn require_phase(&self, expected: SalePhase) -> Result<(), SequoiaError> {
        if self.phase != expected {
            return Err(SequoiaError::WrongPhase(format!(
                "mint requires {} phase, market is {}",
                expected, self.phase
            )));
        }
        Ok(())
    }

    /// Validate amount and payment; returns the proceeds after this sale.
    fn check_payment(&self, amount: u32, payment: Amount) -> Result<Amount, SequoiaError> {
        if amount == 0 {
            return Err(SequoiaError::ZeroAmount);
        }
        let expected = self.required_payment(amount)?;
        if payment != expected {
            return Err(SequoiaError::IncorrectPayment {
                expected,
                actual: payment,
            });
        }
        self.proceeds
            .checked_add(payment)
            .ok_or(SequoiaError::ArithmeticOverflow("sale proceeds"))
    }
}
