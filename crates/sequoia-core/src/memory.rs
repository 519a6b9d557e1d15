// crates/sequoia-core/src/memory.rs
//
// In-memory collaborators: a rarity registry, a position collection (ownership,
// approvals, minting), and a reward ledger. They back the CLI simulation and
// the test suites; a host environment supplies its own implementations of the
// traits in `crate::traits`.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::SequoiaError;
use crate::traits::{OwnershipOracle, PositionMinter, RarityRegistry, RewardLedger, Transfer};
use crate::types::{Amount, Identity, PositionId, RarityClass};

/// Rarity registry with an owner and a set of operators allowed to write.
#[derive(Debug, Clone)]
pub struct MemoryRegistry {
    owner: Identity,
    operators: HashSet<Identity>,
    classes: HashMap<PositionId, RarityClass>,
}

impl MemoryRegistry {
    pub fn new(owner: Identity) -> Self {
        Self {
            owner,
            operators: HashSet::new(),
            classes: HashMap::new(),
        }
    }

    /// Grant or revoke write access. Owner only.
    pub fn set_operator(
        &mut self,
        caller: &Identity,
        operator: Identity,
        enabled: bool,
    ) -> Result<(), SequoiaError> {
        if caller != &self.owner {
            return Err(SequoiaError::NotAuthorized(format!(
                "{} is not the registry owner",
                caller
            )));
        }
        if enabled {
            self.operators.insert(operator);
        } else {
            self.operators.remove(&operator);
        }
        Ok(())
    }

    /// Assign rarity classes to positions. Operators only.
    ///
    /// # Errors
    /// Returns `SequoiaError::InvalidConfig` if the slices differ in length.
    pub fn set_batch(
        &mut self,
        caller: &Identity,
        ids: &[PositionId],
        classes: &[RarityClass],
    ) -> Result<(), SequoiaError> {
        if !self.operators.contains(caller) {
            return Err(SequoiaError::NotAuthorized(format!(
                "{} is not a registry operator",
                caller
            )));
        }
        if ids.len() != classes.len() {
            return Err(SequoiaError::InvalidConfig(format!(
                "{} ids but {} rarity classes",
                ids.len(),
                classes.len()
            )));
        }
        self.classes
            .extend(ids.iter().copied().zip(classes.iter().copied()));
        Ok(())
    }
}

impl RarityRegistry for MemoryRegistry {
    fn rarity_of(&self, id: PositionId) -> Option<RarityClass> {
        self.classes.get(&id).copied()
    }
}

/// Position collection: ownership, per-token approvals, operator approvals,
/// and operator-gated minting with sequential ids starting at 0.
#[derive(Debug, Clone)]
pub struct MemoryCollection {
    owner: Identity,
    minters: HashSet<Identity>,
    owners: BTreeMap<PositionId, Identity>,
    token_approvals: HashMap<PositionId, Identity>,
    operator_approvals: HashSet<(Identity, Identity)>,
    next_id: PositionId,
}

impl MemoryCollection {
    pub fn new(owner: Identity) -> Self {
        Self {
            owner,
            minters: HashSet::new(),
            owners: BTreeMap::new(),
            token_approvals: HashMap::new(),
            operator_approvals: HashSet::new(),
            next_id: 0,
        }
    }

    /// Grant or revoke minting rights. Owner only.
    pub fn set_operator(
        &mut self,
        caller: &Identity,
        minter: Identity,
        enabled: bool,
    ) -> Result<(), SequoiaError> {
        if caller != &self.owner {
            return Err(SequoiaError::NotAuthorized(format!(
                "{} is not the collection owner",
                caller
            )));
        }
        if enabled {
            self.minters.insert(minter);
        } else {
            self.minters.remove(&minter);
        }
        Ok(())
    }

    /// Mint `amount` positions to `to` on behalf of `minter`.
    pub fn mint(
        &mut self,
        minter: &Identity,
        to: &Identity,
        amount: u32,
    ) -> Result<Vec<PositionId>, SequoiaError> {
        if !self.minters.contains(minter) {
            return Err(SequoiaError::Mint(format!("{} is not a minter", minter)));
        }
        let last = self
            .next_id
            .checked_add(u64::from(amount))
            .ok_or(SequoiaError::ArithmeticOverflow("position id"))?;
        let ids: Vec<PositionId> = (self.next_id..last).collect();
        for id in &ids {
            self.owners.insert(*id, *to);
        }
        self.next_id = last;
        Ok(ids)
    }

    pub fn owner_of(&self, id: PositionId) -> Option<Identity> {
        self.owners.get(&id).copied()
    }

    /// Approve `spender` for a single position. Owner of the position only.
    pub fn approve(
        &mut self,
        caller: &Identity,
        spender: Identity,
        id: PositionId,
    ) -> Result<(), SequoiaError> {
        match self.owners.get(&id) {
            None => Err(SequoiaError::UnknownPosition(id)),
            Some(owner) if owner != caller => Err(SequoiaError::NotAuthorized(format!(
                "{} does not own position {}",
                caller, id
            ))),
            Some(_) => {
                self.token_approvals.insert(id, spender);
                Ok(())
            }
        }
    }

    /// Approve or revoke `operator` for every position `caller` owns.
    pub fn set_approval_for_all(&mut self, caller: &Identity, operator: Identity, approved: bool) {
        if approved {
            self.operator_approvals.insert((*caller, operator));
        } else {
            self.operator_approvals.remove(&(*caller, operator));
        }
    }

    /// Move a position. Clears its single-token approval.
    pub fn transfer(
        &mut self,
        caller: &Identity,
        to: Identity,
        id: PositionId,
    ) -> Result<(), SequoiaError> {
        if !self.exists(id) {
            return Err(SequoiaError::UnknownPosition(id));
        }
        if !self.is_authorized(caller, id) {
            return Err(SequoiaError::NotAuthorized(format!(
                "{} cannot transfer position {}",
                caller, id
            )));
        }
        self.owners.insert(id, to);
        self.token_approvals.remove(&id);
        Ok(())
    }

    /// View of this collection that mints as `minter`.
    pub fn as_minter(&mut self, minter: Identity) -> CollectionMinter<'_> {
        CollectionMinter {
            collection: self,
            minter,
        }
    }

    pub fn total_issued(&self) -> u64 {
        self.next_id
    }
}

impl OwnershipOracle for MemoryCollection {
    fn exists(&self, id: PositionId) -> bool {
        self.owners.contains_key(&id)
    }

    fn is_authorized(&self, caller: &Identity, id: PositionId) -> bool {
        let Some(owner) = self.owners.get(&id) else {
            return false;
        };
        owner == caller
            || self.token_approvals.get(&id) == Some(caller)
            || self.operator_approvals.contains(&(*owner, *caller))
    }
}

/// A [`PositionMinter`] that issues from a [`MemoryCollection`] under a fixed
/// minter identity (typically the sale market's own identity).
#[derive(Debug)]
pub struct CollectionMinter<'a> {
    collection: &'a mut MemoryCollection,
    minter: Identity,
}

impl PositionMinter for CollectionMinter<'_> {
    fn issue(&mut self, to: &Identity, amount: u32) -> Result<Vec<PositionId>, SequoiaError> {
        self.collection.mint(&self.minter, to, amount)
    }
}

/// Reward ledger with a finite pool and per-identity balances.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    pool: Amount,
    balances: HashMap<Identity, Amount>,
}

impl MemoryLedger {
    pub fn with_pool(pool: Amount) -> Self {
        Self {
            pool,
            balances: HashMap::new(),
        }
    }

    pub fn pool(&self) -> Amount {
        self.pool
    }

    pub fn balance_of(&self, who: &Identity) -> Amount {
        self.balances.get(who).copied().unwrap_or(0)
    }

    pub fn fund(&mut self, amount: Amount) -> Result<(), SequoiaError> {
        self.pool = self
            .pool
            .checked_add(amount)
            .ok_or(SequoiaError::ArithmeticOverflow("ledger pool"))?;
        Ok(())
    }
}

impl RewardLedger for MemoryLedger {
    fn transfer(&mut self, to: &Identity, amount: Amount) -> Result<(), SequoiaError> {
        if amount > self.pool {
            return Err(SequoiaError::Ledger(format!(
                "insufficient pool: requested {} but only {} available",
                amount, self.pool
            )));
        }
        let balance = self.balance_of(to);
        let credited = balance
            .checked_add(amount)
            .ok_or(SequoiaError::ArithmeticOverflow("ledger balance"))?;
        self.pool -= amount;
        self.balances.insert(*to, credited);
        Ok(())
    }

    fn can_cover(&self, total: Amount) -> bool {
        total <= self.pool
    }

    fn transfer_all(&mut self, transfers: &[Transfer]) -> Result<(), SequoiaError> {
        // Stage on a copy so a late failure (balance overflow) leaves no trace.
        let mut staged = self.clone();
        for t in transfers.iter().filter(|t| t.amount > 0) {
            staged.transfer(&t.to, t.amount)?;
        }
        *self = staged;
        Ok(())
    }
}
