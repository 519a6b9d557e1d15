// crates/sequoia-farming/tests/farming_scenarios.rs
//
// End-to-end farming scenarios against the in-memory collaborators.
//
// `Chain` mimics an auto-mining node: every transaction lands in a fresh
// block, and `mine(n)` produces `n` empty blocks. Reads observe the latest
// block without advancing it.

use sequoia_core::memory::{MemoryCollection, MemoryLedger, MemoryRegistry};
use sequoia_core::{Amount, BlockHeight, Identity, PositionId, RarityClass};
use sequoia_farming::{FarmingEngine, RateTable, DEFAULT_BLOCKS_PER_DAY, TOKEN_UNIT};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const OWNER: Identity = Identity::repeat(0xAA);
const DEV: Identity = Identity::repeat(0xDE);
const ALICE: Identity = Identity::repeat(1);
const BOB: Identity = Identity::repeat(2);

struct Chain {
    block: BlockHeight,
}

impl Chain {
    fn new() -> Self {
        Self { block: 1 }
    }

    /// Block number the next transaction executes in.
    fn tx(&mut self) -> BlockHeight {
        self.block += 1;
        self.block
    }

    fn mine(&mut self, blocks: u64) {
        self.block += blocks;
    }

    fn head(&self) -> BlockHeight {
        self.block
    }
}

struct World {
    chain: Chain,
    registry: MemoryRegistry,
    nft: MemoryCollection,
    ledger: MemoryLedger,
    farm: FarmingEngine,
}

fn world() -> World {
    let mut chain = Chain::new();
    let mut registry = MemoryRegistry::new(OWNER);
    registry.set_operator(&OWNER, OWNER, true).unwrap();
    let ids: Vec<PositionId> = (0..10).collect();
    let classes: Vec<RarityClass> = [1u8, 4, 2, 1, 1, 3, 2, 1, 1, 1]
        .iter()
        .map(|&c| RarityClass(c))
        .collect();
    registry.set_batch(&OWNER, &ids, &classes).unwrap();
    chain.tx();

    let mut nft = MemoryCollection::new(OWNER);
    nft.set_operator(&OWNER, OWNER, true).unwrap();
    chain.tx();

    World {
        chain,
        registry,
        nft,
        ledger: MemoryLedger::with_pool(Amount::MAX),
        farm: FarmingEngine::new(OWNER, DEFAULT_BLOCKS_PER_DAY, RateTable::standard()),
    }
}

fn count_reward(w: &World, id: PositionId, blocks: u64) -> Amount {
    let class = w.farm.position(id).unwrap().rarity_class;
    w.farm.rewards_per_block(class).unwrap() * Amount::from(blocks)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_class_one_position_accrues_and_settles() {
    let mut w = world();
    let b = w.chain.tx();
    w.nft.mint(&OWNER, &ALICE, 1).unwrap();
    let enabled_at = w.chain.tx();
    w.farm
        .enable(&[0], &ALICE, enabled_at, &w.nft, &w.registry)
        .unwrap();
    assert!(enabled_at > b);

    w.chain.mine(10);
    assert_eq!(
        w.farm.pending_reward(0, w.chain.head()).unwrap(),
        150 * TOKEN_UNIT
    );

    // The earn transaction is mined one block later and includes that block.
    let at = w.chain.tx();
    let settlement = w.farm.earn(0, &ALICE, at, &w.nft, &mut w.ledger).unwrap();
    assert_eq!(settlement.net, 165 * TOKEN_UNIT);
    assert_eq!(w.ledger.balance_of(&ALICE), 165 * TOKEN_UNIT);
    assert_eq!(w.farm.pending_reward(0, w.chain.head()).unwrap(), 0);
}

#[test]
fn test_earn_with_fee_recipient_set_pays_full_reward() {
    let mut w = world();
    w.chain.tx();
    w.nft.mint(&OWNER, &ALICE, 1).unwrap();
    let at = w.chain.tx();
    w.farm.set_fee_to(&OWNER, Some(DEV)).unwrap();
    let at2 = w.chain.tx();
    w.farm.enable(&[0], &ALICE, at2, &w.nft, &w.registry).unwrap();
    assert!(at2 > at);

    w.chain.mine(10);
    let expected = count_reward(&w, 0, 10 + 1);
    let at3 = w.chain.tx();
    w.farm.earn(0, &ALICE, at3, &w.nft, &mut w.ledger).unwrap();

    assert_eq!(w.ledger.balance_of(&ALICE), expected);
    assert_eq!(w.ledger.balance_of(&DEV), 0);
    assert_eq!(w.farm.pending_reward(0, w.chain.head()).unwrap(), 0);
}

#[test]
fn test_earn_batch_pays_sum_in_one_settlement() {
    let mut w = world();
    w.chain.tx();
    w.nft.mint(&OWNER, &ALICE, 2).unwrap();
    let at = w.chain.tx();
    w.farm.enable(&[0, 1], &ALICE, at, &w.nft, &w.registry).unwrap();

    w.chain.mine(10);
    assert_ne!(
        w.farm.pending_reward_batch(&[0, 1], w.chain.head()).unwrap(),
        0
    );

    let expected = count_reward(&w, 0, 11) + count_reward(&w, 1, 11);
    let at = w.chain.tx();
    let settlement = w
        .farm
        .earn_batch(&[0, 1], &ALICE, at, &w.nft, &mut w.ledger)
        .unwrap();

    assert_eq!(settlement.gross, expected);
    assert_eq!(w.ledger.balance_of(&ALICE), expected);
    assert_eq!(w.farm.pending_reward(0, w.chain.head()).unwrap(), 0);
    assert_eq!(w.farm.pending_reward(1, w.chain.head()).unwrap(), 0);
}

#[test]
fn test_batch_equals_sum_of_singles_over_same_window() {
    let mut w = world();
    w.chain.tx();
    w.nft.mint(&OWNER, &ALICE, 6).unwrap();
    let at = w.chain.tx();
    let ids = [0, 1, 2, 5];
    w.farm.enable(&ids, &ALICE, at, &w.nft, &w.registry).unwrap();
    w.chain.mine(37);
    let settle_at = w.chain.tx();

    let mut singles_farm = w.farm.clone();
    let mut singles_ledger = w.ledger.clone();
    let singles: Amount = ids
        .iter()
        .map(|&id| {
            singles_farm
                .earn(id, &ALICE, settle_at, &w.nft, &mut singles_ledger)
                .unwrap()
                .net
        })
        .sum();

    let batch = w
        .farm
        .earn_batch(&ids, &ALICE, settle_at, &w.nft, &mut w.ledger)
        .unwrap();
    assert_eq!(batch.net, singles);
}

#[test]
fn test_enable_failures_report_stable_codes() {
    let mut w = world();
    w.chain.tx();
    w.nft.mint(&OWNER, &ALICE, 2).unwrap();

    let at = w.chain.tx();
    let dup = w.farm.enable(&[1, 1], &ALICE, at, &w.nft, &w.registry);
    assert_eq!(dup.unwrap_err().code(), "DuplicateInput");

    let at = w.chain.tx();
    let not_owner = w.farm.enable(&[0, 1], &BOB, at, &w.nft, &w.registry);
    assert_eq!(not_owner.unwrap_err().code(), "NotAuthorized");

    let at = w.chain.tx();
    let missing = w.farm.enable(&[2], &BOB, at, &w.nft, &w.registry);
    assert_eq!(missing.unwrap_err().code(), "UnknownPosition");

    assert!(!w.farm.is_enabled(0));
    assert!(!w.farm.is_enabled(1));
}

#[test]
fn test_settlements_accumulate_across_windows() {
    let mut w = world();
    w.chain.tx();
    w.nft.mint(&OWNER, &ALICE, 1).unwrap();
    let at = w.chain.tx();
    w.farm.enable(&[0], &ALICE, at, &w.nft, &w.registry).unwrap();

    w.chain.mine(4);
    let first = w.chain.tx();
    w.farm.earn(0, &ALICE, first, &w.nft, &mut w.ledger).unwrap();
    w.chain.mine(9);
    let second = w.chain.tx();
    w.farm.earn(0, &ALICE, second, &w.nft, &mut w.ledger).unwrap();

    assert_eq!(
        w.ledger.balance_of(&ALICE),
        15 * TOKEN_UNIT * Amount::from(second - at)
    );
}

#[test]
fn test_stale_block_never_rewinds_window() {
    let mut w = world();
    w.chain.tx();
    w.nft.mint(&OWNER, &ALICE, 1).unwrap();
    let enabled_at = w.chain.tx();
    w.farm
        .enable(&[0], &ALICE, enabled_at, &w.nft, &w.registry)
        .unwrap();
    w.chain.mine(5);
    let settled_at = w.chain.tx();
    w.farm
        .earn(0, &ALICE, settled_at, &w.nft, &mut w.ledger)
        .unwrap();
    let position = *w.farm.position(0).unwrap();
    let pool = w.ledger.pool();

    let stale = enabled_at - 1;
    let err = w
        .farm
        .earn(0, &ALICE, stale, &w.nft, &mut w.ledger)
        .unwrap_err();
    assert_eq!(err.code(), "BlockRegression");
    let err = w
        .farm
        .enable(&[0], &ALICE, stale, &w.nft, &w.registry)
        .unwrap_err();
    assert_eq!(err.code(), "BlockRegression");
    assert!(w.farm.pending_reward(0, stale).is_err());

    assert_eq!(*w.farm.position(0).unwrap(), position);
    assert_eq!(w.ledger.pool(), pool);
    assert!(position.last_settle_block >= position.enabled_at_block);

    w.chain.mine(9);
    assert_eq!(
        w.farm.pending_reward(0, w.chain.head()).unwrap(),
        15 * TOKEN_UNIT * 9
    );
}
