// crates/sequoia-cli/src/commands/simulate.rs
//
// `sequoia simulate`: run the canned farming and presale scenarios
// against in-memory collaborators, using the configured rates, fee and price.
//
// The farming scenario models an auto-mining chain: every transaction lands
// in a new block, so a claim sent after N idle blocks settles N + 1 blocks.

use clap::Args;
use serde::Serialize;

use sequoia_core::crypto::identity_leaf;
use sequoia_core::memory::{MemoryCollection, MemoryLedger, MemoryRegistry};
use sequoia_core::types::{format_hash32, Amount, BlockHeight, Identity, PositionId, RarityClass};
use sequoia_core::{MerkleTree, SequoiaError};
use sequoia_market::SalePhase;

use crate::config::SequoiaConfig;
use crate::output::{format_json, format_units};

const COLLECTION_OWNER: Identity = Identity::repeat(0xAA);
const MARKET: Identity = Identity::repeat(0x77);
const HOLDER: Identity = Identity::repeat(0x01);

/// Arguments for `sequoia simulate`.
#[derive(Debug, Args)]
pub struct SimulateCmd {
    /// Idle blocks between enabling and claiming.
    #[arg(long, default_value_t = 10)]
    blocks: u64,
    /// Rarity class of the farmed position.
    #[arg(long, default_value_t = 1)]
    class: u8,
    /// Emit JSON instead of plain text.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub farming: FarmingReport,
    pub presale: PresaleReport,
}

#[derive(Debug, Serialize)]
pub struct FarmingReport {
    pub position: PositionId,
    pub class: RarityClass,
    pub enabled_at: BlockHeight,
    /// Pending reward observed after the idle blocks, before claiming.
    pub pending: Amount,
    pub settled_at: BlockHeight,
    pub gross: Amount,
    pub fee: Amount,
    pub net: Amount,
    pub holder_balance: Amount,
}

#[derive(Debug, Serialize)]
pub struct PresaleReport {
    pub root: String,
    pub mints: Vec<PresaleMint>,
    /// Whether every second presale attempt was refused.
    pub repeats_refused: bool,
    pub proceeds: Amount,
}

#[derive(Debug, Serialize)]
pub struct PresaleMint {
    pub identity: Identity,
    pub positions: Vec<PositionId>,
}

/// Run `sequoia simulate`.
pub fn run(cmd: &SimulateCmd, config: &SequoiaConfig) -> Result<(), Box<dyn std::error::Error>> {
    let report = SimulationReport {
        farming: simulate_farming(config, RarityClass(cmd.class), cmd.blocks)?,
        presale: simulate_presale(config)?,
    };

    if cmd.json {
        println!("{}", format_json(&report));
        return Ok(());
    }

    let decimals = config.farming.reward_decimals;
    let f = &report.farming;
    println!("Farming");
    println!("-------");
    println!(
        "  Position {} (class {}) enabled at block {}",
        f.position, f.class, f.enabled_at
    );
    println!("  Pending before claim: {}", format_units(f.pending, decimals));
    println!(
        "  Settled at block {}: gross {}, fee {}, net {}",
        f.settled_at,
        format_units(f.gross, decimals),
        format_units(f.fee, decimals),
        format_units(f.net, decimals)
    );
    println!();

    let p = &report.presale;
    println!("Presale");
    println!("-------");
    println!("  Allowlist root: {}", p.root);
    for mint in &p.mints {
        println!("  {} minted {:?}", mint.identity, mint.positions);
    }
    println!("  Second attempts refused: {}", p.repeats_refused);
    println!("  Proceeds: {}", p.proceeds);
    Ok(())
}

/// Enable one position of `class`, idle for `blocks`, then claim.
pub fn simulate_farming(
    config: &SequoiaConfig,
    class: RarityClass,
    blocks: u64,
) -> Result<FarmingReport, SequoiaError> {
    let mut engine = config.farming.build_engine()?;
    let mut block: BlockHeight = 1;

    let mut registry = MemoryRegistry::new(COLLECTION_OWNER);
    registry.set_operator(&COLLECTION_OWNER, COLLECTION_OWNER, true)?;
    let mut collection = MemoryCollection::new(COLLECTION_OWNER);
    collection.set_operator(&COLLECTION_OWNER, COLLECTION_OWNER, true)?;

    block += 1;
    let ids = collection.mint(&COLLECTION_OWNER, &HOLDER, 1)?;
    let position = *ids
        .first()
        .ok_or_else(|| SequoiaError::Mint("collection issued no position".to_string()))?;
    registry.set_batch(&COLLECTION_OWNER, &ids, &[class])?;

    block += 1;
    let enabled_at = block;
    engine.enable(&ids, &HOLDER, enabled_at, &collection, &registry)?;

    block += blocks;
    let pending = engine.pending_reward(position, block)?;

    block += 1;
    let mut ledger = MemoryLedger::with_pool(Amount::MAX);
    let settlement = engine.earn(position, &HOLDER, block, &collection, &mut ledger)?;
    tracing::info!(
        "Simulated farming: position {} settled {} at block {}",
        position,
        settlement.gross,
        settlement.settled_at
    );

    Ok(FarmingReport {
        position,
        class,
        enabled_at,
        pending,
        settled_at: settlement.settled_at,
        gross: settlement.gross,
        fee: settlement.fee,
        net: settlement.net,
        holder_balance: ledger.balance_of(&HOLDER),
    })
}

/// Five-identity allowlist presale: every member mints once, then tries again.
pub fn simulate_presale(config: &SequoiaConfig) -> Result<PresaleReport, SequoiaError> {
    let admin = config.market.admin;
    let mut market = config.market.build_market()?;
    let mut collection = MemoryCollection::new(COLLECTION_OWNER);
    collection.set_operator(&COLLECTION_OWNER, MARKET, true)?;

    let allowlist = [
        Identity::repeat(0x01),
        Identity::repeat(0x02),
        Identity::repeat(0x03),
        admin,
        Identity::repeat(0x04),
    ];
    let tree = MerkleTree::from_identities(&allowlist)?;
    market.set_whitelist_merkle_root(&admin, tree.root())?;
    market.set_status(&admin, SalePhase::Presale)?;

    let mut mints = Vec::with_capacity(allowlist.len());
    let mut repeats_refused = true;
    for who in &allowlist {
        let proof = tree
            .proof(&identity_leaf(who))
            .ok_or(SequoiaError::NotWhitelisted(*who))?;
        let payment = market.required_payment(1)?;
        let mut minter = collection.as_minter(MARKET);
        let positions = market.mint_presale(1, &proof, who, payment, &mut minter)?;

        let repeat = market.mint_presale(1, &proof, who, payment, &mut minter);
        repeats_refused &= matches!(repeat, Err(SequoiaError::AlreadyClaimed(_)));

        mints.push(PresaleMint {
            identity: *who,
            positions,
        });
    }
    tracing::info!(
        "Simulated presale: {} mints, {} proceeds",
        mints.len(),
        market.proceeds()
    );

    Ok(PresaleReport {
        root: format_hash32(&tree.root()),
        mints,
        repeats_refused,
        proceeds: market.proceeds(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sequoia_farming::TOKEN_UNIT;

    use crate::config::FarmingConfig;

    #[test]
    fn test_farming_default_settles_eleven_blocks() {
        let report = simulate_farming(&SequoiaConfig::default(), RarityClass(1), 10).unwrap();
        assert_eq!(report.pending, 150 * TOKEN_UNIT);
        assert_eq!(report.gross, 165 * TOKEN_UNIT);
        assert_eq!(report.holder_balance, 165 * TOKEN_UNIT);
        assert_eq!(report.settled_at - report.enabled_at, 11);
    }

    #[test]
    fn test_farming_fee_reduces_holder_balance() {
        let config = SequoiaConfig {
            farming: FarmingConfig {
                fee_bps: 2_000,
                fee_to: Some(Identity::repeat(0xDE)),
                ..FarmingConfig::default()
            },
            ..SequoiaConfig::default()
        };
        let report = simulate_farming(&config, RarityClass(2), 3).unwrap();
        assert_eq!(report.gross, 100 * TOKEN_UNIT);
        assert_eq!(report.fee, 20 * TOKEN_UNIT);
        assert_eq!(report.holder_balance, 80 * TOKEN_UNIT);
    }

    #[test]
    fn test_farming_unknown_class_fails() {
        let err = simulate_farming(&SequoiaConfig::default(), RarityClass(7), 1).unwrap_err();
        assert_eq!(err.code(), "UnknownRarityClass");
    }

    #[test]
    fn test_presale_every_member_once() {
        let report = simulate_presale(&SequoiaConfig::default()).unwrap();
        assert_eq!(report.mints.len(), 5);
        assert!(report.repeats_refused);
        assert_eq!(report.proceeds, 5);
        let issued: Vec<PositionId> = report
            .mints
            .iter()
            .flat_map(|m| m.positions.iter().copied())
            .collect();
        assert_eq!(issued, vec![0, 1, 2, 3, 4]);
    }
}
