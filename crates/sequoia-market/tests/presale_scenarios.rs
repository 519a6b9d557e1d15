// crates/sequoia-market/tests/presale_scenarios.rs
//
// End-to-end sale scenarios: a collection with the market registered as
// minter, public minting, and a five-identity allowlist presale.

use sequoia_core::crypto::identity_leaf;
use sequoia_core::memory::MemoryCollection;
use sequoia_core::merkle::verify;
use sequoia_core::{Identity, MerkleTree};
use sequoia_market::{SaleMarket, SalePhase};

const OWNER: Identity = Identity::repeat(0xAA);
const DEV: Identity = Identity::repeat(0xDE);
const MARKET: Identity = Identity::repeat(0x77);
const ALICE: Identity = Identity::repeat(1);
const BOB: Identity = Identity::repeat(2);
const DAVE: Identity = Identity::repeat(3);
const JANE: Identity = Identity::repeat(4);
const MALLORY: Identity = Identity::repeat(5);

fn deploy() -> (SaleMarket, MemoryCollection) {
    let mut nft = MemoryCollection::new(OWNER);
    nft.set_operator(&OWNER, MARKET, true).unwrap();
    let mut market = SaleMarket::new(DEV);
    market.set_price(&DEV, 1).unwrap();
    (market, nft)
}

#[test]
fn test_public_mint_with_exact_deposit() {
    let (mut market, mut nft) = deploy();
    market
        .set_status(&DEV, SalePhase::try_from(2u8).unwrap())
        .unwrap();

    let amount: u32 = 1;
    let deposit = u128::from(amount) * market.price();
    let ids = market
        .mint(amount, &ALICE, deposit, &mut nft.as_minter(MARKET))
        .unwrap();
    assert_eq!(ids.len(), 1);
    assert_eq!(nft.owner_of(ids[0]), Some(ALICE));
}

#[test]
fn test_five_identity_allowlist_presale() {
    let (mut market, mut nft) = deploy();
    market
        .set_status(&DEV, SalePhase::try_from(1u8).unwrap())
        .unwrap();

    let allowlist = [ALICE, BOB, DAVE, DEV, JANE];
    let tree = MerkleTree::from_identities(&allowlist).unwrap();
    let root = tree.root();
    market.set_whitelist_merkle_root(&DEV, root).unwrap();

    // ALICE
    let leaf = identity_leaf(&ALICE);
    let proof = tree.proof(&leaf).unwrap();
    assert!(SaleMarket::verify(&root, &leaf, &proof), "ALICE");
    market
        .mint_presale(1, &proof, &ALICE, 1, &mut nft.as_minter(MARKET))
        .unwrap();

    // One chance only.
    let err = market
        .mint_presale(1, &proof, &ALICE, 1, &mut nft.as_minter(MARKET))
        .unwrap_err();
    assert_eq!(err.code(), "AlreadyClaimed");

    // BOB
    let leaf = identity_leaf(&BOB);
    let proof = tree.proof(&leaf).unwrap();
    assert!(SaleMarket::verify(&root, &leaf, &proof), "BOB");
    market
        .mint_presale(1, &proof, &BOB, 1, &mut nft.as_minter(MARKET))
        .unwrap();

    assert_eq!(nft.total_issued(), 2);
    assert_eq!(market.proceeds(), 2);
}

#[test]
fn test_every_allowlisted_identity_mints_once() {
    let (mut market, mut nft) = deploy();
    market.set_status(&DEV, SalePhase::Presale).unwrap();
    let allowlist = [ALICE, BOB, DAVE, DEV, JANE];
    let tree = MerkleTree::from_identities(&allowlist).unwrap();
    market.set_whitelist_merkle_root(&DEV, tree.root()).unwrap();

    for (i, who) in allowlist.iter().enumerate() {
        let amount = i as u32 + 1;
        let proof = tree.proof(&identity_leaf(who)).unwrap();
        market
            .mint_presale(amount, &proof, who, u128::from(amount), &mut nft.as_minter(MARKET))
            .unwrap();
        // A second call fails regardless of amount.
        let err = market
            .mint_presale(1, &proof, who, 1, &mut nft.as_minter(MARKET))
            .unwrap_err();
        assert_eq!(err.code(), "AlreadyClaimed");
    }
    assert_eq!(nft.total_issued(), 15);
}

#[test]
fn test_outsider_cannot_reuse_member_proof() {
    let (mut market, mut nft) = deploy();
    market.set_status(&DEV, SalePhase::Presale).unwrap();
    let tree = MerkleTree::from_identities(&[ALICE, BOB, DAVE]).unwrap();
    market.set_whitelist_merkle_root(&DEV, tree.root()).unwrap();

    let alice_proof = tree.proof(&identity_leaf(&ALICE)).unwrap();
    for outsider in [MALLORY, JANE] {
        let err = market
            .mint_presale(1, &alice_proof, &outsider, 1, &mut nft.as_minter(MARKET))
            .unwrap_err();
        assert_eq!(err.code(), "NotWhitelisted");
    }
    assert!(!verify(
        &tree.root(),
        &identity_leaf(&MALLORY),
        &alice_proof
    ));
}

#[test]
fn test_claims_survive_root_replacement() {
    let (mut market, mut nft) = deploy();
    market.set_status(&DEV, SalePhase::Presale).unwrap();
    let first = MerkleTree::from_identities(&[ALICE, BOB]).unwrap();
    market.set_whitelist_merkle_root(&DEV, first.root()).unwrap();
    market
        .mint_presale(
            1,
            &first.proof(&identity_leaf(&ALICE)).unwrap(),
            &ALICE,
            1,
            &mut nft.as_minter(MARKET),
        )
        .unwrap();

    let second = MerkleTree::from_identities(&[ALICE, DAVE]).unwrap();
    market.set_whitelist_merkle_root(&DEV, second.root()).unwrap();
    let err = market
        .mint_presale(
            1,
            &second.proof(&identity_leaf(&ALICE)).unwrap(),
            &ALICE,
            1,
            &mut nft.as_minter(MARKET),
        )
        .unwrap_err();
    assert_eq!(err.code(), "AlreadyClaimed");
}

#[test]
fn test_presale_payment_mismatch() {
    let (mut market, mut nft) = deploy();
    market.set_price(&DEV, 3).unwrap();
    market.set_status(&DEV, SalePhase::Presale).unwrap();
    let tree = MerkleTree::from_identities(&[ALICE, BOB]).unwrap();
    market.set_whitelist_merkle_root(&DEV, tree.root()).unwrap();
    let proof = tree.proof(&identity_leaf(&ALICE)).unwrap();

    for payment in [5, 7] {
        let err = market
            .mint_presale(2, &proof, &ALICE, payment, &mut nft.as_minter(MARKET))
            .unwrap_err();
        assert_eq!(err.code(), "IncorrectPayment");
    }
    assert!(!market.has_claimed(&ALICE));
}
