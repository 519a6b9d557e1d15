// crates/sequoia-core/src/lib.rs
//
// sequoia-core: Core types, collaborator traits, and Merkle allowlist
// primitives shared by the Sequoia farming engine and sale market.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It owns no engine state: the farming engine lives in `sequoia-farming`,
// the sale market in `sequoia-market`.

pub mod crypto;
pub mod error;
pub mod memory;
pub mod merkle;
pub mod traits;
pub mod types;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use sequoia_core::Identity;`

pub use error::{ErrorKind, SequoiaError};
pub use merkle::MerkleTree;
pub use traits::{OwnershipOracle, PositionMinter, RarityRegistry, RewardLedger, Transfer};
pub use types::{Amount, BlockHeight, Hash32, Identity, PositionId, RarityClass};
