// crates/sequoia-market/src/lib.rs
//
// sequoia-market: phased sale of Sequoia positions with a Merkle allowlist
// presale and strict once-per-identity presale claims.

pub mod market;
pub mod phase;

pub use market::SaleMarket;
pub use phase::SalePhase;
