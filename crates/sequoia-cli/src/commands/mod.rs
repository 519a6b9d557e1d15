// crates/sequoia-cli/src/commands/mod.rs
//
// Command module declarations for the Sequoia CLI.

pub mod merkle;
pub mod rates;
pub mod simulate;
