// crates/sequoia-cli/src/commands/rates.rs
//
// `sequoia rates` and `sequoia quote`: inspect the configured reward table.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use sequoia_core::error::SequoiaError;
use sequoia_core::types::{Amount, RarityClass};
use sequoia_farming::FarmingEngine;

use crate::config::SequoiaConfig;
use crate::output::{format_json, format_table, format_units};

/// A row in the rate table display.
#[derive(Tabled)]
struct RateRow {
    #[tabled(rename = "Class")]
    class: u8,
    #[tabled(rename = "Per block")]
    per_block: String,
    #[tabled(rename = "Per day")]
    per_day: String,
}

/// Arguments for `sequoia quote`.
#[derive(Debug, Args)]
pub struct QuoteCmd {
    /// Rarity class of the position.
    #[arg(long)]
    class: u8,
    /// Number of blocks the position accrues for.
    #[arg(long)]
    blocks: u64,
    /// Emit JSON instead of plain text.
    #[arg(long)]
    json: bool,
}

/// Result of a quote, in base units.
#[derive(Debug, Serialize)]
pub struct Quote {
    pub class: RarityClass,
    pub blocks: u64,
    pub gross: Amount,
    pub fee: Amount,
    pub net: Amount,
}

/// Run `sequoia rates`.
pub fn run_rates(config: &SequoiaConfig) -> Result<(), Box<dyn std::error::Error>> {
    let engine = config.farming.build_engine()?;
    let decimals = config.farming.reward_decimals;

    let rows = engine
        .rate_table()
        .iter()
        .map(|(class, per_block)| {
            Ok(RateRow {
                class: class.0,
                per_block: format_units(per_block, decimals),
                per_day: format_units(engine.daily_reward(class)?, decimals),
            })
        })
        .collect::<Result<Vec<_>, SequoiaError>>()?;

    println!("Reward rates ({} blocks/day)", engine.blocks_per_day());
    println!("{}", format_table(&rows));
    Ok(())
}

/// Run `sequoia quote`.
pub fn run_quote(cmd: &QuoteCmd, config: &SequoiaConfig) -> Result<(), Box<dyn std::error::Error>> {
    let engine = config.farming.build_engine()?;
    let quote = quote(&engine, RarityClass(cmd.class), cmd.blocks)?;

    if cmd.json {
        println!("{}", format_json(&quote));
        return Ok(());
    }

    let decimals = config.farming.reward_decimals;
    println!(
        "Class {} over {} blocks: {}",
        quote.class,
        quote.blocks,
        format_units(quote.gross, decimals)
    );
    if quote.fee > 0 {
        println!("  Fee: {}", format_units(quote.fee, decimals));
        println!("  Net: {}", format_units(quote.net, decimals));
    }
    Ok(())
}

/// Reward a position of `class` accrues over `blocks`, split by the engine's
/// fee policy.
pub fn quote(engine: &FarmingEngine, class: RarityClass, blocks: u64) -> Result<Quote, SequoiaError> {
    let gross = engine
        .rewards_per_block(class)?
        .checked_mul(Amount::from(blocks))
        .ok_or(SequoiaError::ArithmeticOverflow("quoted reward"))?;
    let (net, fee) = engine.fee_policy().split(gross)?;
    Ok(Quote {
        class,
        blocks,
        gross,
        fee,
        net,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sequoia_core::Identity;
    use sequoia_farming::TOKEN_UNIT;

    use crate::config::FarmingConfig;

    #[test]
    fn test_quote_default_rates() {
        let engine = FarmingConfig::default().build_engine().unwrap();
        let q = quote(&engine, RarityClass(1), 11).unwrap();
        assert_eq!(q.gross, 165 * TOKEN_UNIT);
        assert_eq!(q.net, q.gross);
        assert_eq!(q.fee, 0);
    }

    #[test]
    fn test_quote_with_fee() {
        let farming = FarmingConfig {
            fee_bps: 1_000,
            fee_to: Some(Identity::repeat(0xDE)),
            ..FarmingConfig::default()
        };
        let engine = farming.build_engine().unwrap();
        let q = quote(&engine, RarityClass(4), 10).unwrap();
        assert_eq!(q.gross, 500 * TOKEN_UNIT);
        assert_eq!(q.fee, 50 * TOKEN_UNIT);
        assert_eq!(q.net, 450 * TOKEN_UNIT);
    }

    #[test]
    fn test_quote_unknown_class() {
        let engine = FarmingConfig::default().build_engine().unwrap();
        let err = quote(&engine, RarityClass(9), 1).unwrap_err();
        assert_eq!(err.code(), "UnknownRarityClass");
    }
}
