// crates/sequoia-cli/src/output.rs
//
// Output formatting utilities for the Sequoia CLI.
// Supports table and JSON output, plus fixed-point rendering of base-unit
// token amounts.

use serde::Serialize;
use tabled::{Table, Tabled};

use sequoia_core::types::Amount;

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Format a serializable value as a pretty-printed JSON string.
pub fn format_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("JSON serialization error: {}", e))
}

/// Render a base-unit amount as a decimal string with `decimals` places,
/// trimming trailing zeros from the fraction.
pub fn format_units(amount: Amount, decimals: u32) -> String {
    let unit = match Amount::from(10u8).checked_pow(decimals) {
        Some(unit) if decimals > 0 => unit,
        _ => return amount.to_string(),
    };
    let whole = amount / unit;
    let frac = amount % unit;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{:0width$}", frac, width = decimals as usize);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
