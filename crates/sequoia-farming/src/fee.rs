// crates/sequoia-farming/src/fee.rs
//
// Fee skimming on settled rewards.
//
// A fee is only taken when a recipient is set and `fee_bps` is non-zero. The
// default policy is pass-through: the full settled amount reaches the
// claimant.

use serde::{Deserialize, Serialize};

use sequoia_core::error::SequoiaError;
use sequoia_core::types::{Amount, Identity};

/// Basis-point denominator (10_000 bps = 100%).
pub const BPS_DENOMINATOR: u16 = 10_000;

/// Destination and size of the fee taken from each settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeePolicy {
    /// Where the fee goes. `None` disables the fee regardless of `fee_bps`.
    pub recipient: Option<Identity>,
    /// Fee in basis points of the settled amount.
    pub fee_bps: u16,
}

impl FeePolicy {
    /// # Errors
    /// Returns `SequoiaError::InvalidConfig` if `fee_bps` exceeds 10_000.
    pub fn new(recipient: Option<Identity>, fee_bps: u16) -> Result<Self, SequoiaError> {
        validate_bps(fee_bps)?;
        Ok(Self { recipient, fee_bps })
    }

    /// Split a settled amount into `(net, fee)`.
    pub fn split(&self, gross: Amount) -> Result<(Amount, Amount), SequoiaError> {
        if self.recipient.is_none() || self.fee_bps == 0 {
            return Ok((gross, 0));
        }
        let fee = gross
            .checked_mul(Amount::from(self.fee_bps))
            .ok_or(SequoiaError::ArithmeticOverflow("fee"))?
            / Amount::from(BPS_DENOMINATOR);
        Ok((gross - fee, fee))
    }
}

pub(crate) fn validate_bps(fee_bps: u16) -> Result<(), SequoiaError> {
    if fee_bps > BPS_DENOMINATOR {
        return Err(SequoiaError::InvalidConfig(format!(
            "fee of {} bps exceeds {} bps",
            fee_bps, BPS_DENOMINATOR
        )));
    }
    Ok(())
}
