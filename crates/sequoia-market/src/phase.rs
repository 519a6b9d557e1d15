// crates/sequoia-market/src/phase.rs

use std::fmt;

use serde::{Deserialize, Serialize};

use sequoia_core::error::SequoiaError;

/// Sale phase. The administrator may set any phase at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalePhase {
    /// No minting.
    #[default]
    Closed,
    /// Allowlisted identities may mint once each.
    Presale,
    /// Anyone may mint, without limit.
    Public,
}

impl SalePhase {
    pub fn as_u8(self) -> u8 {
        match self {
            SalePhase::Closed => 0,
            SalePhase::Presale => 1,
            SalePhase::Public => 2,
        }
    }
}

impl TryFrom<u8> for SalePhase {
    type Error = SequoiaError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SalePhase::Closed),
            1 => Ok(SalePhase::Presale),
            2 => Ok(SalePhase::Public),
            other => Err(SequoiaError::InvalidConfig(format!(
                "unknown sale phase {}",
                other
            ))),
        }
    }
}

impl fmt::Display for SalePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SalePhase::Closed => "closed",
            SalePhase::Presale => "presale",
            SalePhase::Public => "public",
        };
        f.write_str(name)
    }
}
