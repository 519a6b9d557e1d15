// crates/sequoia-core/src/error.rs

use thiserror::Error;

use crate::types::{BlockHeight, Identity, PositionId, RarityClass};

/// Error types shared by the farming engine, the sale market, and the CLI.
///
/// Every variant maps to a stable identifier via [`SequoiaError::code`]; callers
/// and tests should match on the code (or the variant), never on the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequoiaError {
    /// The same position id appears more than once in a batch.
    #[error("Duplicate input: position {0} appears more than once")]
    DuplicateInput(PositionId),

    /// The caller does not control the position, or is not the administrator.
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// The position does not exist in the ownership oracle or rarity registry.
    #[error("Unknown position: {0}")]
    UnknownPosition(PositionId),

    /// The position has not been enabled for farming.
    #[error("Position {0} is not enabled")]
    NotEnabled(PositionId),

    /// The supplied block is earlier than the position's last settlement.
    #[error("Block regression: block {current} is before last settlement at block {last}")]
    BlockRegression {
        current: BlockHeight,
        last: BlockHeight,
    },

    /// The operation is not available in the current sale phase.
    #[error("Wrong phase: {0}")]
    WrongPhase(String),

    /// Payment does not equal `amount * price`.
    #[error("Incorrect payment: expected {expected}, got {actual}")]
    IncorrectPayment { expected: u128, actual: u128 },

    /// The identity has already used its presale allowance.
    #[error("Already claimed by {0}")]
    AlreadyClaimed(Identity),

    /// The Merkle proof does not place the identity in the allowlist.
    #[error("Not whitelisted: {0}")]
    NotWhitelisted(Identity),

    /// Checked arithmetic overflowed.
    #[error("Arithmetic overflow: {0}")]
    ArithmeticOverflow(&'static str),

    /// The rarity class has no configured reward rate.
    #[error("Unknown rarity class: {0}")]
    UnknownRarityClass(RarityClass),

    /// A mint request asked for zero positions.
    #[error("Mint amount must be greater than zero")]
    ZeroAmount,

    /// Construction or configuration parameters are invalid.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// The reward ledger refused a transfer.
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// The minting collaborator refused to issue positions.
    #[error("Mint error: {0}")]
    Mint(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Coarse error category, used by callers deciding whether a retry can help.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input; fixable by the caller.
    Validation,
    /// The caller lacks a right (ownership, allowlist membership, unused claim).
    Authorization,
    /// The target is in the wrong state (phase, not enabled, block regression).
    State,
    /// Overflow. Indicates a configuration or scale bug.
    Arithmetic,
    /// An external collaborator rejected the request.
    Collaborator,
}

impl SequoiaError {
    /// Stable identifier for the error condition.
    pub fn code(&self) -> &'static str {
        match self {
            SequoiaError::DuplicateInput(_) => "DuplicateInput",
            SequoiaError::NotAuthorized(_) => "NotAuthorized",
            SequoiaError::UnknownPosition(_) => "UnknownPosition",
            SequoiaError::NotEnabled(_) => "NotEnabled",
            SequoiaError::BlockRegression { .. } => "BlockRegression",
            SequoiaError::WrongPhase(_) => "WrongPhase",
            SequoiaError::IncorrectPayment { .. } => "IncorrectPayment",
            SequoiaError::AlreadyClaimed(_) => "AlreadyClaimed",
            SequoiaError::NotWhitelisted(_) => "NotWhitelisted",
            SequoiaError::ArithmeticOverflow(_) => "ArithmeticOverflow",
            SequoiaError::UnknownRarityClass(_) => "UnknownRarityClass",
            SequoiaError::ZeroAmount => "ZeroAmount",
            SequoiaError::InvalidConfig(_) => "InvalidConfig",
            SequoiaError::Ledger(_) => "Ledger",
            SequoiaError::Mint(_) => "Mint",
            SequoiaError::Serialization(_) => "Serialization",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SequoiaError::DuplicateInput(_)
            | SequoiaError::IncorrectPayment { .. }
            | SequoiaError::ZeroAmount
            | SequoiaError::UnknownPosition(_)
            | SequoiaError::UnknownRarityClass(_)
            | SequoiaError::InvalidConfig(_)
            | SequoiaError::Serialization(_) => ErrorKind::Validation,
            SequoiaError::NotAuthorized(_)
            | SequoiaError::AlreadyClaimed(_)
            | SequoiaError::NotWhitelisted(_) => ErrorKind::Authorization,
            SequoiaError::NotEnabled(_)
            | SequoiaError::BlockRegression { .. }
            | SequoiaError::WrongPhase(_) => ErrorKind::State,
            SequoiaError::ArithmeticOverflow(_) => ErrorKind::Arithmetic,
            SequoiaError::Ledger(_) | SequoiaError::Mint(_) => ErrorKind::Collaborator,
        }
    }
}

impl From<serde_json::Error> for SequoiaError {
    fn from(e: serde_json::Error) -> Self {
        SequoiaError::Serialization(e.to_string())
    }
}

impl From<hex::FromHexError> for SequoiaError {
    fn from(e: hex::FromHexError) -> Self {
        SequoiaError::Serialization(format!("invalid hex: {}", e))
    }
}
