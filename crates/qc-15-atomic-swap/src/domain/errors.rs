//! # Domain Errors
//!
//! Error types for the Atomic Swap engine.
//!
//! Every `SwapError` is a validation failure of a single transaction. The
//! transaction is rejected with the kind's ABCI code; nothing is retried and
//! no kind is fatal to the node.

use super::value_objects::{SwapOperation, SwapStatus};
use shared_types::{AccAddress, Coins, HexBytes};
use thiserror::Error;

/// ABCI codespace of the atomic swap module.
pub const CODESPACE: u32 = 8;

/// Atomic swap error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    /// Address does not have the canonical length.
    #[error("Invalid address length: expected {expected}, got {actual}")]
    InvalidAddressLength {
        /// Canonical length.
        expected: usize,
        /// Length received.
        actual: usize,
    },

    /// Random number hash is not 32 bytes.
    #[error("Invalid random number hash length: expected {expected}, got {actual}")]
    InvalidRandomNumberHash {
        /// Required length.
        expected: usize,
        /// Length received.
        actual: usize,
    },

    /// Random number is not 32 bytes.
    #[error("Invalid random number length: expected {expected}, got {actual}")]
    InvalidRandomNumber {
        /// Required length.
        expected: usize,
        /// Length received.
        actual: usize,
    },

    /// Swapped out coins are empty or not strictly positive.
    #[error("Swapped out coins must be positive: {amount}")]
    InvalidSwapOutAmount {
        /// Offending amount.
        amount: Coins,
    },

    /// Height span outside the allowed bounds.
    #[error("Invalid height span {height_span}: must be in [{min}, {max}]")]
    InvalidHeightSpan {
        /// Requested span.
        height_span: i64,
        /// Lower bound.
        min: i64,
        /// Upper bound.
        max: i64,
    },

    /// Timestamp outside the window around block time.
    #[error("Timestamp {timestamp} outside ({earliest}, {latest}]")]
    InvalidTimestamp {
        /// Timestamp in the message.
        timestamp: i64,
        /// Exclusive lower bound.
        earliest: i64,
        /// Inclusive upper bound.
        latest: i64,
    },

    /// Recipient on the other chain is missing, too long, or present for a
    /// single-chain swap.
    #[error("Invalid recipient on other chain: {0}")]
    InvalidRecipientOtherChain(String),

    /// Expected income is too long or not a positive coin list.
    #[error("Invalid expected income: {0}")]
    InvalidExpectedIncome(String),

    /// A swap with this random number hash already exists.
    #[error("Duplicated random number hash: {0}")]
    DuplicatedRandomNumberHash(HexBytes),

    /// No swap with this random number hash.
    #[error("Non-existent random number hash: {0}")]
    NonExistentRandomNumberHash(HexBytes),

    /// Random number does not hash to the commitment.
    #[error("Mismatched random number for swap {random_number_hash}")]
    MismatchedRandomNumber {
        /// Swap being claimed.
        random_number_hash: HexBytes,
    },

    /// Swap expired before it was claimed or deposited into.
    #[error("Swap is expired: expire height {expire_height}, current height {height}")]
    ClaimExpiredSwap {
        /// Expiry height of the swap.
        expire_height: u64,
        /// Height of the executing block.
        height: u64,
    },

    /// Refund requested before expiry.
    #[error("Expire height {expire_height} is still not reached, current height {height}")]
    RefundUnexpiredSwap {
        /// Expiry height of the swap.
        expire_height: u64,
        /// Height of the executing block.
        height: u64,
    },

    /// Operation requires an open swap.
    #[error("Cannot {operation} swap with status {status}")]
    UnexpectedSwapStatus {
        /// Operation attempted.
        operation: SwapOperation,
        /// Current status.
        status: SwapStatus,
    },

    /// Deposit violates single-chain rules.
    #[error("Invalid single chain swap: {0}")]
    InvalidSingleChainSwap(String),

    /// Single-chain swap claimed before the counterparty deposited.
    #[error("Cannot claim single chain swap {random_number_hash} before deposit")]
    UnexpectedClaimSingleChainSwap {
        /// Swap being claimed.
        random_number_hash: HexBytes,
    },

    /// Account cannot cover a transfer.
    #[error("Insufficient funds: {address} has {available}, needs {required}")]
    InsufficientFunds {
        /// Paying account.
        address: AccAddress,
        /// Amount requested.
        required: Coins,
        /// Balance held.
        available: Coins,
    },

    /// Query pagination out of bounds.
    #[error("Invalid pagination parameters: {0}")]
    InvalidPaginationParameters(String),

    /// Query data could not be decoded or endpoint unknown.
    #[error("Invalid query request: {0}")]
    InvalidQueryRequest(String),

    /// Module configuration rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Ledger failure other than insufficient funds.
    #[error("Ledger error: {0}")]
    Ledger(LedgerError),

    /// Key-value store failure.
    #[error("Store error: {0}")]
    Store(#[from] KVStoreError),

    /// Stored record could not be encoded or decoded.
    #[error("Codec error: {0}")]
    Codec(String),
}

impl SwapError {
    /// ABCI code within [`CODESPACE`].
    pub fn code(&self) -> u32 {
        match self {
            Self::InvalidRecipientOtherChain(_) => 1,
            Self::InvalidRandomNumberHash { .. } => 2,
            Self::InvalidRandomNumber { .. } => 3,
            Self::InvalidHeightSpan { .. } => 4,
            Self::DuplicatedRandomNumberHash(_) => 6,
            Self::ClaimExpiredSwap { .. } => 7,
            Self::RefundUnexpiredSwap { .. } => 8,
            Self::MismatchedRandomNumber { .. } => 9,
            Self::NonExistentRandomNumberHash(_) => 10,
            Self::InvalidPaginationParameters(_) => 11,
            Self::UnexpectedSwapStatus { .. } => 12,
            Self::InvalidTimestamp { .. } => 13,
            Self::InvalidSingleChainSwap(_) => 14,
            Self::InvalidExpectedIncome(_) => 15,
            Self::UnexpectedClaimSingleChainSwap { .. } => 16,
            Self::InvalidAddressLength { .. } => 17,
            Self::InvalidSwapOutAmount { .. } => 18,
            Self::InsufficientFunds { .. } => 19,
            Self::InvalidQueryRequest(_) => 20,
            Self::InvalidConfig(_) => 21,
            Self::Ledger(_) => 22,
            Self::Store(_) => 23,
            Self::Codec(_) => 24,
        }
    }
}

impl From<LedgerError> for SwapError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientFunds {
                address,
                required,
                available,
            } => Self::InsufficientFunds {
                address,
                required,
                available,
            },
            other => Self::Ledger(other),
        }
    }
}

/// Errors surfaced by the ledger collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Sender balance too low.
    #[error("Insufficient funds: {address} has {available}, needs {required}")]
    InsufficientFunds {
        /// Paying account.
        address: AccAddress,
        /// Amount requested.
        required: Coins,
        /// Balance held.
        available: Coins,
    },

    /// Coins are empty, negative, or would overflow the recipient's balance.
    #[error("Invalid coins: {0}")]
    InvalidCoins(String),
}

/// Errors surfaced by the key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// Backend I/O failure.
    #[error("I/O error: {message}")]
    IOError {
        /// Backend message.
        message: String,
    },

    /// Backend reported corruption.
    #[error("Corruption: {message}")]
    Corruption {
        /// Backend message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_codespace_numbering() {
        assert_eq!(
            SwapError::InvalidRecipientOtherChain("missing".into()).code(),
            1
        );
        assert_eq!(SwapError::MismatchedRandomNumber { random_number_hash: HexBytes::default() }.code(), 9);
        assert_eq!(
            SwapError::UnexpectedClaimSingleChainSwap {
                random_number_hash: HexBytes::default()
            }
            .code(),
            16
        );
    }

    #[test]
    fn test_ledger_insufficient_funds_is_surfaced() {
        let err: SwapError = LedgerError::InsufficientFunds {
            address: AccAddress::new(vec![1u8; 20]),
            required: Coins::single("BNB", 10),
            available: Coins::single("BNB", 1),
        }
        .into();
        assert!(matches!(err, SwapError::InsufficientFunds { .. }));
        assert_eq!(err.code(), 19);
    }

    #[test]
    fn test_other_ledger_errors_wrapped() {
        let err: SwapError = LedgerError::InvalidCoins("negative".into()).into();
        assert!(matches!(err, SwapError::Ledger(_)));
    }

    #[test]
    fn test_claim_expired_message() {
        let err = SwapError::ClaimExpiredSwap {
            expire_height: 1010,
            height: 2000,
        };
        assert!(err.to_string().contains("1010"));
    }

    #[test]
    fn test_unexpected_status_message() {
        let err = SwapError::UnexpectedSwapStatus {
            operation: SwapOperation::Claim,
            status: SwapStatus::Completed,
        };
        assert_eq!(err.to_string(), "Cannot claim swap with status Completed");
    }
}
