//! # Transaction Messages
//!
//! The four swap messages and their stateless validation.
//!
//! Field names are wire-stable. `SwapMsg` encodes as
//! `{"type": "HTLT", "value": {...}}`.

use super::config::SwapConfig;
use super::errors::SwapError;
use super::invariants::{
    invariant_address_length, invariant_expected_income, invariant_height_span,
    invariant_positive_amount, invariant_random_number_hash_length,
    invariant_random_number_length, invariant_recipient_other_chain,
};
use super::value_objects::SwapOperation;
use serde::{Deserialize, Serialize};
use shared_types::{AccAddress, Coins, HexBytes};

/// Route all swap messages are dispatched on.
pub const ATOMIC_SWAP_ROUTE: &str = "atomicSwap";

/// Create a hash time-locked transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtltMsg {
    pub from: AccAddress,
    pub to: AccAddress,
    #[serde(default)]
    pub recipient_other_chain: HexBytes,
    pub random_number_hash: HexBytes,
    pub timestamp: i64,
    pub out_amount: Coins,
    #[serde(default)]
    pub expected_income: String,
    pub height_span: i64,
    pub cross_chain: bool,
}

impl HtltMsg {
    /// Stateless checks, in the order errors are reported.
    pub fn validate_basic(&self, config: &SwapConfig) -> Result<(), SwapError> {
        invariant_address_length(&self.from)?;
        invariant_address_length(&self.to)?;
        invariant_recipient_other_chain(&self.recipient_other_chain, self.cross_chain, config)?;
        invariant_expected_income(&self.expected_income, config)?;
        invariant_random_number_hash_length(&self.random_number_hash)?;
        invariant_positive_amount(&self.out_amount)?;
        invariant_height_span(self.height_span, config)
    }
}

/// Counterparty deposit into a single-chain swap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositHtltMsg {
    pub from: AccAddress,
    pub to: AccAddress,
    pub out_amount: Coins,
    pub random_number_hash: HexBytes,
}

impl DepositHtltMsg {
    /// Stateless checks.
    pub fn validate_basic(&self) -> Result<(), SwapError> {
        invariant_address_length(&self.from)?;
        invariant_address_length(&self.to)?;
        invariant_random_number_hash_length(&self.random_number_hash)?;
        invariant_positive_amount(&self.out_amount)
    }
}

/// Reveal the secret and release the escrow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimHtltMsg {
    pub from: AccAddress,
    pub random_number_hash: HexBytes,
    pub random_number: HexBytes,
}

impl ClaimHtltMsg {
    /// Stateless checks.
    pub fn validate_basic(&self) -> Result<(), SwapError> {
        invariant_address_length(&self.from)?;
        invariant_random_number_hash_length(&self.random_number_hash)?;
        invariant_random_number_length(&self.random_number)
    }
}

/// Return escrowed funds after expiry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundHtltMsg {
    pub from: AccAddress,
    pub random_number_hash: HexBytes,
}

impl RefundHtltMsg {
    /// Stateless checks.
    pub fn validate_basic(&self) -> Result<(), SwapError> {
        invariant_address_length(&self.from)?;
        invariant_random_number_hash_length(&self.random_number_hash)
    }
}

/// Any swap message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum SwapMsg {
    #[serde(rename = "HTLT")]
    Htlt(HtltMsg),
    #[serde(rename = "depositHTLT")]
    Deposit(DepositHtltMsg),
    #[serde(rename = "claimHTLT")]
    Claim(ClaimHtltMsg),
    #[serde(rename = "refundHTLT")]
    Refund(RefundHtltMsg),
}

impl SwapMsg {
    /// Route for the message router.
    pub fn route(&self) -> &'static str {
        ATOMIC_SWAP_ROUTE
    }

    /// Message type name as it appears on the wire.
    pub fn msg_type(&self) -> &'static str {
        match self {
            Self::Htlt(_) => "HTLT",
            Self::Deposit(_) => "depositHTLT",
            Self::Claim(_) => "claimHTLT",
            Self::Refund(_) => "refundHTLT",
        }
    }

    /// Operation this message performs.
    pub fn operation(&self) -> SwapOperation {
        match self {
            Self::Htlt(_) => SwapOperation::Create,
            Self::Deposit(_) => SwapOperation::Deposit,
            Self::Claim(_) => SwapOperation::Claim,
            Self::Refund(_) => SwapOperation::Refund,
        }
    }

    /// Commitment the message refers to.
    pub fn random_number_hash(&self) -> &HexBytes {
        match self {
            Self::Htlt(msg) => &msg.random_number_hash,
            Self::Deposit(msg) => &msg.random_number_hash,
            Self::Claim(msg) => &msg.random_number_hash,
            Self::Refund(msg) => &msg.random_number_hash,
        }
    }

    /// Accounts that must sign the transaction.
    pub fn signers(&self) -> Vec<AccAddress> {
        let from = match self {
            Self::Htlt(msg) => &msg.from,
            Self::Deposit(msg) => &msg.from,
            Self::Claim(msg) => &msg.from,
            Self::Refund(msg) => &msg.from,
        };
        vec![from.clone()]
    }

    /// Canonical bytes covered by the signature.
    pub fn sign_bytes(&self) -> Result<Vec<u8>, SwapError> {
        serde_json::to_vec(self).map_err(|e| SwapError::Codec(e.to_string()))
    }

    /// Stateless checks performed before the message touches state.
    pub fn validate_basic(&self, config: &SwapConfig) -> Result<(), SwapError> {
        match self {
            Self::Htlt(msg) => msg.validate_basic(config),
            Self::Deposit(msg) => msg.validate_basic(),
            Self::Claim(msg) => msg.validate_basic(),
            Self::Refund(msg) => msg.validate_basic(),
        }
    }
}

impl From<HtltMsg> for SwapMsg {
    fn from(msg: HtltMsg) -> Self {
        Self::Htlt(msg)
    }
}

impl From<DepositHtltMsg> for SwapMsg {
    fn from(msg: DepositHtltMsg) -> Self {
        Self::Deposit(msg)
    }
}

impl From<ClaimHtltMsg> for SwapMsg {
    fn from(msg: ClaimHtltMsg) -> Self {
        Self::Claim(msg)
    }
}

impl From<RefundHtltMsg> for SwapMsg {
    fn from(msg: RefundHtltMsg) -> Self {
        Self::Refund(msg)
    }
}
