//! # Domain Entities
//!
//! The atomic swap record, the only entity this module persists.

use super::errors::SwapError;
use super::value_objects::{SwapOperation, SwapStatus};
use serde::{Deserialize, Serialize};
use shared_types::{AccAddress, Coins, HexBytes};

/// A hash time-locked transfer.
///
/// Keyed by `random_number_hash`. Created open, optionally deposited into
/// once (single-chain only), then closed exactly once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomicSwap {
    /// Creator; escrowed `out_amount`.
    pub from: AccAddress,
    /// Counterparty; receives `out_amount` on claim.
    pub to: AccAddress,
    /// Coins escrowed by the creator.
    pub out_amount: Coins,
    /// Coins escrowed by the counterparty (single-chain), empty until deposit.
    pub in_amount: Coins,
    /// Human-readable description of the other leg.
    pub expected_income: String,
    /// Counterpart identity on the foreign chain (cross-chain only).
    pub recipient_other_chain: HexBytes,
    /// `SHA256(random_number ‖ be_u64(timestamp))`.
    pub random_number_hash: HexBytes,
    /// Secret, set on claim.
    pub random_number: Option<HexBytes>,
    /// Commitment timestamp, Unix seconds.
    pub timestamp: i64,
    /// First height at which claim is refused and refund allowed.
    pub expire_height: u64,
    /// Block time of claim or refund; 0 while open.
    pub closed_time: i64,
    /// Current state.
    pub status: SwapStatus,
    /// Whether the other leg lives on another chain.
    pub cross_chain: bool,
    /// Creation sequence number.
    pub index: u64,
}

/// Parameters for opening a swap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenSwapParams {
    /// Creator.
    pub from: AccAddress,
    /// Counterparty.
    pub to: AccAddress,
    /// Coins escrowed by the creator.
    pub out_amount: Coins,
    /// Description of the other leg.
    pub expected_income: String,
    /// Counterpart on the foreign chain.
    pub recipient_other_chain: HexBytes,
    /// Commitment.
    pub random_number_hash: HexBytes,
    /// Commitment timestamp.
    pub timestamp: i64,
    /// Expiry height.
    pub expire_height: u64,
    /// Cross-chain flag.
    pub cross_chain: bool,
}

impl AtomicSwap {
    /// Create an open swap. `index` is assigned by the store on insert.
    pub fn open(params: OpenSwapParams) -> Self {
        Self {
            from: params.from,
            to: params.to,
            out_amount: params.out_amount,
            in_amount: Coins::empty(),
            expected_income: params.expected_income,
            recipient_other_chain: params.recipient_other_chain,
            random_number_hash: params.random_number_hash,
            random_number: None,
            timestamp: params.timestamp,
            expire_height: params.expire_height,
            closed_time: 0,
            status: SwapStatus::Open,
            cross_chain: params.cross_chain,
            index: 0,
        }
    }

    /// Claim is refused and refund allowed from `expire_height` on.
    pub fn is_expired(&self, height: u64) -> bool {
        height >= self.expire_height
    }

    /// Whether the counterparty has deposited.
    pub fn is_deposited(&self) -> bool {
        !self.in_amount.is_empty()
    }

    /// Fail unless the swap is open.
    pub fn ensure_open(&self, operation: SwapOperation) -> Result<(), SwapError> {
        if self.status != SwapStatus::Open {
            return Err(SwapError::UnexpectedSwapStatus {
                operation,
                status: self.status,
            });
        }
        Ok(())
    }

    /// Record the counterparty's deposit.
    pub fn deposit(&mut self, amount: Coins) -> Result<(), SwapError> {
        self.ensure_open(SwapOperation::Deposit)?;
        if self.is_deposited() {
            return Err(SwapError::InvalidSingleChainSwap(
                "swap already has a deposit".to_string(),
            ));
        }
        self.in_amount = amount;
        Ok(())
    }

    /// Close as completed, revealing the secret.
    pub fn complete(&mut self, random_number: HexBytes, closed_time: i64) -> Result<(), SwapError> {
        self.transition_to(SwapStatus::Completed, SwapOperation::Claim)?;
        self.random_number = Some(random_number);
        self.closed_time = closed_time;
        Ok(())
    }

    /// Close as expired.
    pub fn expire(&mut self, closed_time: i64) -> Result<(), SwapError> {
        self.transition_to(SwapStatus::Expired, SwapOperation::Refund)?;
        self.closed_time = closed_time;
        Ok(())
    }

    fn transition_to(
        &mut self,
        new_status: SwapStatus,
        operation: SwapOperation,
    ) -> Result<(), SwapError> {
        if !self.status.can_transition_to(new_status) {
            return Err(SwapError::UnexpectedSwapStatus {
                operation,
                status: self.status,
            });
        }
        self.status = new_status;
        Ok(())
    }
}
