//! # Inbound Ports
//!
//! API trait defining what the Atomic Swap subsystem can do.

use crate::domain::{AtomicSwap, SwapError, SwapMsg, SwapStatus};
use crate::service::SwapResult;
use shared_types::{AccAddress, BlockContext};

/// Pagination and filter for swap listings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SwapPage {
    /// Only return swaps in this status.
    pub status: Option<SwapStatus>,
    /// Page size; the configured default when `None`.
    pub page_size: Option<usize>,
    /// 0-based page number.
    pub page_num: usize,
}

/// Atomic swap API - inbound port.
pub trait AtomicSwapApi {
    /// Validate and apply a message in the context of the executing block.
    fn deliver(&mut self, ctx: &BlockContext, msg: &SwapMsg) -> Result<SwapResult, SwapError>;

    /// Swap by commitment.
    fn get_swap(&self, random_number_hash: &[u8]) -> Result<AtomicSwap, SwapError>;

    /// Swaps created by `address`.
    fn swaps_by_creator(
        &self,
        address: &AccAddress,
        page: &SwapPage,
    ) -> Result<Vec<AtomicSwap>, SwapError>;

    /// Swaps addressed to `address`.
    fn swaps_by_recipient(
        &self,
        address: &AccAddress,
        page: &SwapPage,
    ) -> Result<Vec<AtomicSwap>, SwapError>;
}
