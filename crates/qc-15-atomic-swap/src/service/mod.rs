//! # Atomic Swap Service
//!
//! The service implementing the Atomic Swap API.
//!
//! ## Architecture
//!
//! ```text
//! SwapMsg → handler → SwapKeeper → SwapStore → KeyValueStore
//!                         ↓
//!                    LedgerKeeper (escrow transfers)
//! ```

pub mod handler;
pub mod keeper;
pub mod query;
pub mod store;

pub use handler::{handle, SwapResult};
pub use keeper::SwapKeeper;
pub use store::SwapStore;

use crate::domain::{AtomicSwap, SwapConfig, SwapError, SwapMsg};
use crate::ports::{AtomicSwapApi, KeyValueStore, LedgerKeeper, SwapPage};
use shared_types::{AccAddress, BlockContext, HexBytes};
use std::sync::Arc;

/// The Atomic Swap Service.
pub struct AtomicSwapService<S: KeyValueStore, L: LedgerKeeper> {
    keeper: SwapKeeper<S, L>,
}

impl<S: KeyValueStore, L: LedgerKeeper> AtomicSwapService<S, L> {
    /// Create a service over the module namespace `kv`.
    pub fn new(kv: S, ledger: Arc<L>, config: SwapConfig) -> Result<Self, SwapError> {
        Ok(Self {
            keeper: SwapKeeper::new(kv, ledger, config)?,
        })
    }

    pub fn keeper(&self) -> &SwapKeeper<S, L> {
        &self.keeper
    }

    pub fn keeper_mut(&mut self) -> &mut SwapKeeper<S, L> {
        &mut self.keeper
    }
}

impl<S: KeyValueStore, L: LedgerKeeper> AtomicSwapApi for AtomicSwapService<S, L> {
    fn deliver(&mut self, ctx: &BlockContext, msg: &SwapMsg) -> Result<SwapResult, SwapError> {
        handle(&mut self.keeper, ctx, msg)
    }

    fn get_swap(&self, random_number_hash: &[u8]) -> Result<AtomicSwap, SwapError> {
        self.keeper.require_swap(&HexBytes::from(random_number_hash))
    }

    fn swaps_by_creator(
        &self,
        address: &AccAddress,
        page: &SwapPage,
    ) -> Result<Vec<AtomicSwap>, SwapError> {
        query::swaps_by_creator(self.keeper.store(), self.keeper.config(), address, page)
    }

    fn swaps_by_recipient(
        &self,
        address: &AccAddress,
        page: &SwapPage,
    ) -> Result<Vec<AtomicSwap>, SwapError> {
        query::swaps_by_recipient(self.keeper.store(), self.keeper.config(), address, page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryKVStore, InMemoryLedger};
    use crate::test_utils::{addr, htlt_msg, RANDOM_NUMBER_HASH, TIMESTAMP};
    use shared_types::Coins;

    #[test]
    fn test_service_round_trip() {
        let ledger = Arc::new(InMemoryLedger::new());
        ledger.set_coins(&addr(1), Coins::single("BNB", 100_000));
        let mut service =
            AtomicSwapService::new(InMemoryKVStore::new(), ledger, SwapConfig::default()).unwrap();

        let ctx = BlockContext::new(10, TIMESTAMP);
        service.deliver(&ctx, &htlt_msg(true)).unwrap();

        let hash = hex::decode(RANDOM_NUMBER_HASH).unwrap();
        let swap = service.get_swap(&hash).unwrap();
        assert_eq!(swap.expire_height, 1010);

        let out = service.swaps_by_creator(&addr(1), &SwapPage::default()).unwrap();
        let inbound = service.swaps_by_recipient(&addr(2), &SwapPage::default()).unwrap();
        assert_eq!(out, vec![swap.clone()]);
        assert_eq!(inbound, vec![swap]);

        assert!(matches!(
            service.get_swap(&[0u8; 32]),
            Err(SwapError::NonExistentRandomNumberHash(_))
        ));
    }
}
