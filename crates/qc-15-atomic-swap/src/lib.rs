//! # QC-15 Atomic Swap
//!
//! Hash Time-Locked Transfers (HTLT) escrowed by the chain itself.
//!
//! **Subsystem ID:** 15
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Lock funds under a SHA-256 commitment and release them only under
//! strict timing and secret-revelation rules:
//! - Single-chain swaps: both legs escrowed here, counterparty deposits
//! - Cross-chain swaps: the other leg lives on a foreign chain, relayed
//! - Claim with the secret before `expire_height`, refund from it on
//!
//! ## Swap Lifecycle
//!
//! | Message | Transition | Escrow |
//! |---------|------------|--------|
//! | `HTLT` | → `Open` | `from` → escrow |
//! | `depositHTLT` | `Open` → `Open` | `to` → escrow (single-chain) |
//! | `claimHTLT` | `Open` → `Completed` | escrow → counterparties |
//! | `refundHTLT` | `Open` → `Expired` | escrow → depositors |
//!
//! ## Module Structure
//!
//! ```text
//! qc-15-atomic-swap/
//! ├── domain/          # AtomicSwap, SwapMsg, SwapConfig, errors
//! ├── algorithms/      # Commitment hashing, escrow address, key schema
//! ├── ports/           # AtomicSwapApi, KeyValueStore, LedgerKeeper
//! ├── adapters/        # In-memory store and ledger, JSON query handler
//! └── service/         # Store, keeper, handler, queries
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-exports
pub use adapters::{
    handle_api_query, handle_raw_query, ApiGatewayHandler, ApiQueryError, InMemoryKVStore,
    InMemoryLedger,
};
pub use algorithms::{calculate_random_hash, escrow_address, generate_random_number};
pub use domain::{
    AtomicSwap, ClaimHtltMsg, DepositHtltMsg, HtltMsg, KVStoreError, LedgerError, RefundHtltMsg,
    SecureSecret, SwapConfig, SwapError, SwapMsg, SwapOperation, SwapStatus, CODESPACE,
};
pub use ports::{AtomicSwapApi, BatchOperation, KeyValueStore, LedgerKeeper, SwapPage, Tag};
pub use service::{handle, AtomicSwapService, SwapKeeper, SwapResult, SwapStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
