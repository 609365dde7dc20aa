//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-memory implementations of the outbound ports and the JSON query
//! adapter.

pub mod api_handler;
mod memory_ledger;
mod memory_store;

pub use api_handler::{handle_api_query, handle_raw_query, ApiGatewayHandler, ApiQueryError};
pub use memory_ledger::InMemoryLedger;
pub use memory_store::InMemoryKVStore;
