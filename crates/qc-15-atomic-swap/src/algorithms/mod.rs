//! # Algorithms Module
//!
//! Commitment hashing, escrow derivation and the store key schema.

pub mod keys;
pub mod secret;

pub use secret::{calculate_random_hash, escrow_address, generate_random_number};
