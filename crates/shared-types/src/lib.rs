//! # Shared Types Crate
//!
//! Primitive types shared by every plugin of the node: account addresses,
//! hex-encoded byte strings, coin sets, and the block execution context.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Types that cross plugin boundaries live here.
//! - **Validate at the Edge**: Wire types accept any length or amount; the
//!   consuming plugin validates and returns a typed error.
//! - **Deterministic Encoding**: Hex in JSON, raw bytes in binary codecs.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
