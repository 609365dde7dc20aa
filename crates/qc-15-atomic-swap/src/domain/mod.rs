//! # Domain Module
//!
//! Core domain types for the Atomic Swap engine.

pub mod config;
pub mod entities;
pub mod errors;
pub mod invariants;
pub mod messages;
pub mod secure_secret;
pub mod value_objects;

pub use config::*;
pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use messages::*;
pub use secure_secret::SecureSecret;
pub use value_objects::*;
