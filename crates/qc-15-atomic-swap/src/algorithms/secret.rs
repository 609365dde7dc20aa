//! # Commitment and Escrow Derivation
//!
//! Hash commitments over swap secrets and the module escrow address.

use crate::domain::SecureSecret;
use rand::RngCore;
use sha2::{Digest, Sha256};
use shared_types::{AccAddress, Hash, ADDRESS_LENGTH};

/// `SHA256(random_number ‖ be_u64(timestamp))`.
///
/// The timestamp is encoded as the big-endian two's-complement 8 bytes of
/// the signed value.
pub fn calculate_random_hash(random_number: &[u8], timestamp: i64) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(random_number);
    hasher.update(timestamp.to_be_bytes());
    hasher.finalize().into()
}

/// Draw a fresh 32-byte secret from the OS-seeded thread RNG.
pub fn generate_random_number() -> SecureSecret {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let secret = SecureSecret::new(bytes);
    zeroize::Zeroize::zeroize(&mut bytes);
    secret
}

/// Escrow account: first 20 bytes of `SHA256(domain_tag)`.
///
/// No key controls this address; only the module moves coins out of it.
pub fn escrow_address(domain_tag: &str) -> AccAddress {
    let digest = Sha256::digest(domain_tag.as_bytes());
    AccAddress::new(digest[..ADDRESS_LENGTH].to_vec())
}
