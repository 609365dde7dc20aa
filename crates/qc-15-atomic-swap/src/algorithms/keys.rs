//! # Store Key Schema
//!
//! | prefix | key                                   | value                 |
//! |--------|---------------------------------------|-----------------------|
//! | `0x01` | `hash`                                | bincode `AtomicSwap`  |
//! | `0x02` | `from ‖ hash`                         | `hash`                |
//! | `0x03` | `to ‖ hash`                           | `hash`                |
//! | `0x04` | `be_u64(closed_time) ‖ hash`          | `hash`                |
//! | `0x05` | (none)                                | `be_u64(next_index)`  |
//!
//! Big-endian close times make lexicographic order chronological.

use shared_types::AccAddress;

/// Primary swap records.
pub const HASH_KEY_PREFIX: u8 = 0x01;
/// Creator secondary index.
pub const SWAP_CREATOR_PREFIX: u8 = 0x02;
/// Recipient secondary index.
pub const SWAP_RECIPIENT_PREFIX: u8 = 0x03;
/// Close-time secondary index.
pub const SWAP_CLOSE_TIME_PREFIX: u8 = 0x04;
/// Creation counter.
pub const SWAP_INDEX_KEY: u8 = 0x05;

fn join(prefix: u8, parts: &[&[u8]]) -> Vec<u8> {
    let len = 1 + parts.iter().map(|p| p.len()).sum::<usize>();
    let mut key = Vec::with_capacity(len);
    key.push(prefix);
    for part in parts {
        key.extend_from_slice(part);
    }
    key
}

/// Primary record key.
pub fn swap_key(random_number_hash: &[u8]) -> Vec<u8> {
    join(HASH_KEY_PREFIX, &[random_number_hash])
}

/// Creator index entry.
pub fn creator_key(from: &AccAddress, random_number_hash: &[u8]) -> Vec<u8> {
    join(SWAP_CREATOR_PREFIX, &[from.as_bytes(), random_number_hash])
}

/// Prefix covering all swaps created by `from`.
pub fn creator_prefix(from: &AccAddress) -> Vec<u8> {
    join(SWAP_CREATOR_PREFIX, &[from.as_bytes()])
}

/// Recipient index entry.
pub fn recipient_key(to: &AccAddress, random_number_hash: &[u8]) -> Vec<u8> {
    join(SWAP_RECIPIENT_PREFIX, &[to.as_bytes(), random_number_hash])
}

/// Prefix covering all swaps addressed to `to`.
pub fn recipient_prefix(to: &AccAddress) -> Vec<u8> {
    join(SWAP_RECIPIENT_PREFIX, &[to.as_bytes()])
}

/// Close-time index entry. Negative times are clamped to zero.
pub fn close_time_key(closed_time: i64, random_number_hash: &[u8]) -> Vec<u8> {
    let time = u64::try_from(closed_time).unwrap_or(0);
    join(
        SWAP_CLOSE_TIME_PREFIX,
        &[&time.to_be_bytes()[..], random_number_hash],
    )
}

/// Prefix covering the whole close-time index.
pub fn close_time_prefix() -> Vec<u8> {
    vec![SWAP_CLOSE_TIME_PREFIX]
}

/// Close time encoded in a close-time index key.
pub fn close_time_of(key: &[u8]) -> Option<i64> {
    let bytes: [u8; 8] = key.get(1..9)?.try_into().ok()?;
    i64::try_from(u64::from_be_bytes(bytes)).ok()
}

/// Counter key.
pub fn index_key() -> Vec<u8> {
    vec![SWAP_INDEX_KEY]
}
