//! # Core Domain Entities
//!
//! Primitive types shared by every plugin of the node.
//!
//! ## Clusters
//!
//! - **Identity**: `AccAddress`, `HexBytes`, `Hash`
//! - **Assets**: `Coin`, `Coins`
//! - **Execution**: `BlockContext`

use crate::errors::CoinsParseError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A 32-byte hash (SHA-256).
pub type Hash = [u8; 32];

/// Length of an account address in bytes.
pub const ADDRESS_LENGTH: usize = 20;

/// Arbitrary bytes rendered as hex in human-readable formats.
///
/// Length is deliberately unchecked here: messages arrive from untrusted
/// clients and every consumer validates the length it needs.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HexBytes(pub Vec<u8>);

impl HexBytes {
    /// Wrap raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Decode a hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        hex::decode(s.trim_start_matches("0x")).map(Self)
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no bytes are held.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for HexBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for HexBytes {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<Hash> for HexBytes {
    fn from(hash: Hash) -> Self {
        Self(hash.to_vec())
    }
}

impl AsRef<[u8]> for HexBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for HexBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl fmt::Debug for HexBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HexBytes({})", hex::encode(&self.0))
    }
}

impl Serialize for HexBytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_bytes(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for HexBytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_bytes(deserializer).map(Self)
    }
}

/// An account address on this chain.
///
/// Addresses taken from messages are not length-checked on construction;
/// `is_valid` reports whether the address has the canonical length.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccAddress(pub Vec<u8>);

impl AccAddress {
    /// Wrap raw address bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Decode a hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        hex::decode(s.trim_start_matches("0x")).map(Self)
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no bytes are held.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the address has exactly [`ADDRESS_LENGTH`] bytes.
    pub fn is_valid(&self) -> bool {
        self.0.len() == ADDRESS_LENGTH
    }
}

impl From<[u8; ADDRESS_LENGTH]> for AccAddress {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes.to_vec())
    }
}

impl AsRef<[u8]> for AccAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for AccAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl fmt::Debug for AccAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccAddress({})", hex::encode(&self.0))
    }
}

impl Serialize for AccAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_bytes(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for AccAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_bytes(deserializer).map(Self)
    }
}

// Hex in JSON, raw bytes in binary codecs (bincode).
fn serialize_bytes<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    if serializer.is_human_readable() {
        serializer.serialize_str(&hex::encode(bytes))
    } else {
        serializer.serialize_bytes(bytes)
    }
}

fn deserialize_bytes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    if deserializer.is_human_readable() {
        let s = String::deserialize(deserializer)?;
        hex::decode(s.trim_start_matches("0x")).map_err(serde::de::Error::custom)
    } else {
        Vec::<u8>::deserialize(deserializer)
    }
}

// =============================================================================
// CLUSTER B: ASSETS
// =============================================================================

/// An amount of a single denomination.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    /// Token symbol, e.g. `BNB` or `BTCB-1DE`.
    pub denom: String,
    /// Amount in the token's base unit. Signed so that malformed
    /// (non-positive) input survives decoding and is rejected by validation.
    pub amount: i64,
}

impl Coin {
    /// Create a coin.
    pub fn new(denom: impl Into<String>, amount: i64) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.amount, self.denom)
    }
}

/// A set of coins, at most one entry per denomination once normalized.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coins(pub Vec<Coin>);

impl Coins {
    /// An empty set.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// A set holding a single coin.
    pub fn single(denom: impl Into<String>, amount: i64) -> Self {
        Self(vec![Coin::new(denom, amount)])
    }

    /// Parse `"100:BNB"` or `"100:BNB,10000:BTCB-1DE"`.
    pub fn parse(s: &str) -> Result<Self, CoinsParseError> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::empty());
        }
        let mut coins = Vec::new();
        for part in s.split(',') {
            let (amount, denom) = part
                .trim()
                .split_once(':')
                .ok_or_else(|| CoinsParseError::MalformedCoin(part.to_string()))?;
            let denom = denom.trim();
            if denom.is_empty() {
                return Err(CoinsParseError::MalformedCoin(part.to_string()));
            }
            let amount = amount
                .trim()
                .parse::<i64>()
                .map_err(|_| CoinsParseError::InvalidAmount(amount.to_string()))?;
            coins.push(Coin::new(denom, amount));
        }
        Ok(Self(coins).normalized())
    }

    /// Borrow the coins.
    pub fn coins(&self) -> &[Coin] {
        &self.0
    }

    /// True when the set holds no coins.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the set is non-empty and every amount is strictly positive.
    pub fn is_positive(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|c| c.amount > 0)
    }

    /// Total amount held for `denom`.
    pub fn amount_of(&self, denom: &str) -> i64 {
        self.0
            .iter()
            .filter(|c| c.denom == denom)
            .fold(0i64, |acc, c| acc.saturating_add(c.amount))
    }

    /// True when, for every denomination in `other`, this set holds at least as much.
    pub fn is_all_gte(&self, other: &Coins) -> bool {
        other
            .0
            .iter()
            .all(|c| self.amount_of(&c.denom) >= c.amount)
    }

    /// Sum of both sets, `None` on overflow.
    pub fn checked_add(&self, other: &Coins) -> Option<Coins> {
        let mut merged = self.clone().normalized().0;
        for coin in other.clone().normalized().0 {
            match merged.iter_mut().find(|c| c.denom == coin.denom) {
                Some(existing) => existing.amount = existing.amount.checked_add(coin.amount)?,
                None => merged.push(coin),
            }
        }
        Some(Coins(merged).normalized())
    }

    /// Difference of both sets, `None` if any denomination would go negative.
    pub fn checked_sub(&self, other: &Coins) -> Option<Coins> {
        let mut remaining = self.clone().normalized().0;
        for coin in other.0.iter().filter(|c| c.amount != 0) {
            match remaining.iter_mut().find(|c| c.denom == coin.denom) {
                Some(existing) => {
                    existing.amount = existing.amount.checked_sub(coin.amount)?;
                    if existing.amount < 0 {
                        return None;
                    }
                }
                None if coin.amount < 0 => {
                    remaining.push(Coin::new(coin.denom.clone(), coin.amount.checked_neg()?));
                }
                None => return None,
            }
        }
        Some(Coins(remaining).normalized())
    }

    /// Merge duplicate denominations, drop zero amounts, sort by denomination.
    pub fn normalized(self) -> Coins {
        let mut merged: Vec<Coin> = Vec::with_capacity(self.0.len());
        for coin in self.0 {
            match merged.iter_mut().find(|c| c.denom == coin.denom) {
                Some(existing) => existing.amount = existing.amount.saturating_add(coin.amount),
                None => merged.push(coin),
            }
        }
        merged.retain(|c| c.amount != 0);
        merged.sort_by(|a, b| a.denom.cmp(&b.denom));
        Coins(merged)
    }
}

impl From<Coin> for Coins {
    fn from(coin: Coin) -> Self {
        Coins(vec![coin])
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(","))
    }
}

// =============================================================================
// CLUSTER C: EXECUTION
// =============================================================================

/// The block a transaction is being executed in.
///
/// Supplied by the block-processing loop; handlers read height and time
/// from here and never from the wall clock, so replays are deterministic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockContext {
    /// Height of the block being executed.
    pub height: u64,
    /// Block header time, Unix seconds.
    pub time: i64,
}

impl BlockContext {
    /// Create a context.
    pub fn new(height: u64, time: i64) -> Self {
        Self { height, time }
    }

    /// Same block time, different height.
    pub fn with_height(self, height: u64) -> Self {
        Self { height, ..self }
    }

    /// Same height, different block time.
    pub fn with_time(self, time: i64) -> Self {
        Self { time, ..self }
    }
}
