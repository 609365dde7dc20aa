//! # Random Number Secret
//!
//! The 32-byte secret a swap creator commits to. Zeroized on drop; never
//! printed.

use super::config::RANDOM_NUMBER_LENGTH;
use crate::algorithms::calculate_random_hash;
use serde::{Deserialize, Serialize};
use shared_types::HexBytes;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A swap secret held off-chain until claim.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureSecret {
    inner: [u8; RANDOM_NUMBER_LENGTH],
}

impl SecureSecret {
    /// Wrap raw bytes.
    pub fn new(bytes: [u8; RANDOM_NUMBER_LENGTH]) -> Self {
        Self { inner: bytes }
    }

    /// Copy from a slice of exactly 32 bytes.
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        let inner: [u8; RANDOM_NUMBER_LENGTH] = slice.try_into().ok()?;
        Some(Self { inner })
    }

    /// Raw bytes. Do not keep the reference around.
    pub fn as_bytes(&self) -> &[u8; RANDOM_NUMBER_LENGTH] {
        &self.inner
    }

    /// Commitment placed in an HTLT for this secret.
    pub fn commitment(&self, timestamp: i64) -> HexBytes {
        HexBytes::from(calculate_random_hash(&self.inner, timestamp))
    }

    /// Reveal the secret for a claim message.
    pub fn reveal(&self) -> HexBytes {
        HexBytes::from(self.inner.as_slice())
    }
}

impl std::fmt::Debug for SecureSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecureSecret(***)")
    }
}

impl Serialize for SecureSecret {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&hex::encode(self.inner))
    }
}

impl<'de> Deserialize<'de> for SecureSecret {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let mut bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        let secret = Self::from_slice(&bytes);
        bytes.zeroize();
        secret.ok_or_else(|| serde::de::Error::custom("random number must be 32 bytes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_value() {
        let secret = SecureSecret::new([0xABu8; 32]);
        let debug_str = format!("{:?}", secret);
        assert!(!debug_str.to_lowercase().contains("ab"));
        assert!(debug_str.contains("***"));
    }

    #[test]
    fn test_from_slice_wrong_length() {
        assert!(SecureSecret::from_slice(&[0xCDu8; 16]).is_none());
        assert!(SecureSecret::from_slice(&[0xCDu8; 33]).is_none());
        assert!(SecureSecret::from_slice(&[0xCDu8; 32]).is_some());
    }

    #[test]
    fn test_commitment_matches_known_vector() {
        let bytes =
            hex::decode("52fdfc072182654f163f5f0f9a621d729566c74d10037c4d7bbb0407d1e2c649")
                .unwrap();
        let secret = SecureSecret::from_slice(&bytes).unwrap();
        assert_eq!(
            secret.commitment(1_564_471_835).to_string(),
            "be543130668282f267580badb1c956dacd4502be3b57846443c9921118ffa167"
        );
        assert_eq!(secret.reveal().as_bytes(), bytes.as_slice());
    }

    #[test]
    fn test_hex_serde() {
        let secret = SecureSecret::new([0x01u8; 32]);
        let json = serde_json::to_string(&secret).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(32)));
        let back: SecureSecret = serde_json::from_str(&json).unwrap();
        assert_eq!(back, secret);
        assert!(serde_json::from_str::<SecureSecret>("\"0102\"").is_err());
    }
}
