//! Atomic swap module configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use qc_15_atomic_swap::SwapConfig;
//!
//! let config = SwapConfig::from_json(r#"{"max_page_size": 500}"#)?;
//! assert_eq!(config.default_page_size, 100);
//! ```

use super::errors::SwapError;
use serde::{Deserialize, Serialize};

/// Length of the commitment `SHA256(random_number ‖ timestamp)`.
pub const RANDOM_NUMBER_HASH_LENGTH: usize = 32;

/// Length of the secret revealed on claim.
pub const RANDOM_NUMBER_LENGTH: usize = 32;

/// Domain-separation tag the escrow address is derived from.
pub const ESCROW_DOMAIN_TAG: &str = "QuantumChainAtomicSwapCoins";

/// Atomic swap module configuration.
///
/// Every bound here is part of transaction validity, so all validators of a
/// network must run with the same values. Defaults match mainnet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwapConfig {
    /// Input of the escrow address derivation.
    pub escrow_domain_tag: String,
    /// Smallest accepted `height_span`.
    pub min_height_span: i64,
    /// Largest accepted `height_span`.
    pub max_height_span: i64,
    /// Timestamps must be strictly later than `block_time - this`.
    pub timestamp_past_window_secs: i64,
    /// Timestamps must be at most `block_time + this`.
    pub timestamp_future_window_secs: i64,
    /// Maximum byte length of `recipient_other_chain`.
    pub max_recipient_other_chain_len: usize,
    /// Maximum character length of `expected_income`.
    pub max_expected_income_len: usize,
    /// Page size used when a query gives none.
    pub default_page_size: usize,
    /// Largest page size a query may ask for.
    pub max_page_size: usize,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            escrow_domain_tag: ESCROW_DOMAIN_TAG.to_string(),
            min_height_span: 360,
            max_height_span: 518_400,
            timestamp_past_window_secs: 2 * 3600, // 2 hours
            timestamp_future_window_secs: 3600,   // 1 hour
            max_recipient_other_chain_len: 32,
            max_expected_income_len: 64,
            default_page_size: 100,
            max_page_size: 1000,
        }
    }
}

impl SwapConfig {
    /// Parse a (possibly partial) JSON document over the defaults and validate it.
    pub fn from_json(json: &str) -> Result<Self, SwapError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SwapError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), SwapError> {
        if self.escrow_domain_tag.is_empty() {
            return Err(SwapError::InvalidConfig(
                "escrow_domain_tag cannot be empty".to_string(),
            ));
        }
        if self.min_height_span <= 0 || self.min_height_span > self.max_height_span {
            return Err(SwapError::InvalidConfig(format!(
                "height span bounds [{}, {}] are invalid",
                self.min_height_span, self.max_height_span
            )));
        }
        if self.timestamp_past_window_secs < 0 || self.timestamp_future_window_secs < 0 {
            return Err(SwapError::InvalidConfig(
                "timestamp windows cannot be negative".to_string(),
            ));
        }
        if self.max_recipient_other_chain_len == 0 {
            return Err(SwapError::InvalidConfig(
                "max_recipient_other_chain_len cannot be 0".to_string(),
            ));
        }
        if self.max_page_size == 0
            || self.default_page_size == 0
            || self.default_page_size > self.max_page_size
        {
            return Err(SwapError::InvalidConfig(format!(
                "page sizes invalid: default {}, max {}",
                self.default_page_size, self.max_page_size
            )));
        }
        Ok(())
    }

    /// Builder-style method to set the height span bounds
    pub fn with_height_span(mut self, min: i64, max: i64) -> Self {
        self.min_height_span = min;
        self.max_height_span = max;
        self
    }

    /// Builder-style method to set the escrow domain tag
    pub fn with_escrow_domain_tag(mut self, tag: impl Into<String>) -> Self {
        self.escrow_domain_tag = tag.into();
        self
    }

    /// Builder-style method to set page sizes
    pub fn with_page_sizes(mut self, default: usize, max: usize) -> Self {
        self.default_page_size = default;
        self.max_page_size = max;
        self
    }
}
