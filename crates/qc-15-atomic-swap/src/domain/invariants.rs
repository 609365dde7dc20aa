//! # Domain Invariants
//!
//! Validity rules shared by message validation and the handler.

use super::config::{SwapConfig, RANDOM_NUMBER_HASH_LENGTH, RANDOM_NUMBER_LENGTH};
use super::entities::AtomicSwap;
use super::errors::SwapError;
use crate::algorithms::calculate_random_hash;
use shared_types::{AccAddress, Coins, HexBytes, ADDRESS_LENGTH};

/// Invariant: account addresses have the canonical length.
pub fn invariant_address_length(address: &AccAddress) -> Result<(), SwapError> {
    if !address.is_valid() {
        return Err(SwapError::InvalidAddressLength {
            expected: ADDRESS_LENGTH,
            actual: address.len(),
        });
    }
    Ok(())
}

/// Invariant: the commitment is exactly 32 bytes.
pub fn invariant_random_number_hash_length(hash: &HexBytes) -> Result<(), SwapError> {
    if hash.len() != RANDOM_NUMBER_HASH_LENGTH {
        return Err(SwapError::InvalidRandomNumberHash {
            expected: RANDOM_NUMBER_HASH_LENGTH,
            actual: hash.len(),
        });
    }
    Ok(())
}

/// Invariant: the secret is exactly 32 bytes.
pub fn invariant_random_number_length(random_number: &HexBytes) -> Result<(), SwapError> {
    if random_number.len() != RANDOM_NUMBER_LENGTH {
        return Err(SwapError::InvalidRandomNumber {
            expected: RANDOM_NUMBER_LENGTH,
            actual: random_number.len(),
        });
    }
    Ok(())
}

/// Invariant: escrowed coins are non-empty and strictly positive.
pub fn invariant_positive_amount(amount: &Coins) -> Result<(), SwapError> {
    if !amount.is_positive() {
        return Err(SwapError::InvalidSwapOutAmount {
            amount: amount.clone(),
        });
    }
    Ok(())
}

/// Invariant: `height_span ∈ [min_height_span, max_height_span]`.
pub fn invariant_height_span(height_span: i64, config: &SwapConfig) -> Result<(), SwapError> {
    if height_span < config.min_height_span || height_span > config.max_height_span {
        return Err(SwapError::InvalidHeightSpan {
            height_span,
            min: config.min_height_span,
            max: config.max_height_span,
        });
    }
    Ok(())
}

/// Invariant: `timestamp ∈ (block_time - past_window, block_time + future_window]`.
pub fn invariant_timestamp_window(
    timestamp: i64,
    block_time: i64,
    config: &SwapConfig,
) -> Result<(), SwapError> {
    let earliest = block_time.saturating_sub(config.timestamp_past_window_secs);
    let latest = block_time.saturating_add(config.timestamp_future_window_secs);
    if timestamp <= earliest || timestamp > latest {
        return Err(SwapError::InvalidTimestamp {
            timestamp,
            earliest,
            latest,
        });
    }
    Ok(())
}

/// Invariant: cross-chain swaps name a foreign recipient of bounded length;
/// single-chain swaps name none.
pub fn invariant_recipient_other_chain(
    recipient_other_chain: &HexBytes,
    cross_chain: bool,
    config: &SwapConfig,
) -> Result<(), SwapError> {
    if !cross_chain && !recipient_other_chain.is_empty() {
        return Err(SwapError::InvalidRecipientOtherChain(
            "must be empty for single chain swap".to_string(),
        ));
    }
    if cross_chain && recipient_other_chain.is_empty() {
        return Err(SwapError::InvalidRecipientOtherChain(
            "missing for cross chain swap".to_string(),
        ));
    }
    if recipient_other_chain.len() > config.max_recipient_other_chain_len {
        return Err(SwapError::InvalidRecipientOtherChain(format!(
            "length {} exceeds {}",
            recipient_other_chain.len(),
            config.max_recipient_other_chain_len
        )));
    }
    Ok(())
}

/// Invariant: the expected income is a bounded, strictly positive coin list
/// such as `"100:BNB"` or `"100:BNB,10000:BTCB-1DE"`.
pub fn invariant_expected_income(expected_income: &str, config: &SwapConfig) -> Result<(), SwapError> {
    let length = expected_income.chars().count();
    if length > config.max_expected_income_len {
        return Err(SwapError::InvalidExpectedIncome(format!(
            "length {} exceeds {}",
            length, config.max_expected_income_len
        )));
    }
    let coins = Coins::parse(expected_income)
        .map_err(|e| SwapError::InvalidExpectedIncome(e.to_string()))?;
    if !coins.is_positive() {
        return Err(SwapError::InvalidExpectedIncome(format!(
            "'{}' must be positive coins",
            expected_income
        )));
    }
    Ok(())
}

/// Invariant: `SHA256(random_number ‖ be_u64(timestamp))` equals the commitment.
pub fn invariant_secret_matches(random_number: &[u8], timestamp: i64, hash: &[u8]) -> bool {
    calculate_random_hash(random_number, timestamp).as_slice() == hash
}

/// Invariant: a depositor mirrors the creator's pair, i.e. the deposit's
/// `(from, to)` equals the swap's `(to, from)`.
pub fn invariant_mirrored_counterparties(
    swap: &AtomicSwap,
    from: &AccAddress,
    to: &AccAddress,
) -> bool {
    swap.to == *from && swap.from == *to
}
