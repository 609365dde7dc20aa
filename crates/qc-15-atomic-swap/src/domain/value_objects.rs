//! # Domain Value Objects
//!
//! Immutable value types for the Atomic Swap engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Swap state machine.
///
/// `Open → Completed` by claim, `Open → Expired` by refund. Both are terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapStatus {
    /// Funds escrowed, awaiting claim or expiry.
    #[default]
    Open,
    /// Secret revealed, escrow released to the counterparties.
    Completed,
    /// Expired and refunded to the depositors.
    Expired,
}

impl SwapStatus {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: SwapStatus) -> bool {
        matches!(
            (self, next),
            (Self::Open, Self::Completed) | (Self::Open, Self::Expired)
        )
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Expired)
    }
}

impl fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Open => "Open",
            Self::Completed => "Completed",
            Self::Expired => "Expired",
        };
        f.write_str(s)
    }
}

impl FromStr for SwapStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "completed" => Ok(Self::Completed),
            "expired" => Ok(Self::Expired),
            other => Err(format!("unknown swap status '{}'", other)),
        }
    }
}

/// The four state-changing operations, used in errors and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapOperation {
    /// HTLT creation.
    Create,
    /// Counterparty deposit into a single-chain swap.
    Deposit,
    /// Secret reveal.
    Claim,
    /// Post-expiry refund.
    Refund,
}

impl fmt::Display for SwapOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Create => "create",
            Self::Deposit => "deposit",
            Self::Claim => "claim",
            Self::Refund => "refund",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_transitions() {
        assert!(SwapStatus::Open.can_transition_to(SwapStatus::Completed));
        assert!(SwapStatus::Open.can_transition_to(SwapStatus::Expired));
        assert!(!SwapStatus::Open.can_transition_to(SwapStatus::Open));
    }

    #[test]
    fn test_terminal_states_are_final() {
        for status in [SwapStatus::Completed, SwapStatus::Expired] {
            assert!(status.is_terminal());
            assert!(!status.can_transition_to(SwapStatus::Open));
            assert!(!status.can_transition_to(SwapStatus::Completed));
            assert!(!status.can_transition_to(SwapStatus::Expired));
        }
        assert!(!SwapStatus::Open.is_terminal());
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("open".parse::<SwapStatus>(), Ok(SwapStatus::Open));
        assert_eq!("Completed".parse::<SwapStatus>(), Ok(SwapStatus::Completed));
        assert_eq!("EXPIRED".parse::<SwapStatus>(), Ok(SwapStatus::Expired));
        assert!("closed".parse::<SwapStatus>().is_err());
    }

    #[test]
    fn test_status_json() {
        assert_eq!(serde_json::to_string(&SwapStatus::Open).unwrap(), "\"Open\"");
    }
}
