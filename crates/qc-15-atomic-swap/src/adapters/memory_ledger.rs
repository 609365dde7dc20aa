//! # In-Memory Ledger
//!
//! Balance book implementing `LedgerKeeper`, shared behind an `Arc`.

use crate::domain::LedgerError;
use crate::ports::{LedgerKeeper, Tag};
use parking_lot::RwLock;
use shared_types::{AccAddress, Coins};
use std::collections::HashMap;
use tracing::debug;

/// In-memory account ledger.
#[derive(Default)]
pub struct InMemoryLedger {
    balances: RwLock<HashMap<AccAddress, Coins>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the balance of `address`.
    pub fn set_coins(&self, address: &AccAddress, coins: Coins) {
        self.balances
            .write()
            .insert(address.clone(), coins.normalized());
    }

    /// Sum of all balances of `denom`.
    pub fn total_supply(&self, denom: &str) -> i64 {
        self.balances
            .read()
            .values()
            .fold(0i64, |acc, c| acc.saturating_add(c.amount_of(denom)))
    }
}

impl LedgerKeeper for InMemoryLedger {
    fn send_coins(
        &self,
        from: &AccAddress,
        to: &AccAddress,
        amount: &Coins,
    ) -> Result<Vec<Tag>, LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidCoins(format!(
                "cannot send '{}'",
                amount
            )));
        }

        let mut balances = self.balances.write();
        let available = balances.get(from).cloned().unwrap_or_default();
        let remaining =
            available
                .checked_sub(amount)
                .ok_or_else(|| LedgerError::InsufficientFunds {
                    address: from.clone(),
                    required: amount.clone(),
                    available: available.clone(),
                })?;

        if from != to {
            let received = balances
                .get(to)
                .cloned()
                .unwrap_or_default()
                .checked_add(amount)
                .ok_or_else(|| {
                    LedgerError::InvalidCoins(format!("balance overflow for {}", to))
                })?;
            balances.insert(from.clone(), remaining);
            balances.insert(to.clone(), received);
        }

        debug!("[qc-15] ledger transfer {} from {} to {}", amount, from, to);

        Ok(vec![Tag::new("sender", from.to_string()), Tag::new("recipient", to.to_string())])
    }

    fn get_coins(&self, address: &AccAddress) -> Coins {
        self.balances
            .read()
            .get(address)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> AccAddress {
        AccAddress::new(vec![byte; 20])
    }

    #[test]
    fn test_send_coins_moves_balance() {
        let ledger = InMemoryLedger::new();
        ledger.set_coins(&addr(1), Coins::parse("100:BNB,5:ABC").unwrap());

        let tags = ledger
            .send_coins(&addr(1), &addr(2), &Coins::single("BNB", 40))
            .unwrap();
        assert_eq!(tags[0], Tag::new("sender", addr(1).to_string()));

        assert_eq!(ledger.get_coins(&addr(1)), Coins::parse("60:BNB,5:ABC").unwrap());
        assert_eq!(ledger.get_coins(&addr(2)), Coins::single("BNB", 40));
        assert_eq!(ledger.total_supply("BNB"), 100);
    }

    #[test]
    fn test_insufficient_funds_leaves_balances() {
        let ledger = InMemoryLedger::new();
        ledger.set_coins(&addr(1), Coins::single("BNB", 10));

        let result = ledger.send_coins(&addr(1), &addr(2), &Coins::single("BNB", 11));
        assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));
        assert_eq!(ledger.get_coins(&addr(1)), Coins::single("BNB", 10));
        assert!(ledger.get_coins(&addr(2)).is_empty());
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let ledger = InMemoryLedger::new();
        ledger.set_coins(&addr(1), Coins::single("BNB", 10));
        assert!(matches!(
            ledger.send_coins(&addr(1), &addr(2), &Coins::single("BNB", -5)),
            Err(LedgerError::InvalidCoins(_))
        ));
        assert!(ledger
            .send_coins(&addr(1), &addr(2), &Coins::empty())
            .is_err());
    }

    #[test]
    fn test_has_coins() {
        let ledger = InMemoryLedger::new();
        ledger.set_coins(&addr(1), Coins::single("BNB", 10));
        assert!(ledger.has_coins(&addr(1), &Coins::single("BNB", 10)));
        assert!(!ledger.has_coins(&addr(1), &Coins::single("ABC", 1)));
    }
}
