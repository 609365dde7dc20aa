//! # Swap Keeper
//!
//! Couples store mutations with ledger transfers through the escrow account.
//!
//! Each operation encodes its store batch and checks every balance it will
//! draw on before the first transfer, then writes the batch after the last
//! one. If a transfer or the write fails, the transfers already made are
//! sent back, so a failure leaves neither the ledger nor the store changed.

use super::store::SwapStore;
use crate::algorithms::escrow_address;
use crate::domain::{AtomicSwap, LedgerError, SwapConfig, SwapError};
use crate::ports::{BatchOperation, KeyValueStore, LedgerKeeper, Tag};
use shared_types::{AccAddress, Coins, HexBytes};
use std::sync::Arc;
use tracing::{info, warn};

/// Swap keeper.
pub struct SwapKeeper<S: KeyValueStore, L: LedgerKeeper> {
    store: SwapStore<S>,
    ledger: Arc<L>,
    escrow: AccAddress,
    config: SwapConfig,
}

impl<S: KeyValueStore, L: LedgerKeeper> SwapKeeper<S, L> {
    /// Create a keeper over `kv`, deriving the escrow address from `config`.
    pub fn new(kv: S, ledger: Arc<L>, config: SwapConfig) -> Result<Self, SwapError> {
        config.validate()?;
        let escrow = escrow_address(&config.escrow_domain_tag);
        info!("[qc-15] atomic swap escrow account {}", escrow);
        Ok(Self {
            store: SwapStore::new(kv),
            ledger,
            escrow,
            config,
        })
    }

    /// Module escrow account.
    pub fn escrow_address(&self) -> &AccAddress {
        &self.escrow
    }

    pub fn config(&self) -> &SwapConfig {
        &self.config
    }

    pub fn store(&self) -> &SwapStore<S> {
        &self.store
    }

    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    /// Swap by commitment, if any.
    pub fn get_swap(&self, random_number_hash: &[u8]) -> Result<Option<AtomicSwap>, SwapError> {
        self.store.get(random_number_hash)
    }

    /// Swap by commitment, `NonExistentRandomNumberHash` if absent.
    pub fn require_swap(&self, random_number_hash: &HexBytes) -> Result<AtomicSwap, SwapError> {
        self.store
            .get(random_number_hash.as_bytes())?
            .ok_or_else(|| SwapError::NonExistentRandomNumberHash(random_number_hash.clone()))
    }

    /// Escrow the creator's coins and persist a new swap.
    pub fn lock(&mut self, mut swap: AtomicSwap) -> Result<(AtomicSwap, Vec<Tag>), SwapError> {
        let batch = self.store.create_batch(&mut swap)?;
        self.ensure_funds(&swap.from, &swap.out_amount)?;

        let escrow = self.escrow.clone();
        let transfers = [Transfer::new(&swap.from, &escrow, &swap.out_amount)];
        let tags = self.settle(&transfers, batch)?;

        info!(
            "[qc-15] swap {} locked {} from {} (index {})",
            swap.random_number_hash,
            swap.out_amount,
            swap.from,
            swap.index
        );
        Ok((swap, tags))
    }

    /// Escrow the counterparty's coins into an open single-chain swap.
    pub fn deposit(
        &mut self,
        mut swap: AtomicSwap,
        depositor: &AccAddress,
        amount: Coins,
    ) -> Result<(AtomicSwap, Vec<Tag>), SwapError> {
        swap.deposit(amount)?;
        let batch = self.store.update_batch(&swap)?;
        self.ensure_funds(depositor, &swap.in_amount)?;

        let escrow = self.escrow.clone();
        let transfers = [Transfer::new(depositor, &escrow, &swap.in_amount)];
        let tags = self.settle(&transfers, batch)?;

        info!(
            "[qc-15] swap {} deposited {} by {}",
            swap.random_number_hash,
            swap.in_amount,
            depositor
        );
        Ok((swap, tags))
    }

    /// Release the escrow to the counterparties and close as completed.
    ///
    /// `out_amount` goes to `to`; a deposited `in_amount` goes to `from`.
    pub fn claim(
        &mut self,
        mut swap: AtomicSwap,
        random_number: HexBytes,
        closed_time: i64,
    ) -> Result<(AtomicSwap, Vec<Tag>), SwapError> {
        swap.complete(random_number, closed_time)?;
        let batch = self.store.update_batch(&swap)?;
        let escrow = self.escrow.clone();
        let transfers = [
            Transfer::new(&escrow, &swap.to, &swap.out_amount),
            Transfer::new(&escrow, &swap.from, &swap.in_amount),
        ];
        let tags = self.pay_out(&transfers, batch)?;

        info!(
            "[qc-15] swap {} claimed at {}",
            swap.random_number_hash,
            closed_time
        );
        Ok((swap, tags))
    }

    /// Return the escrow to the depositors and close as expired.
    ///
    /// `out_amount` goes back to `from`; a deposited `in_amount` back to `to`.
    pub fn refund(
        &mut self,
        mut swap: AtomicSwap,
        closed_time: i64,
    ) -> Result<(AtomicSwap, Vec<Tag>), SwapError> {
        swap.expire(closed_time)?;
        let batch = self.store.update_batch(&swap)?;
        let escrow = self.escrow.clone();
        let transfers = [
            Transfer::new(&escrow, &swap.from, &swap.out_amount),
            Transfer::new(&escrow, &swap.to, &swap.in_amount),
        ];
        let tags = self.pay_out(&transfers, batch)?;

        info!(
            "[qc-15] swap {} refunded at {}",
            swap.random_number_hash,
            closed_time
        );
        Ok((swap, tags))
    }

    /// Delete swaps closed strictly before `closed_before`. Returns how many.
    ///
    /// Administrative; never called while applying transactions.
    pub fn prune_closed_swaps(&mut self, closed_before: i64) -> Result<usize, SwapError> {
        let expired: Vec<Vec<u8>> = self
            .store
            .close_time_entries()?
            .into_iter()
            .take_while(|(closed_time, _)| *closed_time < closed_before)
            .map(|(_, hash)| hash)
            .collect();

        for hash in &expired {
            self.store.delete(hash)?;
        }

        if !expired.is_empty() {
            info!(
                "[qc-15] pruned {} swaps closed before {}",
                expired.len(),
                closed_before
            );
        }
        Ok(expired.len())
    }

    fn pay_out(
        &mut self,
        transfers: &[Transfer<'_>],
        batch: Vec<BatchOperation>,
    ) -> Result<Vec<Tag>, SwapError> {
        let total = transfers
            .iter()
            .try_fold(Coins::empty(), |acc, t| acc.checked_add(t.amount))
            .ok_or_else(|| {
                SwapError::Ledger(LedgerError::InvalidCoins(
                    "escrow payout overflow".to_string(),
                ))
            })?;
        self.ensure_funds(&self.escrow, &total)?;
        self.settle(transfers, batch)
    }

    fn ensure_funds(&self, address: &AccAddress, amount: &Coins) -> Result<(), SwapError> {
        if !self.ledger.has_coins(address, amount) {
            return Err(SwapError::InsufficientFunds {
                address: address.clone(),
                required: amount.clone(),
                available: self.ledger.get_coins(address),
            });
        }
        Ok(())
    }

    /// Make `transfers` in order, then apply `batch`. Any failure reverses
    /// the transfers already made, so the ledger and the store move together.
    fn settle(
        &mut self,
        transfers: &[Transfer<'_>],
        batch: Vec<BatchOperation>,
    ) -> Result<Vec<Tag>, SwapError> {
        let mut tags = Vec::new();
        let mut done = 0;
        for transfer in transfers.iter().filter(|t| !t.amount.is_empty()) {
            match self.transfer(transfer) {
                Ok(sent) => {
                    tags.extend(sent);
                    done += 1;
                }
                Err(e) => {
                    self.reverse(transfers, done);
                    return Err(e);
                }
            }
        }

        if let Err(e) = self.store.write(batch) {
            warn!("[qc-15] swap store write failed, reversing transfers: {}", e);
            self.reverse(transfers, done);
            return Err(e);
        }
        Ok(tags)
    }

    fn transfer(&self, transfer: &Transfer<'_>) -> Result<Vec<Tag>, SwapError> {
        self.ledger
            .send_coins(transfer.from, transfer.to, transfer.amount)
            .map_err(|e| {
                if !matches!(e, LedgerError::InsufficientFunds { .. }) {
                    warn!(
                        "[qc-15] ledger transfer {} -> {} failed: {}",
                        transfer.from, transfer.to, e
                    );
                }
                SwapError::from(e)
            })
    }

    /// Send back the first `done` non-empty transfers, newest first.
    fn reverse(&self, transfers: &[Transfer<'_>], done: usize) {
        let made: Vec<&Transfer<'_>> = transfers
            .iter()
            .filter(|t| !t.amount.is_empty())
            .take(done)
            .collect();
        for transfer in made.into_iter().rev() {
            if let Err(e) = self
                .ledger
                .send_coins(transfer.to, transfer.from, transfer.amount)
            {
                warn!(
                    "[qc-15] could not reverse transfer of {} {} -> {}: {}",
                    transfer.amount, transfer.from, transfer.to, e
                );
            }
        }
    }
}

/// One ledger movement.
struct Transfer<'a> {
    from: &'a AccAddress,
    to: &'a AccAddress,
    amount: &'a Coins,
}

impl<'a> Transfer<'a> {
    fn new(from: &'a AccAddress, to: &'a AccAddress, amount: &'a Coins) -> Self {
        Self { from, to, amount }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryKVStore, InMemoryLedger};
    use crate::domain::{KVStoreError, SwapStatus};
    use crate::test_utils::{addr, open_swap};
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Store whose writes can be switched off from the test.
    struct FlakyStore {
        inner: InMemoryKVStore,
        fail_writes: Arc<AtomicBool>,
    }

    impl FlakyStore {
        fn check(&self) -> Result<(), KVStoreError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(KVStoreError::IOError {
                    message: "disk full".to_string(),
                });
            }
            Ok(())
        }
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
            self.inner.get(key)
        }

        fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
            self.check()?;
            self.inner.put(key, value)
        }

        fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
            self.check()?;
            self.inner.delete(key)
        }

        fn atomic_batch_write(
            &mut self,
            operations: Vec<BatchOperation>,
        ) -> Result<(), KVStoreError> {
            self.check()?;
            self.inner.atomic_batch_write(operations)
        }

        fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
            self.inner.exists(key)
        }

        fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KVStoreError> {
            self.inner.prefix_scan(prefix)
        }
    }

    fn create_flaky_keeper() -> (SwapKeeper<FlakyStore, InMemoryLedger>, Arc<AtomicBool>) {
        let fail_writes = Arc::new(AtomicBool::new(false));
        let store = FlakyStore {
            inner: InMemoryKVStore::new(),
            fail_writes: fail_writes.clone(),
        };
        let ledger = Arc::new(InMemoryLedger::new());
        ledger.set_coins(&addr(1), Coins::single("BNB", 100_000));
        ledger.set_coins(&addr(2), Coins::single("ABC", 100_000));
        let keeper = SwapKeeper::new(store, ledger, SwapConfig::default()).unwrap();
        (keeper, fail_writes)
    }

    fn create_keeper() -> SwapKeeper<InMemoryKVStore, InMemoryLedger> {
        let ledger = Arc::new(InMemoryLedger::new());
        ledger.set_coins(&addr(1), Coins::single("BNB", 100_000));
        ledger.set_coins(&addr(2), Coins::single("ABC", 100_000));
        SwapKeeper::new(InMemoryKVStore::new(), ledger, SwapConfig::default()).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = SwapConfig::default().with_height_span(10, 1);
        let result = SwapKeeper::new(
            InMemoryKVStore::new(),
            Arc::new(InMemoryLedger::new()),
            config,
        );
        assert!(matches!(result, Err(SwapError::InvalidConfig(_))));
    }

    #[test]
    fn test_lock_moves_coins_to_escrow() {
        let mut keeper = create_keeper();
        let (swap, tags) = keeper.lock(open_swap(1, 2, [0x11u8; 32])).unwrap();

        assert!(!tags.is_empty());
        let escrow = keeper.escrow_address().clone();
        assert_eq!(keeper.ledger().get_coins(&escrow), swap.out_amount);
        assert_eq!(keeper.ledger().get_coins(&addr(1)), Coins::single("BNB", 90_000));
    }

    #[test]
    fn test_lock_without_funds_changes_nothing() {
        let mut keeper = create_keeper();
        let result = keeper.lock(open_swap(3, 2, [0x11u8; 32]));
        assert!(matches!(result, Err(SwapError::InsufficientFunds { .. })));
        assert!(keeper.get_swap(&[0x11u8; 32]).unwrap().is_none());
        assert!(keeper.store().kv().is_empty());
    }

    #[test]
    fn test_duplicate_lock_moves_no_funds() {
        let mut keeper = create_keeper();
        keeper.lock(open_swap(1, 2, [0x11u8; 32])).unwrap();
        let result = keeper.lock(open_swap(1, 2, [0x11u8; 32]));
        assert!(matches!(result, Err(SwapError::DuplicatedRandomNumberHash(_))));
        assert_eq!(keeper.ledger().get_coins(&addr(1)), Coins::single("BNB", 90_000));
    }

    #[test]
    fn test_claim_pays_both_legs() {
        let mut keeper = create_keeper();
        let (swap, _) = keeper.lock(open_swap(1, 2, [0x11u8; 32])).unwrap();
        let (swap, _) = keeper
            .deposit(swap, &addr(2), Coins::single("ABC", 500))
            .unwrap();
        let (swap, _) = keeper
            .claim(swap, HexBytes::new(vec![7u8; 32]), 1_600_000_000)
            .unwrap();

        assert_eq!(swap.status, SwapStatus::Completed);
        let escrow = keeper.escrow_address().clone();
        assert!(keeper.ledger().get_coins(&escrow).is_empty());
        assert_eq!(keeper.ledger().get_coins(&addr(1)).amount_of("ABC"), 500);
        assert_eq!(keeper.ledger().get_coins(&addr(2)).amount_of("BNB"), 10_000);
    }

    #[test]
    fn test_refund_returns_both_legs() {
        let mut keeper = create_keeper();
        let (swap, _) = keeper.lock(open_swap(1, 2, [0x11u8; 32])).unwrap();
        let (swap, _) = keeper
            .deposit(swap, &addr(2), Coins::single("ABC", 500))
            .unwrap();
        let (swap, _) = keeper.refund(swap, 1_600_000_000).unwrap();

        assert_eq!(swap.status, SwapStatus::Expired);
        assert_eq!(keeper.ledger().get_coins(&addr(1)), Coins::single("BNB", 100_000));
        assert_eq!(keeper.ledger().get_coins(&addr(2)), Coins::single("ABC", 100_000));
    }

    #[test]
    fn test_prune_closed_swaps_respects_cutoff() {
        let mut keeper = create_keeper();
        let (a, _) = keeper.lock(open_swap(1, 2, [0x01u8; 32])).unwrap();
        let (b, _) = keeper.lock(open_swap(1, 2, [0x02u8; 32])).unwrap();
        keeper.lock(open_swap(1, 2, [0x03u8; 32])).unwrap();
        keeper.refund(a, 100).unwrap();
        keeper.refund(b, 200).unwrap();

        assert_eq!(keeper.prune_closed_swaps(200).unwrap(), 1);
        assert!(keeper.get_swap(&[0x01u8; 32]).unwrap().is_none());
        assert!(keeper.get_swap(&[0x02u8; 32]).unwrap().is_some());
        assert!(keeper.get_swap(&[0x03u8; 32]).unwrap().is_some());
        assert_eq!(keeper.prune_closed_swaps(200).unwrap(), 0);
    }

    #[test]
    fn test_failed_store_write_reverses_lock() {
        let (mut keeper, fail_writes) = create_flaky_keeper();
        fail_writes.store(true, Ordering::SeqCst);

        let result = keeper.lock(open_swap(1, 2, [0x11u8; 32]));
        assert!(matches!(result, Err(SwapError::Store(KVStoreError::IOError { .. }))));

        let escrow = keeper.escrow_address().clone();
        assert_eq!(keeper.ledger().get_coins(&addr(1)), Coins::single("BNB", 100_000));
        assert!(keeper.ledger().get_coins(&escrow).is_empty());
        assert!(keeper.get_swap(&[0x11u8; 32]).unwrap().is_none());
    }

    #[test]
    fn test_failed_store_write_reverses_deposit() {
        let (mut keeper, fail_writes) = create_flaky_keeper();
        let (swap, _) = keeper.lock(open_swap(1, 2, [0x11u8; 32])).unwrap();
        fail_writes.store(true, Ordering::SeqCst);

        let result = keeper.deposit(swap, &addr(2), Coins::single("ABC", 500));
        assert!(matches!(result, Err(SwapError::Store(_))));

        let escrow = keeper.escrow_address().clone();
        assert_eq!(keeper.ledger().get_coins(&addr(2)), Coins::single("ABC", 100_000));
        assert_eq!(keeper.ledger().get_coins(&escrow), Coins::single("BNB", 10_000));
        assert!(!keeper.get_swap(&[0x11u8; 32]).unwrap().unwrap().is_deposited());
    }

    #[test]
    fn test_failed_store_write_reverses_both_claim_legs() {
        let (mut keeper, fail_writes) = create_flaky_keeper();
        let (swap, _) = keeper.lock(open_swap(1, 2, [0x11u8; 32])).unwrap();
        let (swap, _) = keeper
            .deposit(swap, &addr(2), Coins::single("ABC", 500))
            .unwrap();
        fail_writes.store(true, Ordering::SeqCst);

        let result = keeper.claim(swap, HexBytes::new(vec![7u8; 32]), 1_600_000_000);
        assert!(matches!(result, Err(SwapError::Store(_))));

        let escrow = keeper.escrow_address().clone();
        let held = Coins::single("BNB", 10_000)
            .checked_add(&Coins::single("ABC", 500))
            .unwrap();
        assert_eq!(keeper.ledger().get_coins(&escrow), held);
        assert_eq!(keeper.ledger().get_coins(&addr(1)), Coins::single("BNB", 90_000));
        assert_eq!(keeper.ledger().get_coins(&addr(2)), Coins::single("ABC", 99_500));

        let stored = keeper.get_swap(&[0x11u8; 32]).unwrap().unwrap();
        assert_eq!(stored.status, SwapStatus::Open);
        assert!(keeper.store().close_time_entries().unwrap().is_empty());
    }

    #[test]
    fn test_failed_store_write_reverses_refund() {
        let (mut keeper, fail_writes) = create_flaky_keeper();
        let (swap, _) = keeper.lock(open_swap(1, 2, [0x11u8; 32])).unwrap();
        fail_writes.store(true, Ordering::SeqCst);

        assert!(keeper.refund(swap, 1_600_000_000).is_err());

        let escrow = keeper.escrow_address().clone();
        assert_eq!(keeper.ledger().get_coins(&escrow), Coins::single("BNB", 10_000));
        assert_eq!(keeper.ledger().get_coins(&addr(1)), Coins::single("BNB", 90_000));
    }
}
