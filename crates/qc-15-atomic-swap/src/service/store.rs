//! # Swap Store
//!
//! Primary records plus the creator, recipient and close-time indexes.
//! Every mutating method is a single `atomic_batch_write`, so the indexes
//! never disagree with the primary table.

use crate::algorithms::keys;
use crate::domain::{AtomicSwap, KVStoreError, SwapError};
use crate::ports::{BatchOperation, KeyValueStore};
use shared_types::{AccAddress, HexBytes};

/// Index-consistent access to persisted swaps.
pub struct SwapStore<S: KeyValueStore> {
    kv: S,
}

impl<S: KeyValueStore> SwapStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Underlying namespace.
    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Swap by commitment.
    pub fn get(&self, random_number_hash: &[u8]) -> Result<Option<AtomicSwap>, SwapError> {
        match self.kv.get(&keys::swap_key(random_number_hash))? {
            Some(bytes) => decode_swap(&bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Whether a swap with this commitment was ever created.
    pub fn has(&self, random_number_hash: &[u8]) -> Result<bool, SwapError> {
        Ok(self.kv.exists(&keys::swap_key(random_number_hash))?)
    }

    /// Index the next created swap will receive.
    pub fn next_index(&self) -> Result<u64, SwapError> {
        match self.kv.get(&keys::index_key())? {
            Some(bytes) => {
                let raw: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    SwapError::Store(KVStoreError::Corruption {
                        message: format!("swap index has {} bytes", bytes.len()),
                    })
                })?;
                Ok(u64::from_be_bytes(raw))
            }
            None => Ok(0),
        }
    }

    /// Insert a new swap, assigning its index. Returns the index.
    pub fn create(&mut self, swap: &mut AtomicSwap) -> Result<u64, SwapError> {
        let batch = self.create_batch(swap)?;
        self.write(batch)?;
        Ok(swap.index)
    }

    /// Rewrite an existing swap.
    pub fn update(&mut self, swap: &AtomicSwap) -> Result<(), SwapError> {
        let batch = self.update_batch(swap)?;
        self.write(batch)
    }

    /// Entries inserting a new, open swap. Assigns `swap.index` but writes
    /// nothing.
    pub fn create_batch(&self, swap: &mut AtomicSwap) -> Result<Vec<BatchOperation>, SwapError> {
        if self.has(swap.random_number_hash.as_bytes())? {
            return Err(SwapError::DuplicatedRandomNumberHash(
                swap.random_number_hash.clone(),
            ));
        }

        let index = self.next_index()?;
        swap.index = index;
        let encoded = encode_swap(swap)?;
        let hash = swap.random_number_hash.as_bytes();

        Ok(vec![
            BatchOperation::put(keys::swap_key(hash), encoded),
            BatchOperation::put(keys::creator_key(&swap.from, hash), hash.to_vec()),
            BatchOperation::put(keys::recipient_key(&swap.to, hash), hash.to_vec()),
            BatchOperation::put(keys::index_key(), (index + 1).to_be_bytes().to_vec()),
        ])
    }

    /// Entries rewriting an existing swap, plus its close-time entry once
    /// closed. Writes nothing.
    pub fn update_batch(&self, swap: &AtomicSwap) -> Result<Vec<BatchOperation>, SwapError> {
        let hash = swap.random_number_hash.as_bytes();
        if !self.has(hash)? {
            return Err(SwapError::NonExistentRandomNumberHash(
                swap.random_number_hash.clone(),
            ));
        }

        let mut batch = vec![BatchOperation::put(keys::swap_key(hash), encode_swap(swap)?)];
        if swap.closed_time > 0 {
            batch.push(BatchOperation::put(
                keys::close_time_key(swap.closed_time, hash),
                hash.to_vec(),
            ));
        }
        Ok(batch)
    }

    /// Apply a prepared batch atomically.
    pub fn write(&mut self, batch: Vec<BatchOperation>) -> Result<(), SwapError> {
        Ok(self.kv.atomic_batch_write(batch)?)
    }

    /// Remove a swap and all of its index entries.
    pub fn delete(&mut self, random_number_hash: &[u8]) -> Result<AtomicSwap, SwapError> {
        let swap = self.get(random_number_hash)?.ok_or_else(|| {
            SwapError::NonExistentRandomNumberHash(HexBytes::from(random_number_hash))
        })?;

        let mut batch = vec![
            BatchOperation::delete(keys::swap_key(random_number_hash)),
            BatchOperation::delete(keys::creator_key(&swap.from, random_number_hash)),
            BatchOperation::delete(keys::recipient_key(&swap.to, random_number_hash)),
        ];
        if swap.closed_time > 0 {
            batch.push(BatchOperation::delete(keys::close_time_key(
                swap.closed_time,
                random_number_hash,
            )));
        }
        self.kv.atomic_batch_write(batch)?;
        Ok(swap)
    }

    /// Commitments of swaps created by `from`, in key order.
    pub fn creator_hashes(&self, from: &AccAddress) -> Result<Vec<Vec<u8>>, SwapError> {
        self.index_values(&keys::creator_prefix(from))
    }

    /// Commitments of swaps addressed to `to`, in key order.
    pub fn recipient_hashes(&self, to: &AccAddress) -> Result<Vec<Vec<u8>>, SwapError> {
        self.index_values(&keys::recipient_prefix(to))
    }

    /// `(closed_time, commitment)` of closed swaps, oldest first.
    pub fn close_time_entries(&self) -> Result<Vec<(i64, Vec<u8>)>, SwapError> {
        self.kv
            .prefix_scan(&keys::close_time_prefix())?
            .into_iter()
            .map(|(key, hash)| {
                let closed_time = keys::close_time_of(&key).ok_or_else(|| {
                    SwapError::Store(KVStoreError::Corruption {
                        message: format!("malformed close time key {}", hex::encode(&key)),
                    })
                })?;
                Ok((closed_time, hash))
            })
            .collect()
    }

    /// Resolve commitments lazily through the primary table.
    ///
    /// An index entry without a primary record is reported as corruption.
    pub fn resolve<'a, I>(
        &'a self,
        hashes: I,
    ) -> impl Iterator<Item = Result<AtomicSwap, SwapError>> + 'a
    where
        I: IntoIterator<Item = Vec<u8>> + 'a,
        I::IntoIter: 'a,
    {
        hashes.into_iter().map(move |hash| -> Result<AtomicSwap, SwapError> {
            self.get(&hash)?.ok_or_else(|| {
                SwapError::Store(KVStoreError::Corruption {
                    message: format!("index points at missing swap {}", hex::encode(&hash)),
                })
            })
        })
    }

    fn index_values(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>, SwapError> {
        Ok(self
            .kv
            .prefix_scan(prefix)?
            .into_iter()
            .map(|(_, hash)| hash)
            .collect())
    }
}

fn encode_swap(swap: &AtomicSwap) -> Result<Vec<u8>, SwapError> {
    bincode::serialize(swap).map_err(|e| SwapError::Codec(e.to_string()))
}

fn decode_swap(bytes: &[u8]) -> Result<AtomicSwap, SwapError> {
    bincode::deserialize(bytes).map_err(|e| SwapError::Codec(e.to_string()))
}
