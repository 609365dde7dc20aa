//! # Query Service
//!
//! Paginated listings over the creator and recipient indexes. The status
//! filter is applied before paging, so a page holds only matching swaps.

use super::store::SwapStore;
use crate::domain::{AtomicSwap, SwapConfig, SwapError};
use crate::ports::{KeyValueStore, SwapPage};
use shared_types::AccAddress;

/// `(offset, limit)` for a page request.
pub fn page_bounds(page: &SwapPage, config: &SwapConfig) -> Result<(usize, usize), SwapError> {
    let page_size = page.page_size.unwrap_or(config.default_page_size);
    if page_size == 0 || page_size > config.max_page_size {
        return Err(SwapError::InvalidPaginationParameters(format!(
            "page size must be in [1, {}], got {}",
            config.max_page_size, page_size
        )));
    }
    let offset = page.page_num.checked_mul(page_size).ok_or_else(|| {
        SwapError::InvalidPaginationParameters(format!("page number {} too large", page.page_num))
    })?;
    Ok((offset, page_size))
}

/// Swaps created by `from`, in index key order.
pub fn swaps_by_creator<S: KeyValueStore>(
    store: &SwapStore<S>,
    config: &SwapConfig,
    from: &AccAddress,
    page: &SwapPage,
) -> Result<Vec<AtomicSwap>, SwapError> {
    let bounds = page_bounds(page, config)?;
    let hashes = store.creator_hashes(from)?;
    collect_page(store, hashes, page, bounds)
}

/// Swaps addressed to `to`, in index key order.
pub fn swaps_by_recipient<S: KeyValueStore>(
    store: &SwapStore<S>,
    config: &SwapConfig,
    to: &AccAddress,
    page: &SwapPage,
) -> Result<Vec<AtomicSwap>, SwapError> {
    let bounds = page_bounds(page, config)?;
    let hashes = store.recipient_hashes(to)?;
    collect_page(store, hashes, page, bounds)
}

fn collect_page<S: KeyValueStore>(
    store: &SwapStore<S>,
    hashes: Vec<Vec<u8>>,
    page: &SwapPage,
    (offset, limit): (usize, usize),
) -> Result<Vec<AtomicSwap>, SwapError> {
    match page.status {
        // unfiltered pages only decode the records they return
        None => store
            .resolve(hashes.into_iter().skip(offset).take(limit))
            .collect(),
        Some(status) => store
            .resolve(hashes)
            .filter(|swap| swap.as_ref().map_or(true, |s| s.status == status))
            .skip(offset)
            .take(limit)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryKVStore;
    use crate::domain::SwapStatus;
    use crate::test_utils::{addr, open_swap};

    fn store_with_swaps(count: u8) -> SwapStore<InMemoryKVStore> {
        let mut store = SwapStore::new(InMemoryKVStore::new());
        for i in 0..count {
            let mut swap = open_swap(1, 2, [i; 32]);
            store.create(&mut swap).unwrap();
            if i % 2 == 1 {
                swap.expire(100 + i64::from(i)).unwrap();
                store.update(&swap).unwrap();
            }
        }
        store
    }

    fn page(status: Option<SwapStatus>, page_size: Option<usize>, page_num: usize) -> SwapPage {
        SwapPage {
            status,
            page_size,
            page_num,
        }
    }

    #[test]
    fn test_page_size_bounds() {
        let config = SwapConfig::default();
        assert_eq!(page_bounds(&page(None, None, 0), &config).unwrap(), (0, 100));
        assert_eq!(page_bounds(&page(None, Some(1000), 2), &config).unwrap(), (2000, 1000));
        assert!(matches!(
            page_bounds(&page(None, Some(0), 0), &config),
            Err(SwapError::InvalidPaginationParameters(_))
        ));
        assert!(page_bounds(&page(None, Some(1001), 0), &config).is_err());
        assert!(page_bounds(&page(None, Some(2), usize::MAX), &config).is_err());
    }

    #[test]
    fn test_pages_are_disjoint_and_ordered() {
        let store = store_with_swaps(5);
        let config = SwapConfig::default();

        let mut seen = Vec::new();
        for n in 0..3 {
            let swaps = swaps_by_creator(&store, &config, &addr(1), &page(None, Some(2), n)).unwrap();
            seen.extend(swaps.into_iter().map(|s| s.random_number_hash.as_bytes()[0]));
        }
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);

        let beyond = swaps_by_creator(&store, &config, &addr(1), &page(None, Some(2), 3)).unwrap();
        assert!(beyond.is_empty());
    }

    #[test]
    fn test_status_filter_before_paging() {
        let store = store_with_swaps(6);
        let config = SwapConfig::default();

        let first = swaps_by_recipient(
            &store,
            &config,
            &addr(2),
            &page(Some(SwapStatus::Expired), Some(2), 0),
        )
        .unwrap();
        let second = swaps_by_recipient(
            &store,
            &config,
            &addr(2),
            &page(Some(SwapStatus::Expired), Some(2), 1),
        )
        .unwrap();

        let ids: Vec<u8> = first
            .iter()
            .chain(second.iter())
            .map(|s| s.random_number_hash.as_bytes()[0])
            .collect();
        assert_eq!(ids, vec![1, 3, 5]);
        assert!(first.iter().all(|s| s.status == SwapStatus::Expired));
    }

    #[test]
    fn test_unknown_address_is_empty() {
        let store = store_with_swaps(3);
        let config = SwapConfig::default();
        assert!(swaps_by_creator(&store, &config, &addr(9), &SwapPage::default())
            .unwrap()
            .is_empty());
        assert!(swaps_by_recipient(&store, &config, &addr(1), &SwapPage::default())
            .unwrap()
            .is_empty());
    }
}
