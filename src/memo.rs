//! Keyed single-flight memo table
//!
//! Each key owns an `Arc<OnceCell<V>>`. The map lock is only held long enough
//! to fetch or insert the cell; the computation itself runs under the cell, so
//! concurrent misses on one key share a single computation while other keys
//! proceed. A failed computation leaves the cell empty and the next caller
//! retries.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::OnceCell;

pub(crate) struct MemoTable<K, V> {
    cells: Mutex<HashMap<K, Arc<OnceCell<V>>>>,
}

impl<K, V> Default for MemoTable<K, V> {
    fn default() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> MemoTable<K, V>
where
    K: Eq + Hash + Copy,
    V: Clone,
{
    fn cell(&self, key: K) -> Arc<OnceCell<V>> {
        self.cells.lock().entry(key).or_default().clone()
    }

    /// Published value for `key`, if any
    pub(crate) fn get(&self, key: K) -> Option<V> {
        let cell = self.cells.lock().get(&key).cloned()?;
        cell.get().cloned()
    }

    /// Return the published value or run `init` (at most once at a time per key)
    pub(crate) async fn get_or_try_init<E, F, Fut>(&self, key: K, init: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let cell = self.cell(key);
        cell.get_or_try_init(init).await.cloned()
    }

    /// Infallible variant of [`get_or_try_init`](Self::get_or_try_init)
    pub(crate) async fn get_or_init<F, Fut>(&self, key: K, init: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let cell = self.cell(key);
        cell.get_or_init(init).await.clone()
    }

    /// Number of keys with a published value
    pub(crate) fn published(&self) -> usize {
        self.cells
            .lock()
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_failure_is_not_memoized() {
        let table: MemoTable<i32, u32> = MemoTable::default();

        let first: Result<u32, &str> = table.get_or_try_init(1, || async { Err("offline") }).await;
        assert!(first.is_err());
        assert_eq!(table.get(1), None);
        assert_eq!(table.published(), 0);

        let second: Result<u32, &str> = table.get_or_try_init(1, || async { Ok(7) }).await;
        assert_eq!(second, Ok(7));
        assert_eq!(table.get(1), Some(7));
        assert_eq!(table.published(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_misses_share_one_init() {
        let table: Arc<MemoTable<i32, u32>> = Arc::new(MemoTable::default());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let table = table.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                table
                    .get_or_init(42, || async {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        99
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), 99);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
