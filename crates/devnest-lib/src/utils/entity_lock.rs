// Per-entity async locks
// Serializes read-modify-write sequences on the same project id

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Keyed async mutexes, one per entity id
#[derive(Default)]
pub struct EntityLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl EntityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`
    /// Different ids never block each other
    pub async fn acquire(&self, id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            // Only the map holds a reference: nobody is waiting or holding it
            locks.retain(|key, lock| key == id || Arc::strong_count(lock) > 1);
            locks.entry(id.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_id_is_serialized() {
        let locks = Arc::new(EntityLocks::new());
        let active = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let locks = locks.clone();
            let active = active.clone();
            let max_seen = max_seen.clone();
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire("project-1").await;
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                active.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_different_ids_do_not_block() {
        let locks = EntityLocks::new();
        let _a = locks.acquire("a").await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.acquire("b")).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_released_locks_are_pruned() {
        let locks = EntityLocks::new();
        {
            let _a = locks.acquire("a").await;
        }
        let _b = locks.acquire("b").await;
        assert_eq!(locks.tracked(), 1);
    }
}
