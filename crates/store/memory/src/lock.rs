use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;
use uuid::Uuid;

use trigon_store::error::StoreError;
use trigon_store::lock::{DistributedLock, LockGuard};

/// Internal entry representing a held lock.
#[derive(Debug, Clone)]
struct LockEntry {
    owner: String,
    expires_at: Instant,
}

impl LockEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-memory [`DistributedLock`] backed by a [`DashMap`].
///
/// Lock expiry is lazy: expired entries are evicted on the next acquire
/// attempt for the same lock name.
#[derive(Debug, Clone, Default)]
pub struct MemoryDistributedLock {
    locks: Arc<DashMap<String, LockEntry>>,
}

impl MemoryDistributedLock {
    /// Create a new in-memory lock manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DistributedLock for MemoryDistributedLock {
    async fn try_acquire(
        &self,
        name: &str,
        ttl: Duration,
    ) -> Result<Option<Box<dyn LockGuard>>, StoreError> {
        let key = name.to_owned();

        // Remove expired entries lazily.
        self.locks.remove_if(&key, |_, entry| entry.is_expired());

        let owner = Uuid::new_v4().to_string();
        match self.locks.entry(key.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Ok(None),
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                vacant.insert(LockEntry {
                    owner: owner.clone(),
                    expires_at: Instant::now() + ttl,
                });
                Ok(Some(Box::new(MemoryLockGuard {
                    locks: Arc::clone(&self.locks),
                    name: key,
                    owner,
                })))
            }
        }
    }

    async fn acquire(
        &self,
        name: &str,
        ttl: Duration,
        timeout: Duration,
    ) -> Result<Box<dyn LockGuard>, StoreError> {
        let deadline = Instant::now() + timeout;

        loop {
            if let Some(guard) = self.try_acquire(name, ttl).await? {
                return Ok(guard);
            }

            if Instant::now() >= deadline {
                return Err(StoreError::Timeout(timeout));
            }

            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

/// Guard for a lock acquired via [`MemoryDistributedLock`].
#[derive(Debug)]
pub struct MemoryLockGuard {
    locks: Arc<DashMap<String, LockEntry>>,
    name: String,
    owner: String,
}

#[async_trait]
impl LockGuard for MemoryLockGuard {
    async fn extend(&self, duration: Duration) -> Result<(), StoreError> {
        let mut entry = self
            .locks
            .get_mut(&self.name)
            .ok_or_else(|| StoreError::LockExpired(self.name.clone()))?;

        if entry.owner != self.owner || entry.is_expired() {
            return Err(StoreError::LockExpired(self.name.clone()));
        }

        entry.expires_at = Instant::now() + duration;
        Ok(())
    }

    async fn release(self: Box<Self>) -> Result<(), StoreError> {
        self.locks
            .remove_if(&self.name, |_, entry| entry.owner == self.owner);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn acquire_and_release() {
        let lock = MemoryDistributedLock::new();
        let guard = lock
            .try_acquire("board:t:b", Duration::from_secs(5))
            .await
            .unwrap()
            .expect("lock should be free");

        // Second acquire while held fails.
        assert!(lock
            .try_acquire("board:t:b", Duration::from_secs(5))
            .await
            .unwrap()
            .is_none());

        guard.release().await.unwrap();

        // Released lock can be re-acquired.
        assert!(lock
            .try_acquire("board:t:b", Duration::from_secs(5))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn different_names_are_independent() {
        let lock = MemoryDistributedLock::new();
        let _a = lock
            .try_acquire("board:t:a", Duration::from_secs(5))
            .await
            .unwrap()
            .unwrap();
        let b = lock
            .try_acquire("board:t:b", Duration::from_secs(5))
            .await
            .unwrap();
        assert!(b.is_some());
    }

    #[tokio::test]
    async fn expired_lock_is_reacquirable() {
        tokio::time::pause();
        let lock = MemoryDistributedLock::new();
        let _guard = lock
            .try_acquire("board:t:b", Duration::from_millis(50))
            .await
            .unwrap()
            .unwrap();

        tokio::time::advance(Duration::from_millis(100)).await;

        assert!(lock
            .try_acquire("board:t:b", Duration::from_secs(5))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn acquire_times_out_under_contention() {
        tokio::time::pause();
        let lock = MemoryDistributedLock::new();
        let _guard = lock
            .try_acquire("board:t:b", Duration::from_secs(60))
            .await
            .unwrap()
            .unwrap();

        let result = lock
            .acquire(
                "board:t:b",
                Duration::from_secs(60),
                Duration::from_millis(30),
            )
            .await;
        assert!(matches!(result, Err(StoreError::Timeout(_))));
    }

    #[tokio::test]
    async fn extend_keeps_lock_alive() {
        tokio::time::pause();
        let lock = MemoryDistributedLock::new();
        let guard = lock
            .try_acquire("board:t:b", Duration::from_millis(50))
            .await
            .unwrap()
            .unwrap();

        guard.extend(Duration::from_secs(60)).await.unwrap();
        tokio::time::advance(Duration::from_millis(100)).await;

        assert!(lock
            .try_acquire("board:t:b", Duration::from_secs(5))
            .await
            .unwrap()
            .is_none());
    }
}
