use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Per-domain mutual exclusion.
///
/// Mutations of the same zone are serialized; different zones never contend. Idle entries
/// are dropped on the next acquisition so the map only holds domains currently in use.
#[derive(Default)]
pub struct DomainLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl DomainLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `domain`. Access ends when the guard is dropped.
    pub async fn acquire(&self, domain: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.retain(|name, lock| name == domain || Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(domain.to_string()).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of domains currently tracked.
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_domain_is_serialized() {
        let locks = Arc::new(DomainLocks::new());
        let guard = locks.acquire("example.com").await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _g = locks.acquire("example.com").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn different_domains_do_not_contend() {
        let locks = DomainLocks::new();
        let _a = locks.acquire("a.com").await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.acquire("b.com")).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn idle_entries_are_pruned() {
        let locks = DomainLocks::new();
        drop(locks.acquire("a.com").await);
        drop(locks.acquire("b.com").await);
        let _c = locks.acquire("c.com").await;
        assert_eq!(locks.len(), 1);
    }
}
