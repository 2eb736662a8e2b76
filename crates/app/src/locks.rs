//! Per-home mutual exclusion.
//!
//! Occupancy checks and the writes that depend on them must not interleave
//! for the same home: an "arm" and an "enter zone" request could otherwise
//! both observe a permissive state. Every read-check-write sequence on a
//! home holds that home's lock for its whole duration.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use smarthome_domain::id::HomeId;

type Registry = Arc<Mutex<HashMap<HomeId, Arc<AsyncMutex<()>>>>>;

/// Hands out one async mutex per home id. Cheap to clone.
///
/// An entry lives only while a guard holds it or a task waits for it.
#[derive(Clone, Default)]
pub struct HomeLocks {
    inner: Registry,
}

/// Held for the duration of a serialized section on one home.
pub struct HomeGuard {
    home_id: HomeId,
    registry: Registry,
    guard: OwnedMutexGuard<()>,
}

impl HomeGuard {
    #[must_use]
    pub fn home_id(&self) -> HomeId {
        self.home_id
    }
}

impl Drop for HomeGuard {
    fn drop(&mut self) {
        let mut map = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        // only the registry and this guard still own the mutex
        let idle = map.get(&self.home_id).is_some_and(|mutex| {
            Arc::ptr_eq(mutex, OwnedMutexGuard::mutex(&self.guard))
                && Arc::strong_count(mutex) == 2
        });
        if idle {
            map.remove(&self.home_id);
        }
    }
}

impl HomeLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `home_id`.
    pub async fn lock(&self, home_id: HomeId) -> HomeGuard {
        let mutex = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(map.entry(home_id).or_default())
        };
        HomeGuard {
            home_id,
            registry: Arc::clone(&self.inner),
            guard: mutex.lock_owned().await,
        }
    }

    /// Lock `home_id` when there is one.
    pub async fn lock_optional(&self, home_id: Option<HomeId>) -> Option<HomeGuard> {
        match home_id {
            Some(id) => Some(self.lock(id).await),
            None => None,
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn should_serialize_access_to_the_same_home() {
        let locks = HomeLocks::new();
        let home_id = HomeId::new();

        let guard = locks.lock(home_id).await;
        let contender = locks.clone();
        let waiting = tokio::spawn(async move { contender.lock(home_id).await.home_id() });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        drop(guard);
        assert_eq!(waiting.await.unwrap(), home_id);
    }

    #[tokio::test]
    async fn should_not_block_other_homes() {
        let locks = HomeLocks::new();
        let _first = locks.lock(HomeId::new()).await;
        let second = tokio::time::timeout(Duration::from_millis(50), locks.lock(HomeId::new())).await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn should_skip_locking_without_home() {
        let locks = HomeLocks::new();
        assert!(locks.lock_optional(None).await.is_none());
    }

    #[tokio::test]
    async fn should_forget_homes_once_their_guard_drops() {
        let locks = HomeLocks::new();
        for _ in 0..1000 {
            drop(locks.lock(HomeId::new()).await);
        }
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn should_keep_entry_while_someone_waits() {
        let locks = HomeLocks::new();
        let home_id = HomeId::new();

        let guard = locks.lock(home_id).await;
        let contender = locks.clone();
        let waiting = tokio::spawn(async move {
            let guard = contender.lock(home_id).await;
            tokio::time::sleep(Duration::from_millis(20)).await;
            drop(guard);
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(guard);
        assert_eq!(locks.len(), 1);

        waiting.await.unwrap();
        assert_eq!(locks.len(), 0);
    }
}
