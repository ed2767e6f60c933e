//! Per-farm serialization of capacity-changing operations
//!
//! Admission reads the farm's used area and then inserts a zone. Two
//! requests interleaving those steps could both pass the check and
//! overrun the farm together, so zone creation and farm resizing hold the
//! farm's lock for the whole read-check-write sequence.
//!
//! The locks live in this process only. Several server processes sharing
//! one database are not coordinated.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

type FarmMutex = Arc<tokio::sync::Mutex<()>>;

#[derive(Default)]
pub struct FarmLocks {
    locks: Mutex<HashMap<Uuid, FarmMutex>>,
}

/// Exclusive hold on one farm; the map entry goes away with the last holder
pub struct FarmGuard<'a> {
    owner: &'a FarmLocks,
    farm_id: Uuid,
    lock: FarmMutex,
    guard: Option<OwnedMutexGuard<()>>,
}

impl FarmLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `farm_id`'s capacity
    pub async fn acquire(&self, farm_id: Uuid) -> FarmGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(farm_id).or_default().clone()
        };
        let guard = lock.clone().lock_owned().await;
        FarmGuard {
            owner: self,
            farm_id,
            lock,
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    pub fn tracked(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Drop for FarmGuard<'_> {
    fn drop(&mut self) {
        let mut locks = self.owner.locks.lock().unwrap_or_else(PoisonError::into_inner);
        self.guard.take();

        // only the map and this guard still reference the mutex: no waiters
        let ours = locks
            .get(&self.farm_id)
            .map_or(false, |entry| Arc::ptr_eq(entry, &self.lock));
        if ours && Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.farm_id);
            tracing::trace!(farm_id = %self.farm_id, "Farm lock released and pruned");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_farm_is_exclusive() {
        let locks = Arc::new(FarmLocks::new());
        let farm_id = Uuid::new_v4();

        let guard = locks.acquire(farm_id).await;
        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(farm_id).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
        assert_eq!(locks.tracked(), 0);
    }

    #[tokio::test]
    async fn test_other_farms_are_independent() {
        let locks = FarmLocks::new();
        let a = locks.acquire(Uuid::new_v4()).await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.acquire(Uuid::new_v4()))
            .await
            .expect("unrelated farm must not block");
        assert_eq!(locks.tracked(), 2);

        drop(a);
        assert_eq!(locks.tracked(), 1);
        drop(b);
        assert_eq!(locks.tracked(), 0);
    }

    #[tokio::test]
    async fn test_entry_survives_while_a_waiter_queues() {
        let locks = Arc::new(FarmLocks::new());
        let farm_id = Uuid::new_v4();

        let first = locks.acquire(farm_id).await;
        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(farm_id).await;
                tokio::time::sleep(Duration::from_millis(20)).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(first);
        assert_eq!(locks.tracked(), 1);

        waiter.await.unwrap();
        assert_eq!(locks.tracked(), 0);
    }

    #[tokio::test]
    async fn test_released_farms_leave_no_entries() {
        let locks = FarmLocks::new();
        for _ in 0..100 {
            drop(locks.acquire(Uuid::new_v4()).await);
        }
        assert_eq!(locks.tracked(), 0);
    }
}
