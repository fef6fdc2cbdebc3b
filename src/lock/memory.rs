// src/lock/memory.rs

//! In-process TTL lock.
//!
//! Reference implementation of [`DistributedMutex`]. Acquisition is a
//! bounded poll loop: try to claim the key, sleep for the poll interval,
//! retry until the wait budget is spent. Expiry is checked lazily at claim
//! time, so a crashed holder's entry is simply overwritten once its TTL has
//! passed.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::lock::{DistributedMutex, LockError, LockHandle};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy)]
struct HeldEntry {
    token: u64,
    expires_at: Instant,
}

#[derive(Debug)]
pub struct MemoryMutex {
    held: Mutex<HashMap<String, HeldEntry>>,
    next_token: AtomicU64,
    poll_interval: Duration,
}

impl Default for MemoryMutex {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryMutex {
    pub fn new() -> Self {
        Self::with_poll_interval(DEFAULT_POLL_INTERVAL)
    }

    /// Override how often a blocked `acquire` re-checks the key.
    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self {
            held: Mutex::new(HashMap::new()),
            next_token: AtomicU64::new(1),
            poll_interval,
        }
    }

    /// Claim the key now if it is free or expired. Returns the fencing token
    /// on success.
    fn try_claim(&self, key: &str, hold_ttl: Duration) -> Option<u64> {
        let now = Instant::now();
        let mut held = self.held.lock().expect("lock table poisoned");

        if let Some(entry) = held.get(key) {
            if entry.expires_at > now {
                return None;
            }
        }

        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        held.insert(
            key.to_string(),
            HeldEntry {
                token,
                expires_at: now + hold_ttl,
            },
        );
        Some(token)
    }
}

#[async_trait]
impl DistributedMutex for MemoryMutex {
    async fn acquire(
        &self,
        key: &str,
        wait_budget: Duration,
        hold_ttl: Duration,
    ) -> Result<LockHandle, LockError> {
        let started = Instant::now();
        let deadline = started + wait_budget;

        loop {
            if let Some(token) = self.try_claim(key, hold_ttl) {
                return Ok(LockHandle::new(key, token));
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(LockError::Timeout {
                    key: key.to_string(),
                    waited_ms: started.elapsed().as_millis() as u64,
                });
            }

            let sleep_for = self.poll_interval.min(deadline - now);
            tokio::time::sleep(sleep_for).await;
        }
    }

    async fn release(&self, handle: LockHandle) -> Result<(), LockError> {
        let mut held = self.held.lock().expect("lock table poisoned");
        // Only the current holder may remove the entry; a stale token means
        // the lock expired and was re-acquired, so leave it alone.
        if let Some(entry) = held.get(handle.key()) {
            if entry.token == handle.token() {
                held.remove(handle.key());
            }
        }
        Ok(())
    }
}
