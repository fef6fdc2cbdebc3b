// src/lock/mod.rs

//! Distributed mutex abstraction.
//!
//! A named, TTL-bounded exclusive lock usable across processes. The fan-out
//! protocol holds it only for the read-check-enqueue critical section, never
//! for job execution, so contention windows stay short. The TTL is the crash
//! backstop: it must exceed the expected critical-section duration with
//! margin, so a holder that dies mid-section cannot wedge the key forever.
//!
//! [`memory::MemoryMutex`] is the in-process reference implementation; real
//! deployments back this trait with an external lock service.

pub mod memory;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LockError {
    #[error("timed out acquiring lock '{key}' after {waited_ms}ms")]
    Timeout { key: String, waited_ms: u64 },

    #[error("lock backend error: {0}")]
    Backend(String),
}

/// Token proving ownership of one held lock.
///
/// Ephemeral, never persisted. Carries a fencing token so a stale handle
/// (expired and re-acquired by someone else) cannot release the new holder's
/// lock.
#[derive(Debug)]
pub struct LockHandle {
    key: String,
    token: u64,
}

impl LockHandle {
    pub fn new(key: impl Into<String>, token: u64) -> Self {
        Self {
            key: key.into(),
            token,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn token(&self) -> u64 {
        self.token
    }
}

#[async_trait]
pub trait DistributedMutex: Send + Sync {
    /// Acquire the named lock, polling until it is free or `wait_budget`
    /// elapses. On success the lock is held for at most `hold_ttl` before
    /// auto-expiring.
    async fn acquire(
        &self,
        key: &str,
        wait_budget: Duration,
        hold_ttl: Duration,
    ) -> Result<LockHandle, LockError>;

    /// Release a held lock. Idempotent: releasing an expired or superseded
    /// handle is a safe no-op.
    async fn release(&self, handle: LockHandle) -> Result<(), LockError>;
}

pub use memory::MemoryMutex;
