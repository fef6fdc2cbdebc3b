// src/config/mod.rs

//! Coordinator configuration.
//!
//! - [`loader`] reads the TOML file and applies serde defaults.
//! - [`validate`] turns the raw model into a checked [`CoordinatorConfig`]
//!   via `TryFrom`.

pub mod loader;
pub mod validate;

use std::time::Duration;

use serde::Deserialize;

/// Raw configuration exactly as deserialized from TOML, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCoordinatorConfig {
    #[serde(default)]
    pub fanout: RawFanOutSection,
}

/// `[fanout]` section: lock budgets and the bounded-retry schedule used by
/// the successor-enqueue protocol.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFanOutSection {
    /// How long one `acquire` call may poll for the lock, in milliseconds.
    #[serde(default = "default_lock_wait_ms")]
    pub lock_wait_ms: u64,

    /// Lock auto-expiry, in milliseconds. Must comfortably exceed the
    /// read-check-enqueue critical section.
    #[serde(default = "default_lock_ttl_ms")]
    pub lock_ttl_ms: u64,

    /// How many `acquire` attempts before a successor is skipped this pass.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Fixed delay between acquire attempts, in milliseconds.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_lock_wait_ms() -> u64 {
    2_000
}

fn default_lock_ttl_ms() -> u64 {
    10_000
}

fn default_retry_attempts() -> u32 {
    5
}

fn default_retry_backoff_ms() -> u64 {
    5_000
}

impl Default for RawFanOutSection {
    fn default() -> Self {
        Self {
            lock_wait_ms: default_lock_wait_ms(),
            lock_ttl_ms: default_lock_ttl_ms(),
            retry_attempts: default_retry_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Validated configuration consumed by the coordinator.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub fanout: FanOutPolicy,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            fanout: FanOutPolicy {
                lock_wait: Duration::from_millis(default_lock_wait_ms()),
                lock_ttl: Duration::from_millis(default_lock_ttl_ms()),
                retry_attempts: default_retry_attempts(),
                retry_backoff: Duration::from_millis(default_retry_backoff_ms()),
            },
        }
    }
}

/// Explicit bounded-retry policy for the fan-out critical section.
///
/// Parameterized at the coordinator boundary so lock-timeout handling is
/// testable with injected always-timeout mutexes and zero backoff, without
/// real delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanOutPolicy {
    pub lock_wait: Duration,
    pub lock_ttl: Duration,
    pub retry_attempts: u32,
    pub retry_backoff: Duration,
}
