// src/config/validate.rs

use std::time::Duration;

use crate::config::{CoordinatorConfig, FanOutPolicy, RawCoordinatorConfig};
use crate::errors::{FandagError, Result};

impl TryFrom<RawCoordinatorConfig> for CoordinatorConfig {
    type Error = crate::errors::FandagError;

    fn try_from(raw: RawCoordinatorConfig) -> std::result::Result<Self, Self::Error> {
        validate_fanout(&raw)?;
        Ok(CoordinatorConfig {
            fanout: FanOutPolicy {
                lock_wait: Duration::from_millis(raw.fanout.lock_wait_ms),
                lock_ttl: Duration::from_millis(raw.fanout.lock_ttl_ms),
                retry_attempts: raw.fanout.retry_attempts,
                retry_backoff: Duration::from_millis(raw.fanout.retry_backoff_ms),
            },
        })
    }
}

fn validate_fanout(raw: &RawCoordinatorConfig) -> Result<()> {
    if raw.fanout.retry_attempts == 0 {
        return Err(FandagError::ConfigError(
            "[fanout].retry_attempts must be >= 1 (got 0)".to_string(),
        ));
    }

    if raw.fanout.lock_ttl_ms == 0 {
        return Err(FandagError::ConfigError(
            "[fanout].lock_ttl_ms must be > 0; the TTL is the crash backstop for held locks"
                .to_string(),
        ));
    }

    Ok(())
}
