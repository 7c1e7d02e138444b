//! Process-global observability runtime settings.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::ServerConfig;

static SLOW_REQUEST_THRESHOLD_MS: AtomicU64 = AtomicU64::new(1_000);

pub(super) fn apply_runtime_config(config: &ServerConfig) {
    SLOW_REQUEST_THRESHOLD_MS.store(
        config.observability.slow_request_threshold_ms,
        Ordering::Relaxed,
    );
}

/// Requests slower than this are logged at `warn`. Zero turns the check off.
pub(super) fn slow_request_threshold_ms() -> Option<u64> {
    match SLOW_REQUEST_THRESHOLD_MS.load(Ordering::Relaxed) {
        0 => None,
        threshold => Some(threshold),
    }
}
