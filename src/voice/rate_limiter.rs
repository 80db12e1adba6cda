//! Fixed-window rate limiter for the audio boundary, persisted through the
//! learning store so the window survives process restarts. Storage
//! failures fail open: a farmer is never locked out because a table was
//! unreachable.

use super::AudioKind;
use crate::config::Config;
use crate::error::AdvisoryError;
use crate::store::{rate_limit_partition, LearningStore, RateLimitRecord};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Entries outlive their window by a grace period so a racing reader never
/// sees a vanished window.
const TTL_GRACE_SECONDS: i64 = 300;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub remaining: u32,
    pub reset_in_seconds: i64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_in_seconds: i64,
    pub current_count: u32,
}

#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn LearningStore>,
    max_requests: u32,
    window_seconds: i64,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("max_requests", &self.max_requests)
            .field("window_seconds", &self.window_seconds)
            .finish_non_exhaustive()
    }
}

impl RateLimiter {
    pub fn new(store: Arc<dyn LearningStore>, config: &Config) -> Self {
        Self {
            store,
            max_requests: config.max_requests_per_hour,
            window_seconds: config.rate_limit_window_seconds,
        }
    }

    /// Check the session's window and count this request against it.
    ///
    /// Fails only with `RateLimited`; a broken store allows the request
    /// through with a warning.
    pub async fn check_and_increment(
        &self,
        session_id: &str,
        kind: AudioKind,
    ) -> Result<RateLimitDecision, AdvisoryError> {
        let pk = rate_limit_partition(session_id, kind.as_str());
        let now = Utc::now().timestamp();

        let (new_count, window_start) = match self.store.rate_limit_read(&pk).await {
            Some(record) if now - record.window_start < self.window_seconds => {
                if record.request_count >= self.max_requests {
                    let retry_after_seconds = self.window_seconds - (now - record.window_start);
                    warn!(
                        session = session_id,
                        kind = kind.as_str(),
                        count = record.request_count,
                        reset_in = retry_after_seconds,
                        "Rate limit exceeded"
                    );
                    return Err(AdvisoryError::RateLimited {
                        retry_after_seconds,
                    });
                }
                (record.request_count + 1, record.window_start)
            }
            // Missing record, expired window, or an unreachable store all
            // start a fresh window.
            _ => (1, now),
        };

        let record = RateLimitRecord {
            request_count: new_count,
            window_start,
        };
        let ttl = now + self.window_seconds + TTL_GRACE_SECONDS;
        if !self.store.rate_limit_write(&pk, &record, ttl).await {
            warn!(
                session = session_id,
                kind = kind.as_str(),
                "Rate limit write failed, allowing request"
            );
        }

        let decision = RateLimitDecision {
            remaining: self.max_requests.saturating_sub(new_count),
            reset_in_seconds: self.window_seconds - (now - window_start),
        };

        info!(
            session = session_id,
            kind = kind.as_str(),
            count = new_count,
            max = self.max_requests,
            remaining = decision.remaining,
            "Rate limit check passed"
        );

        Ok(decision)
    }

    /// Current window state without consuming a request.
    pub async fn status(&self, session_id: &str, kind: AudioKind) -> RateLimitStatus {
        let pk = rate_limit_partition(session_id, kind.as_str());
        let now = Utc::now().timestamp();

        match self.store.rate_limit_read(&pk).await {
            Some(record) if now - record.window_start < self.window_seconds => {
                let remaining = self.max_requests.saturating_sub(record.request_count);
                RateLimitStatus {
                    allowed: remaining > 0,
                    remaining,
                    reset_in_seconds: self.window_seconds - (now - record.window_start),
                    current_count: record.request_count,
                }
            }
            _ => RateLimitStatus {
                allowed: true,
                remaining: self.max_requests,
                reset_in_seconds: 0,
                current_count: 0,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn limiter_with(max: u32) -> RateLimiter {
        let config = Config {
            max_requests_per_hour: max,
            ..Config::default()
        };
        RateLimiter::new(Arc::new(MemoryStore::new()), &config)
    }

    #[tokio::test]
    async fn allows_up_to_the_window_maximum() {
        let limiter = limiter_with(3);

        for expected_remaining in [2, 1, 0] {
            let decision = limiter
                .check_and_increment("session-1", AudioKind::Asr)
                .await
                .unwrap();
            assert_eq!(decision.remaining, expected_remaining);
        }

        let denied = limiter.check_and_increment("session-1", AudioKind::Asr).await;
        assert!(matches!(
            denied,
            Err(AdvisoryError::RateLimited { retry_after_seconds }) if retry_after_seconds > 0
        ));
    }

    #[tokio::test]
    async fn asr_and_tts_windows_are_independent() {
        let limiter = limiter_with(1);

        limiter
            .check_and_increment("session-1", AudioKind::Asr)
            .await
            .unwrap();
        // The TTS window is untouched.
        let decision = limiter
            .check_and_increment("session-1", AudioKind::Tts)
            .await
            .unwrap();
        assert_eq!(decision.remaining, 0);
    }

    #[tokio::test]
    async fn sessions_do_not_share_windows() {
        let limiter = limiter_with(1);

        limiter
            .check_and_increment("session-1", AudioKind::Asr)
            .await
            .unwrap();
        assert!(limiter
            .check_and_increment("session-2", AudioKind::Asr)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn status_reads_without_consuming() {
        let limiter = limiter_with(2);

        let before = limiter.status("session-1", AudioKind::Asr).await;
        assert_eq!(before.current_count, 0);
        assert_eq!(before.remaining, 2);
        assert!(before.allowed);

        limiter
            .check_and_increment("session-1", AudioKind::Asr)
            .await
            .unwrap();

        let after = limiter.status("session-1", AudioKind::Asr).await;
        assert_eq!(after.current_count, 1);
        assert_eq!(after.remaining, 1);

        // Status itself consumed nothing.
        let again = limiter.status("session-1", AudioKind::Asr).await;
        assert_eq!(again.current_count, 1);
    }

    #[tokio::test]
    async fn broken_store_fails_open() {
        let config = Config {
            max_requests_per_hour: 1,
            ..Config::default()
        };
        let limiter = RateLimiter::new(Arc::new(MemoryStore::unavailable()), &config);

        // Every request is allowed because nothing persists.
        for _ in 0..5 {
            assert!(limiter
                .check_and_increment("session-1", AudioKind::Asr)
                .await
                .is_ok());
        }
    }

    #[tokio::test]
    async fn stored_count_never_exceeds_maximum() {
        let store = Arc::new(MemoryStore::new());
        let config = Config {
            max_requests_per_hour: 2,
            ..Config::default()
        };
        let limiter = RateLimiter::new(store.clone(), &config);

        for _ in 0..5 {
            let _ = limiter.check_and_increment("session-1", AudioKind::Asr).await;
        }

        let record = store
            .rate_limit_read(&rate_limit_partition("session-1", "asr"))
            .await
            .unwrap();
        assert!(record.request_count <= 2);
    }
}
