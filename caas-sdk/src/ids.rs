//! Sources for time-based request identifiers.
//!
//! Correlation ids, idempotency keys and nonces are derived from the current
//! time plus a short random suffix. Both inputs are injectable so tests can
//! assert exact header values.

use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const NONCE_SUFFIX_LEN: usize = 8;

/// Wall clock in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Random suffix appended to request nonces.
pub trait NonceSource: Send + Sync {
    fn suffix(&self) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Eight lowercase base36 characters from the thread RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomNonce;

impl NonceSource for RandomNonce {
    fn suffix(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..NONCE_SUFFIX_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

/// Nonce source that always returns the same suffix.
#[derive(Debug, Clone)]
pub struct FixedNonce(pub String);

impl NonceSource for FixedNonce {
    fn suffix(&self) -> String {
        self.0.clone()
    }
}
