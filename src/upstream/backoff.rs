//! Retry delay calculation for rate-limited responses.

use std::time::Duration;

use rand::Rng;

/// Calculate the delay before retry number `attempt` (1-based).
///
/// An upstream-provided Retry-After wins when positive. Otherwise the delay
/// grows linearly with the attempt index plus a small random jitter.
pub fn retry_delay(
    attempt: u32,
    retry_after: Option<Duration>,
    base_ms: u64,
    jitter_ms: u64,
) -> Duration {
    if let Some(after) = retry_after {
        if !after.is_zero() {
            return after;
        }
    }

    let delay_ms = base_ms.saturating_mul(attempt as u64);
    let jitter = if jitter_ms > 0 {
        rand::thread_rng().gen_range(0..jitter_ms)
    } else {
        0
    };

    Duration::from_millis(delay_ms.saturating_add(jitter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_delay_grows_with_attempt() {
        for attempt in 1..=3 {
            let delay = retry_delay(attempt, None, 500, 100);
            let floor = 500 * attempt as u64;
            assert!(delay.as_millis() as u64 >= floor);
            assert!((delay.as_millis() as u64) < floor + 100);
        }
    }

    #[test]
    fn test_retry_after_wins() {
        let delay = retry_delay(1, Some(Duration::from_secs(7)), 500, 100);
        assert_eq!(delay, Duration::from_secs(7));

        // Regardless of attempt index.
        let delay = retry_delay(3, Some(Duration::from_secs(2)), 500, 100);
        assert_eq!(delay, Duration::from_secs(2));
    }

    #[test]
    fn test_zero_retry_after_falls_back() {
        let delay = retry_delay(2, Some(Duration::ZERO), 500, 0);
        assert_eq!(delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_no_jitter() {
        let delay = retry_delay(1, None, 500, 0);
        assert_eq!(delay, Duration::from_millis(500));
    }
}
