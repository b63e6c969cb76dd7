//! Statistics tracking for simulator RPC calls.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

/// Snapshot of call metrics for an [AirSimClient](crate::AirSimClient).
///
/// - `runtime`: elapsed time since the client was created.
/// - `error_count`: calls that failed (I/O, protocol or simulator-reported errors).
/// - `frequency`: approximate call rate, `request_count / runtime`.
/// - `request_count`: calls sent to the simulator. Wraps after `u32::MAX`.
///
/// ```no_run
/// use airsim_boundary::{AirSimClient, AirSimError, MultirotorClient};
///
/// fn main() -> Result<(), AirSimError> {
///     let client = AirSimClient::new()?;
///     client.confirm_connection()?;
///
///     let stats = client.statistics();
///     println!("Requests: {}", stats.request_count);
///     println!("Errors so far: {}", stats.error_count);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Statistics {
    pub runtime: Duration,
    pub error_count: u32,
    pub frequency: f32,
    pub request_count: u32,
}

pub(crate) struct StatisticsEngine {
    start_time: Instant,
    error_count: AtomicU32,
    request_count: AtomicU32,
}

impl StatisticsEngine {
    pub fn new() -> Self {
        StatisticsEngine {
            start_time: Instant::now(),
            error_count: AtomicU32::new(0),
            request_count: AtomicU32::new(0),
        }
    }

    pub fn snapshot(&self) -> Statistics {
        Statistics {
            runtime: self.start_time.elapsed(),
            error_count: self.error_count(),
            frequency: self.frequency(),
            request_count: self.request_count(),
        }
    }

    fn error_count(&self) -> u32 {
        self.error_count.load(Ordering::Relaxed)
    }

    fn request_count(&self) -> u32 {
        self.request_count.load(Ordering::Relaxed)
    }

    pub(crate) fn increment_request_count(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn increment_error_count(&self) {
        self.error_count.fetch_add(1, Ordering::Relaxed);
    }

    fn frequency(&self) -> f32 {
        let elapsed = self.start_time.elapsed().as_secs_f32();
        if elapsed == 0.0 {
            return 0.0;
        }
        self.request_count() as f32 / elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_engine_starts_at_zero() {
        let engine = StatisticsEngine::new();
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.request_count, 0);
        assert_eq!(snapshot.error_count, 0);
    }

    #[test]
    fn counters_increment_independently() {
        let engine = StatisticsEngine::new();
        engine.increment_request_count();
        engine.increment_request_count();
        engine.increment_error_count();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.request_count, 2);
        assert_eq!(snapshot.error_count, 1);
    }

    #[test]
    fn request_count_wraps_on_overflow() {
        let engine = StatisticsEngine::new();
        engine.request_count.store(u32::MAX, Ordering::Relaxed);
        engine.increment_request_count();
        assert_eq!(engine.snapshot().request_count, 0);
    }
}
