/*!
 * Run Delay
 * How a workload's nominal duration is consumed during a step
 */

use std::time::Duration;

/// Consumes a workload's nominal duration
///
/// The simulated run is a pure time cost with no data side effects, so the
/// timer is a seam: real sleeps for interactive drivers, nothing for tests.
pub trait Delay: Send + Sync {
    fn run(&self, duration: Duration);
}

/// Blocks the stepping thread for the nominal duration
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockingDelay;

impl Delay for BlockingDelay {
    fn run(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Consumes the duration instantly; for tests and benchmarks
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

impl Delay for NoDelay {
    fn run(&self, _duration: Duration) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_no_delay_returns_immediately() {
        let start = Instant::now();
        NoDelay.run(Duration::from_secs(60));
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn test_blocking_delay_consumes_duration() {
        let start = Instant::now();
        BlockingDelay.run(Duration::from_millis(20));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
