use tokio::time::Instant;

/// A cumulative byte reading taken at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub bytes: u64,
    pub at: Instant,
}

impl Sample {
    pub fn new(bytes: u64, at: Instant) -> Self {
        Self { bytes, at }
    }
}

/// Point-in-time transfer rate and remaining-time estimate.
///
/// An `eta_seconds` of 0 together with a `speed_bytes_per_sec` of 0 means
/// "unknown", not "about to finish".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProgressEstimate {
    pub speed_bytes_per_sec: f64,
    pub eta_seconds: f64,
}

/// Computes the instantaneous speed between two consecutive samples and the
/// time left to transfer the rest of `total_bytes` at that speed.
///
/// A zero or negative interval (duplicate or out-of-order callback) yields
/// speed 0. A byte count lower than the previous one also yields speed 0.
/// Zero speed always yields an ETA of 0.
pub fn estimate(previous: Sample, current: Sample, total_bytes: u64) -> ProgressEstimate {
    let elapsed = current
        .at
        .checked_duration_since(previous.at)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);
    if elapsed <= 0.0 {
        return ProgressEstimate::default();
    }

    let delta = current.bytes.saturating_sub(previous.bytes);
    let speed = delta as f64 / elapsed;
    let eta = if speed > 0.0 {
        total_bytes.saturating_sub(current.bytes) as f64 / speed
    } else {
        0.0
    };

    ProgressEstimate {
        speed_bytes_per_sec: speed,
        eta_seconds: eta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(base: Instant, millis: u64) -> Instant {
        base + Duration::from_millis(millis)
    }

    #[test]
    fn speed_between_consecutive_samples() {
        let t0 = Instant::now();
        let est = estimate(
            Sample::new(500_000, at(t0, 1000)),
            Sample::new(1_000_000, at(t0, 2000)),
            2_000_000,
        );
        assert!((est.speed_bytes_per_sec - 500_000.0).abs() < 1e-6);
        assert!((est.eta_seconds - 2.0).abs() < 1e-6);
    }

    #[test]
    fn finished_transfer_has_zero_eta() {
        let t0 = Instant::now();
        let est = estimate(
            Sample::new(500_000, at(t0, 1000)),
            Sample::new(1_000_000, at(t0, 2000)),
            1_000_000,
        );
        assert!((est.speed_bytes_per_sec - 500_000.0).abs() < 1e-6);
        assert_eq!(est.eta_seconds, 0.0);
    }

    #[test]
    fn zero_elapsed_yields_zero_speed_and_eta() {
        let t0 = Instant::now();
        let est = estimate(Sample::new(0, t0), Sample::new(4096, t0), 10_000);
        assert_eq!(est, ProgressEstimate::default());
    }

    #[test]
    fn out_of_order_sample_yields_zero_speed() {
        let t0 = Instant::now();
        let est = estimate(
            Sample::new(0, at(t0, 1500)),
            Sample::new(4096, at(t0, 500)),
            10_000,
        );
        assert_eq!(est.speed_bytes_per_sec, 0.0);
        assert_eq!(est.eta_seconds, 0.0);
    }

    #[test]
    fn stalled_transfer_has_zero_eta_regardless_of_remaining() {
        let t0 = Instant::now();
        let est = estimate(
            Sample::new(100, t0),
            Sample::new(100, at(t0, 3000)),
            1_000_000_000,
        );
        assert_eq!(est.speed_bytes_per_sec, 0.0);
        assert_eq!(est.eta_seconds, 0.0);
    }

    #[test]
    fn decreasing_reading_never_goes_negative() {
        let t0 = Instant::now();
        let est = estimate(
            Sample::new(2048, t0),
            Sample::new(1024, at(t0, 1000)),
            4096,
        );
        assert_eq!(est.speed_bytes_per_sec, 0.0);
        assert_eq!(est.eta_seconds, 0.0);
    }

    #[test]
    fn tracks_sudden_throughput_change() {
        // Instantaneous, not averaged: a slow first second does not drag
        // down the fast second one.
        let t0 = Instant::now();
        let slow = estimate(Sample::new(0, t0), Sample::new(1_000, at(t0, 1000)), 100_000);
        let fast = estimate(
            Sample::new(1_000, at(t0, 1000)),
            Sample::new(51_000, at(t0, 2000)),
            100_000,
        );
        assert!((slow.speed_bytes_per_sec - 1_000.0).abs() < 1e-6);
        assert!((fast.speed_bytes_per_sec - 50_000.0).abs() < 1e-6);
        assert!((fast.eta_seconds - 0.98).abs() < 1e-6);
    }
}
