use std::time::Duration;

/// Throughput summary for one reporting window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameReport {
    pub frames: u64,
    pub mean_frame_time: Duration,
    pub frames_per_second: f64,
    pub instances_per_second: f64,
}

/// Accumulates frame times and instance counts; yields a [`FrameReport`] each
/// time `window` worth of frame time has been recorded.
#[derive(Debug, Clone)]
pub struct FrameStats {
    window: Duration,
    frames: u64,
    instances: u64,
    busy: Duration,
}

impl FrameStats {
    pub fn new(window: Duration) -> Self {
        Self {
            window: window.max(Duration::from_millis(1)),
            frames: 0,
            instances: 0,
            busy: Duration::ZERO,
        }
    }

    /// Records one frame. Returns a report and starts a new window when the
    /// current one is full.
    pub fn record(&mut self, frame_time: Duration, instances: usize) -> Option<FrameReport> {
        self.frames += 1;
        self.instances += instances as u64;
        self.busy += frame_time;

        if self.busy < self.window {
            return None;
        }

        let secs = self.busy.as_secs_f64();
        let report = FrameReport {
            frames: self.frames,
            mean_frame_time: self.busy / self.frames as u32,
            frames_per_second: self.frames as f64 / secs,
            instances_per_second: self.instances as f64 / secs,
        };

        self.frames = 0;
        self.instances = 0;
        self.busy = Duration::ZERO;
        Some(report)
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn reports_once_per_window() {
        let mut stats = FrameStats::new(Duration::from_millis(100));
        let frame = Duration::from_millis(25);

        for _ in 0..3 {
            assert!(stats.record(frame, 1000).is_none());
        }
        let report = stats.record(frame, 1000).unwrap();

        assert_eq!(report.frames, 4);
        assert_eq!(report.mean_frame_time, frame);
        assert_relative_eq!(report.frames_per_second, 40.0, epsilon = 1e-9);
        assert_relative_eq!(report.instances_per_second, 40_000.0, epsilon = 1e-6);

        // Window restarts.
        assert!(stats.record(frame, 1000).is_none());
    }
}
