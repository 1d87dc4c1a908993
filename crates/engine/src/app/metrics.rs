use std::time::{Duration, Instant};

/// Loop rates over one logging interval.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct LoopMetricsSnapshot {
    pub(crate) fps: f32,
    pub(crate) tps: f32,
    pub(crate) frame_time_ms: f32,
    pub(crate) sim_clamps: u32,
}

#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval_start: Instant,
    interval: Duration,
    frames: u32,
    ticks: u32,
    frame_time_sum: Duration,
    sim_clamps: u32,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration) -> Self {
        Self::starting_at(Instant::now(), interval)
    }

    fn starting_at(interval_start: Instant, interval: Duration) -> Self {
        Self {
            interval_start,
            interval,
            frames: 0,
            ticks: 0,
            frame_time_sum: Duration::ZERO,
            sim_clamps: 0,
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration) {
        self.frames = self.frames.saturating_add(1);
        self.frame_time_sum = self.frame_time_sum.saturating_add(frame_dt);
    }

    pub(crate) fn record_tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
    }

    /// Counts frames whose tick backlog was dropped by the per-frame tick cap.
    pub(crate) fn record_sim_clamp(&mut self) {
        self.sim_clamps = self.sim_clamps.saturating_add(1);
    }

    /// Closes the interval once it has elapsed and starts the next one at `now`.
    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.interval_start);
        if elapsed < self.interval {
            return None;
        }

        let elapsed_seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let frame_time_ms = match self.frames {
            0 => 0.0,
            frames => self.frame_time_sum.as_secs_f32() * 1000.0 / frames as f32,
        };
        let snapshot = LoopMetricsSnapshot {
            fps: self.frames as f32 / elapsed_seconds,
            tps: self.ticks as f32 / elapsed_seconds,
            frame_time_ms,
            sim_clamps: self.sim_clamps,
        };

        *self = Self::starting_at(now, self.interval);
        Some(snapshot)
    }
}
