use crate::FINE_TICK;
use crate::TICK;
use std::time::Duration;
use tokio::time::Instant;

/// Round length and the tail of it shown as a warning.
#[derive(Debug, Clone, Copy)]
pub struct TimerConfig {
    pub round: Duration,
    pub warning: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            round: Duration::from_secs(60),
            warning: Duration::from_secs(5),
        }
    }
}

/// Tracks the round deadline and paces the countdown display.
#[derive(Debug)]
pub struct Timer {
    config: TimerConfig,
    deadline: Option<Instant>,
}

impl Timer {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            deadline: None,
        }
    }
    /// Recomputes the deadline as `now + round`.
    pub fn start(&mut self) {
        self.deadline = Some(Instant::now() + self.config.round);
    }
    pub fn clear(&mut self) {
        self.deadline = None;
    }
    pub fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
    /// Time left before the deadline; the full round when not started.
    pub fn remaining(&self) -> Duration {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
            .unwrap_or(self.config.round)
    }
    pub fn warns(&self) -> bool {
        self.deadline.is_some() && self.remaining() < self.config.warning
    }
    /// How long to sleep before the next countdown update.
    /// Lands exactly on the warning boundary, then ticks finely to the end.
    pub fn slice(&self) -> Duration {
        let remaining = self.remaining();
        match remaining.checked_sub(self.config.warning) {
            Some(calm) if !calm.is_zero() => calm.min(TICK),
            _ => remaining.min(FINE_TICK),
        }
    }
    pub fn round(&self) -> Duration {
        self.config.round
    }
}
