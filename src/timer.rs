use log::debug;
use std::time::{Duration, SystemTime};

/// Seconds granted per attempt.
pub const ROUND_SECONDS: u64 = 30;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Expired,
    Stopped,
}

/// Countdown for the active round.
///
/// Remaining time is always recomputed from wall-clock deltas against the
/// caller-supplied `now`, never from tick counting, so a suspended host
/// process resumes with the correct remaining time and a long suspension
/// produces a single expiry rather than several.
#[derive(Debug)]
pub struct RoundTimer {
    budget: Duration,
    state: TimerState,
    started_at: Option<SystemTime>,
    frozen_elapsed: Duration,
}

impl RoundTimer {
    pub fn new() -> Self {
        Self::with_budget(Duration::from_secs(ROUND_SECONDS))
    }

    pub fn with_budget(budget: Duration) -> Self {
        Self {
            budget,
            state: TimerState::Idle,
            started_at: None,
            frozen_elapsed: Duration::ZERO,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Begin counting down from the full budget. Valid from Idle or Stopped.
    pub fn start(&mut self, now: SystemTime) {
        if matches!(self.state, TimerState::Idle | TimerState::Stopped) {
            self.started_at = Some(now);
            self.frozen_elapsed = Duration::ZERO;
            self.state = TimerState::Running;
        }
    }

    /// Freeze the countdown, keeping the elapsed time so `resume` continues
    /// from the same point. Valid only from Running.
    pub fn pause(&mut self, now: SystemTime) {
        if self.state == TimerState::Running {
            self.frozen_elapsed = self.elapsed(now);
            self.started_at = None;
            self.state = TimerState::Paused;
            debug!("timer paused with {:?} elapsed", self.frozen_elapsed);
        }
    }

    /// Continue from the frozen remaining time. Valid only from Paused.
    pub fn resume(&mut self, now: SystemTime) {
        if self.state == TimerState::Paused {
            self.started_at = Some(now);
            self.state = TimerState::Running;
        }
    }

    pub fn stop(&mut self) {
        self.state = TimerState::Stopped;
        self.started_at = None;
        self.frozen_elapsed = Duration::ZERO;
    }

    /// Back to Idle with the full budget available.
    pub fn reset(&mut self) {
        self.state = TimerState::Idle;
        self.started_at = None;
        self.frozen_elapsed = Duration::ZERO;
    }

    /// Stop and immediately start a fresh countdown.
    pub fn restart(&mut self, now: SystemTime) {
        self.stop();
        self.start(now);
    }

    fn elapsed(&self, now: SystemTime) -> Duration {
        let running = self
            .started_at
            .map(|started| now.duration_since(started).unwrap_or_default())
            .unwrap_or_default();
        (self.frozen_elapsed + running).min(self.budget)
    }

    pub fn remaining(&self, now: SystemTime) -> Duration {
        self.budget.saturating_sub(self.elapsed(now))
    }

    /// Whole seconds left, matching what the countdown display shows.
    pub fn remaining_secs(&self, now: SystemTime) -> u64 {
        self.budget
            .as_secs()
            .saturating_sub(self.elapsed(now).as_secs())
    }

    /// Elapsed fraction in [0, 1]. Cosmetic companion to `remaining`,
    /// derived from the same wall-clock basis.
    pub fn progress(&self, now: SystemTime) -> f64 {
        if self.budget.is_zero() {
            return 1.0;
        }
        (self.elapsed(now).as_secs_f64() / self.budget.as_secs_f64()).min(1.0)
    }

    /// Check for expiry. Reports `true` exactly once: the transition to
    /// Expired consumes the edge.
    pub fn poll(&mut self, now: SystemTime) -> bool {
        if self.state == TimerState::Running && self.elapsed(now) >= self.budget {
            self.state = TimerState::Expired;
            debug!("timer expired");
            return true;
        }
        false
    }
}

impl Default for RoundTimer {
    fn default() -> Self {
        Self::new()
    }
}
