//! Reaction-time test.
//!
//! ```text
//! Idle -> Waiting -> Ready -> Result
//!            |
//!            +-> TooEarly
//! ```

use tracing::{debug, info};

use super::{Game, GameKind, Status};
use crate::clock::Millis;
use crate::config::ReactionConfig;
use crate::random::RandomSource;
use crate::timer::{TimerId, TimerQueue};
use crate::util::mean;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionPhase {
    Idle,
    Waiting,
    Ready,
    Result,
    TooEarly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionOutcome {
    TooEarly,
    Measured(Millis),
    Ignored,
}

/// Qualitative band for a reading, display only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionTier {
    Superhuman,
    Lightning,
    VeryFast,
    Great,
    Good,
    KeepTrying,
}

impl ReactionTier {
    pub fn from_ms(ms: Millis) -> Self {
        match ms {
            0..=149 => ReactionTier::Superhuman,
            150..=199 => ReactionTier::Lightning,
            200..=249 => ReactionTier::VeryFast,
            250..=299 => ReactionTier::Great,
            300..=399 => ReactionTier::Good,
            _ => ReactionTier::KeepTrying,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ReactionTier::Superhuman => "INCREDIBLE! Superhuman reflexes!",
            ReactionTier::Lightning => "Lightning Fast! Amazing!",
            ReactionTier::VeryFast => "Very Fast! Excellent!",
            ReactionTier::Great => "Great reaction time!",
            ReactionTier::Good => "Good! Keep practicing!",
            ReactionTier::KeepTrying => "Keep trying, you can do better!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReactionTimer {
    Go,
}

#[derive(Debug)]
pub struct ReactionGame {
    config: ReactionConfig,
    rng: Box<dyn RandomSource>,
    phase: ReactionPhase,
    ready_at: Option<Millis>,
    last: Option<Millis>,
    best: Option<Millis>,
    history: Vec<Millis>,
    timers: TimerQueue<ReactionTimer>,
    go_timer: Option<TimerId>,
}

impl ReactionGame {
    pub fn new(config: ReactionConfig, rng: Box<dyn RandomSource>) -> Self {
        Self {
            config,
            rng,
            phase: ReactionPhase::Idle,
            ready_at: None,
            last: None,
            best: None,
            history: Vec::new(),
            timers: TimerQueue::new(),
            go_timer: None,
        }
    }

    pub fn phase(&self) -> ReactionPhase {
        self.phase
    }

    pub fn ready_at(&self) -> Option<Millis> {
        self.ready_at
    }

    /// The reading from the current round, if it produced one.
    pub fn reaction_ms(&self) -> Option<Millis> {
        self.last
    }

    pub fn best_ms(&self) -> Option<Millis> {
        self.best
    }

    pub fn history(&self) -> &[Millis] {
        &self.history
    }

    pub fn average_ms(&self) -> Option<f64> {
        let readings: Vec<f64> = self.history.iter().map(|&ms| ms as f64).collect();
        mean(&readings)
    }

    pub fn tier(&self) -> Option<ReactionTier> {
        self.last.map(ReactionTier::from_ms)
    }

    pub fn start(&mut self, now: Millis) {
        if matches!(self.phase, ReactionPhase::Waiting | ReactionPhase::Ready) {
            return;
        }
        self.clear_timers();
        self.last = None;
        self.ready_at = None;

        let delay = self.rng.between(
            self.config.min_delay_ms as f64,
            self.config.max_delay_ms as f64,
        ) as Millis;
        self.go_timer = Some(self.timers.schedule(now, delay, ReactionTimer::Go));
        self.phase = ReactionPhase::Waiting;
        debug!(delay, "waiting for stimulus");
    }

    /// The "go" stimulus appears.
    pub fn on_stimulus_ready(&mut self, now: Millis) {
        if self.phase != ReactionPhase::Waiting {
            return;
        }
        if let Some(id) = self.go_timer.take() {
            self.timers.cancel(id);
        }
        self.ready_at = Some(now);
        self.phase = ReactionPhase::Ready;
    }

    pub fn click(&mut self, now: Millis) -> ReactionOutcome {
        match self.phase {
            ReactionPhase::Waiting => {
                self.clear_timers();
                self.phase = ReactionPhase::TooEarly;
                info!("clicked before the stimulus");
                ReactionOutcome::TooEarly
            }
            ReactionPhase::Ready => {
                let ready_at = self.ready_at.unwrap_or(now);
                let ms = now.saturating_sub(ready_at);
                self.last = Some(ms);
                self.best = Some(self.best.map_or(ms, |b| b.min(ms)));
                self.history.push(ms);
                self.phase = ReactionPhase::Result;
                info!(ms, best = ?self.best, "reaction measured");
                ReactionOutcome::Measured(ms)
            }
            _ => ReactionOutcome::Ignored,
        }
    }

    pub fn reset(&mut self) {
        if !matches!(self.phase, ReactionPhase::Result | ReactionPhase::TooEarly) {
            return;
        }
        self.phase = ReactionPhase::Idle;
        self.last = None;
        self.ready_at = None;
    }

    fn clear_timers(&mut self) {
        self.timers.cancel_all();
        self.go_timer = None;
    }
}

impl Game for ReactionGame {
    fn kind(&self) -> GameKind {
        GameKind::Reaction
    }

    fn status(&self) -> Status {
        match self.phase {
            ReactionPhase::Idle => Status::Idle,
            ReactionPhase::Waiting | ReactionPhase::Ready => Status::Active,
            ReactionPhase::Result | ReactionPhase::TooEarly => Status::Finished,
        }
    }

    fn poll(&mut self, now: Millis) {
        while let Some((at, timer)) = self.timers.pop_due(now) {
            match timer {
                ReactionTimer::Go => {
                    self.go_timer = None;
                    self.on_stimulus_ready(at);
                }
            }
        }
    }

    fn teardown(&mut self) {
        self.clear_timers();
        self.ready_at = None;
        if matches!(self.phase, ReactionPhase::Waiting | ReactionPhase::Ready) {
            self.phase = ReactionPhase::Idle;
        }
    }

    fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}
