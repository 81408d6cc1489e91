//! Memory-pattern game on a small grid of cells.
//!
//! ```text
//! Idle -> Playback -> AwaitingInput -> RoundComplete -> Playback ...
//!                          |
//!                          +-> Mismatch -> Idle (final score kept)
//! ```
//!
//! Playback is a chain of timers (lead-in, then highlight on / off per step).
//! Input is only accepted in `AwaitingInput`, so nothing typed while the
//! pattern is still showing can race with it.

use tracing::{debug, info};

use super::{Game, GameKind, Status};
use crate::clock::Millis;
use crate::config::SequenceConfig;
use crate::random::RandomSource;
use crate::timer::TimerQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencePhase {
    Idle,
    Playback,
    AwaitingInput,
    RoundComplete,
    Mismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellOutcome {
    Progress { matched: usize },
    RoundComplete { score: u32 },
    Mismatch { expected: usize, got: usize },
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SequenceTimer {
    HighlightOn(usize),
    HighlightOff(usize),
    PlaybackDone,
    Extend,
    MismatchOver,
}

#[derive(Debug)]
pub struct SequenceGame {
    config: SequenceConfig,
    rng: Box<dyn RandomSource>,
    phase: SequencePhase,
    steps: Vec<usize>,
    cursor: usize,
    score: u32,
    highlighted: Option<usize>,
    wrong_cell: Option<usize>,
    timers: TimerQueue<SequenceTimer>,
}

impl SequenceGame {
    pub fn new(config: SequenceConfig, rng: Box<dyn RandomSource>) -> Self {
        Self {
            config,
            rng,
            phase: SequencePhase::Idle,
            steps: Vec::new(),
            cursor: 0,
            score: 0,
            highlighted: None,
            wrong_cell: None,
            timers: TimerQueue::new(),
        }
    }

    pub fn phase(&self) -> SequencePhase {
        self.phase
    }

    pub fn steps(&self) -> &[usize] {
        &self.steps
    }

    /// Number of steps matched so far this round.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Completed rounds.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Cell lit by playback right now, if any.
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn wrong_cell(&self) -> Option<usize> {
        self.wrong_cell
    }

    pub fn grid_cells(&self) -> usize {
        self.config.grid_cells
    }

    pub fn accepts_input(&self) -> bool {
        self.phase == SequencePhase::AwaitingInput
    }

    pub fn score_tier(&self) -> Option<&'static str> {
        match self.score {
            s if s >= 10 => Some("Memory Master!"),
            s if s >= 5 => Some("Impressive!"),
            _ => None,
        }
    }

    pub fn start(&mut self, now: Millis) {
        if !matches!(self.phase, SequencePhase::Idle | SequencePhase::Mismatch) {
            return;
        }
        self.timers.cancel_all();
        self.score = 0;
        self.steps.clear();
        self.wrong_cell = None;
        info!("memory game started");
        self.extend_sequence(now);
    }

    /// Grow the pattern by one random cell and play it back from the top.
    /// Only a fresh pattern or a just-completed round can grow.
    pub fn extend_sequence(&mut self, now: Millis) {
        if !self.steps.is_empty() && self.phase != SequencePhase::RoundComplete {
            return;
        }
        self.timers.cancel_all();
        let cell = self.rng.index(self.config.grid_cells);
        self.steps.push(cell);
        self.cursor = 0;
        self.highlighted = None;
        self.phase = SequencePhase::Playback;
        self.timers
            .schedule(now, self.config.lead_in_ms, SequenceTimer::HighlightOn(0));
        debug!(len = self.steps.len(), cell, "sequence extended");
    }

    pub fn click_cell(&mut self, now: Millis, index: usize) -> CellOutcome {
        if self.phase != SequencePhase::AwaitingInput || index >= self.config.grid_cells {
            return CellOutcome::Ignored;
        }
        let expected = self.steps[self.cursor];
        if index != expected {
            self.phase = SequencePhase::Mismatch;
            self.wrong_cell = Some(index);
            self.timers.schedule(
                now,
                self.config.mismatch_linger_ms,
                SequenceTimer::MismatchOver,
            );
            info!(score = self.score, expected, got = index, "pattern mismatch");
            return CellOutcome::Mismatch {
                expected,
                got: index,
            };
        }

        self.cursor += 1;
        if self.cursor < self.steps.len() {
            return CellOutcome::Progress {
                matched: self.cursor,
            };
        }

        self.score += 1;
        self.phase = SequencePhase::RoundComplete;
        self.timers
            .schedule(now, self.config.advance_delay_ms, SequenceTimer::Extend);
        debug!(score = self.score, "round complete");
        CellOutcome::RoundComplete { score: self.score }
    }

    fn fire(&mut self, at: Millis, timer: SequenceTimer) {
        match timer {
            SequenceTimer::HighlightOn(i) => {
                self.highlighted = self.steps.get(i).copied();
                self.timers
                    .schedule(at, self.config.highlight_ms, SequenceTimer::HighlightOff(i));
            }
            SequenceTimer::HighlightOff(i) => {
                self.highlighted = None;
                let next = if i + 1 < self.steps.len() {
                    SequenceTimer::HighlightOn(i + 1)
                } else {
                    SequenceTimer::PlaybackDone
                };
                self.timers.schedule(at, self.config.gap_ms, next);
            }
            SequenceTimer::PlaybackDone => {
                self.phase = SequencePhase::AwaitingInput;
            }
            SequenceTimer::Extend => self.extend_sequence(at),
            SequenceTimer::MismatchOver => {
                self.phase = SequencePhase::Idle;
            }
        }
    }
}

impl Game for SequenceGame {
    fn kind(&self) -> GameKind {
        GameKind::Sequence
    }

    fn status(&self) -> Status {
        match self.phase {
            SequencePhase::Idle => Status::Idle,
            SequencePhase::Playback
            | SequencePhase::AwaitingInput
            | SequencePhase::RoundComplete => Status::Active,
            SequencePhase::Mismatch => Status::Finished,
        }
    }

    fn poll(&mut self, now: Millis) {
        while let Some((at, timer)) = self.timers.pop_due(now) {
            self.fire(at, timer);
        }
    }

    fn teardown(&mut self) {
        self.timers.cancel_all();
        self.highlighted = None;
        self.cursor = 0;
        self.phase = SequencePhase::Idle;
    }

    fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}
