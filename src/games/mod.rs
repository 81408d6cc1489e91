//! The three mini-games.
//!
//! Each game is an independent state machine that owns its own
//! [`TimerQueue`](crate::timer::TimerQueue). Time only moves forward through
//! [`Game::poll`], and every operation takes the current time explicitly, so
//! a game can be driven by the real clock or by a test script alike.

pub mod precision;
pub mod reaction;
pub mod sequence;

use clap::ValueEnum;

use crate::clock::Millis;

pub use precision::PrecisionGame;
pub use reaction::ReactionGame;
pub use sequence::SequenceGame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, strum_macros::Display)]
pub enum GameKind {
    #[strum(to_string = "Click Precision")]
    Precision,
    #[strum(to_string = "Reaction Time")]
    Reaction,
    #[strum(to_string = "Memory Pattern")]
    Sequence,
}

impl GameKind {
    pub const ALL: [GameKind; 3] = [GameKind::Precision, GameKind::Reaction, GameKind::Sequence];

    pub fn blurb(&self) -> &'static str {
        match self {
            GameKind::Precision => "Hit the center of each target before it vanishes",
            GameKind::Reaction => "Wait for green, then react as fast as you can",
            GameKind::Sequence => "Watch the pattern, then repeat it back",
        }
    }
}

/// Outer lifecycle shared by every game session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Active,
    Finished,
}

/// What the selection shell needs from a mounted game
pub trait Game {
    fn kind(&self) -> GameKind;

    fn status(&self) -> Status;

    /// Fire every timer due at or before `now`, in deadline order.
    fn poll(&mut self, now: Millis);

    /// Cancel every pending timer and drop back to idle. After this neither `poll` nor
    /// input may change state until the game is started again.
    fn teardown(&mut self);

    fn pending_timers(&self) -> usize;
}
