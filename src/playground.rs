//! Selection shell: holds at most one mounted game.
//!
//! Switching games, or going back to the menu, tears the outgoing game down
//! before anything else happens, so none of its timers can fire afterwards.

use std::fmt;
use tracing::info;

use crate::clock::{Clock, Millis, MonotonicClock};
use crate::config::Config;
use crate::games::precision::{ClickOutcome, Point};
use crate::games::reaction::ReactionOutcome;
use crate::games::sequence::CellOutcome;
use crate::games::{Game, GameKind, PrecisionGame, ReactionGame, SequenceGame, Status};
use crate::random::{RandomSource, SeededRandom};

#[derive(Debug)]
pub enum ActiveGame {
    Precision(PrecisionGame),
    Reaction(ReactionGame),
    Sequence(SequenceGame),
}

impl ActiveGame {
    fn as_game(&self) -> &dyn Game {
        match self {
            ActiveGame::Precision(g) => g,
            ActiveGame::Reaction(g) => g,
            ActiveGame::Sequence(g) => g,
        }
    }

    fn as_game_mut(&mut self) -> &mut dyn Game {
        match self {
            ActiveGame::Precision(g) => g,
            ActiveGame::Reaction(g) => g,
            ActiveGame::Sequence(g) => g,
        }
    }

    pub fn start(&mut self, now: Millis) {
        match self {
            ActiveGame::Precision(g) => g.start(now),
            ActiveGame::Reaction(g) => g.start(now),
            ActiveGame::Sequence(g) => g.start(now),
        }
    }

    /// Leave a terminal state. The memory game drops back to idle on its own.
    pub fn reset(&mut self) {
        match self {
            ActiveGame::Precision(g) => g.reset(),
            ActiveGame::Reaction(g) => g.reset(),
            ActiveGame::Sequence(_) => {}
        }
    }

    pub fn as_precision(&self) -> Option<&PrecisionGame> {
        match self {
            ActiveGame::Precision(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_reaction(&self) -> Option<&ReactionGame> {
        match self {
            ActiveGame::Reaction(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&SequenceGame> {
        match self {
            ActiveGame::Sequence(g) => Some(g),
            _ => None,
        }
    }
}

impl Game for ActiveGame {
    fn kind(&self) -> GameKind {
        self.as_game().kind()
    }

    fn status(&self) -> Status {
        self.as_game().status()
    }

    fn poll(&mut self, now: Millis) {
        self.as_game_mut().poll(now)
    }

    fn teardown(&mut self) {
        self.as_game_mut().teardown()
    }

    fn pending_timers(&self) -> usize {
        self.as_game().pending_timers()
    }
}

type RandomFactory = Box<dyn FnMut(GameKind) -> Box<dyn RandomSource>>;

pub struct Playground<C: Clock = MonotonicClock> {
    clock: C,
    config: Config,
    randomness: RandomFactory,
    active: Option<ActiveGame>,
}

impl<C: Clock> fmt::Debug for Playground<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Playground")
            .field("config", &self.config)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl<C: Clock> Playground<C> {
    pub fn new(clock: C, config: Config) -> Self {
        Self {
            clock,
            config,
            randomness: Box::new(|_: GameKind| -> Box<dyn RandomSource> {
                Box::new(SeededRandom::from_entropy())
            }),
            active: None,
        }
    }

    /// Seeded randomness. Each mount gets its own generator, seeded from `seed` plus
    /// the number of games mounted so far, so a run replays exactly for a given
    /// sequence of selections.
    pub fn with_seed(self, seed: u64) -> Self {
        let mut mounts = 0u64;
        self.with_randomness(move |_| {
            mounts += 1;
            Box::new(SeededRandom::from_seed(seed.wrapping_add(mounts)))
        })
    }

    pub fn with_randomness(
        mut self,
        factory: impl FnMut(GameKind) -> Box<dyn RandomSource> + 'static,
    ) -> Self {
        self.randomness = Box::new(factory);
        self
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn active(&self) -> Option<&ActiveGame> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveGame> {
        self.active.as_mut()
    }

    pub fn active_kind(&self) -> Option<GameKind> {
        self.active.as_ref().map(|g| g.kind())
    }

    /// Mount a fresh `kind`, returning the game it replaced, already torn down.
    pub fn select(&mut self, kind: GameKind) -> Option<ActiveGame> {
        let retired = self.retire();
        let rng = (self.randomness)(kind);
        let game = match kind {
            GameKind::Precision => {
                ActiveGame::Precision(PrecisionGame::new(self.config.precision.clone(), rng))
            }
            GameKind::Reaction => {
                ActiveGame::Reaction(ReactionGame::new(self.config.reaction.clone(), rng))
            }
            GameKind::Sequence => {
                ActiveGame::Sequence(SequenceGame::new(self.config.sequence.clone(), rng))
            }
        };
        info!(%kind, "game selected");
        self.active = Some(game);
        retired
    }

    pub fn back_to_menu(&mut self) -> Option<ActiveGame> {
        let retired = self.retire();
        if retired.is_some() {
            info!("back to menu");
        }
        retired
    }

    /// Fire whatever the active game has due by now.
    pub fn poll(&mut self) {
        let now = self.clock.now();
        if let Some(game) = self.active.as_mut() {
            game.poll(now);
        }
    }

    pub fn start(&mut self) {
        let now = self.clock.now();
        if let Some(game) = self.active.as_mut() {
            game.start(now);
        }
    }

    pub fn reset(&mut self) {
        if let Some(game) = self.active.as_mut() {
            game.reset();
        }
    }

    pub fn click_precision(&mut self, at: Point) -> ClickOutcome {
        let now = self.clock.now();
        match self.active.as_mut() {
            Some(ActiveGame::Precision(g)) => g.click(now, at),
            _ => ClickOutcome::Ignored,
        }
    }

    pub fn click_reaction(&mut self) -> ReactionOutcome {
        let now = self.clock.now();
        match self.active.as_mut() {
            Some(ActiveGame::Reaction(g)) => g.click(now),
            _ => ReactionOutcome::Ignored,
        }
    }

    pub fn click_cell(&mut self, index: usize) -> CellOutcome {
        let now = self.clock.now();
        match self.active.as_mut() {
            Some(ActiveGame::Sequence(g)) => g.click_cell(now, index),
            _ => CellOutcome::Ignored,
        }
    }

    pub fn set_precision_area(&mut self, area: crate::games::precision::PlayArea) {
        if let Some(ActiveGame::Precision(g)) = self.active.as_mut() {
            g.set_area(area);
        }
    }

    fn retire(&mut self) -> Option<ActiveGame> {
        let mut retired = self.active.take()?;
        retired.teardown();
        Some(retired)
    }
}
