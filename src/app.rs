use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::debug;

use crate::clock::{Clock, MonotonicClock};
use crate::games::reaction::ReactionPhase;
use crate::games::sequence::SequencePhase;
use crate::games::{Game, GameKind, Status};
use crate::playground::{ActiveGame, Playground};
use crate::ui::geometry;

/// Terminal application state wrapped around the selection shell
#[derive(Debug)]
pub struct App<C: Clock = MonotonicClock> {
    pub playground: Playground<C>,
    pub menu_cursor: usize,
    pub viewport: Rect,
    pub should_quit: bool,
}

impl<C: Clock> App<C> {
    pub fn new(playground: Playground<C>) -> Self {
        Self {
            playground,
            menu_cursor: 0,
            viewport: Rect::new(0, 0, 80, 24),
            should_quit: false,
        }
    }

    pub fn set_viewport(&mut self, area: Rect) {
        self.viewport = area;
        self.sync_play_area();
    }

    pub fn select(&mut self, kind: GameKind) {
        self.playground.select(kind);
        if let Some(i) = GameKind::ALL.iter().position(|k| *k == kind) {
            self.menu_cursor = i;
        }
        self.sync_play_area();
    }

    pub fn on_tick(&mut self) {
        self.playground.poll();
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        // timers due before the keypress fire first
        self.playground.poll();

        match self.playground.active_kind() {
            None => self.on_menu_key(key.code),
            Some(kind) => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('b')) {
                    self.playground.back_to_menu();
                    return;
                }
                match kind {
                    GameKind::Precision => self.on_precision_key(key.code),
                    GameKind::Reaction => self.on_reaction_key(key.code),
                    GameKind::Sequence => self.on_sequence_key(key.code),
                }
            }
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        self.playground.poll();
        let (col, row) = (mouse.column, mouse.row);

        match self.playground.active_kind() {
            None => {}
            Some(GameKind::Precision) => {
                let field = geometry::precision_field(self.viewport);
                if let Some(point) = geometry::cell_center_px(field, col, row) {
                    let outcome = self.playground.click_precision(point);
                    debug!(?outcome, col, row, "precision click");
                }
            }
            Some(GameKind::Reaction) => {
                if geometry::contains(geometry::chunks(self.viewport).body, col, row) {
                    self.press_reaction();
                }
            }
            Some(GameKind::Sequence) => {
                let cells = self.playground.config().sequence.grid_cells;
                if let Some(i) = geometry::grid_cell_at(self.viewport, cells, col, row) {
                    self.playground.click_cell(i);
                }
            }
        }
    }

    fn on_menu_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.menu_cursor = self.menu_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.menu_cursor = (self.menu_cursor + 1).min(GameKind::ALL.len() - 1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.select(GameKind::ALL[self.menu_cursor]),
            KeyCode::Char(c @ '1'..='3') => {
                let i = c as usize - '1' as usize;
                self.select(GameKind::ALL[i]);
            }
            _ => {}
        }
    }

    fn on_precision_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('s') | KeyCode::Enter => {
                self.playground.start();
                self.sync_play_area();
            }
            KeyCode::Char('r') => self.playground.reset(),
            _ => {}
        }
    }

    fn on_reaction_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(' ') | KeyCode::Enter => self.press_reaction(),
            KeyCode::Char('s') => self.playground.start(),
            KeyCode::Char('r') => self.playground.reset(),
            _ => {}
        }
    }

    fn on_sequence_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('s') | KeyCode::Enter => self.playground.start(),
            KeyCode::Char(c @ '1'..='9') => {
                let i = c as usize - '1' as usize;
                self.playground.click_cell(i);
            }
            _ => {}
        }
    }

    /// Space / click on the reaction screen: start, react, or try again.
    fn press_reaction(&mut self) {
        let phase = self
            .playground
            .active()
            .and_then(ActiveGame::as_reaction)
            .map(|g| g.phase());
        match phase {
            Some(ReactionPhase::Idle) => self.playground.start(),
            Some(ReactionPhase::Waiting | ReactionPhase::Ready) => {
                self.playground.click_reaction();
            }
            Some(ReactionPhase::Result | ReactionPhase::TooEarly) => self.playground.reset(),
            None => {}
        }
    }

    fn sync_play_area(&mut self) {
        let field = geometry::precision_field(self.viewport);
        self.playground
            .set_precision_area(geometry::play_area_px(field));
    }

    /// Whether something on screen changes on its own and needs redrawing every tick.
    pub fn is_animating(&self) -> bool {
        match self.playground.active() {
            Some(ActiveGame::Precision(g)) => g.status() == Status::Active,
            Some(ActiveGame::Reaction(g)) => {
                matches!(g.phase(), ReactionPhase::Waiting | ReactionPhase::Ready)
            }
            Some(ActiveGame::Sequence(g)) => !matches!(g.phase(), SequencePhase::Idle),
            None => false,
        }
    }
}
