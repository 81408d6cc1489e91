//! Click-precision target game.
//!
//! ```text
//! Idle -> Active -> Finished -> Idle
//!          |
//!          +- NoTarget -> TargetVisible -> (Hit | Expired) -> NoTarget ...
//! ```
//!
//! Targets are placed in percent of the play area and sized in pixels.
//! Clicks arrive in play-area pixels.

use tracing::{debug, info};

use super::{Game, GameKind, Status};
use crate::clock::Millis;
use crate::config::PrecisionConfig;
use crate::random::RandomSource;
use crate::timer::{TimerId, TimerQueue};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Size of the clickable surface in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayArea {
    pub width: f64,
    pub height: f64,
}

impl Default for PlayArea {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 480.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub id: u64,
    /// Center, in percent of the play area.
    pub x_pct: f64,
    pub y_pct: f64,
    /// Edge length in pixels.
    pub size: f64,
    /// Base points; smaller targets are worth more.
    pub value: u32,
    pub spawned_at: Millis,
}

impl Target {
    pub fn center(&self, area: PlayArea) -> Point {
        Point::new(
            self.x_pct * area.width / 100.0,
            self.y_pct * area.height / 100.0,
        )
    }

    pub fn radius(&self) -> f64 {
        self.size / 2.0
    }

    /// Whether `p` lands inside the target's square footprint.
    pub fn contains(&self, area: PlayArea, p: Point) -> bool {
        let c = self.center(area);
        let r = self.radius();
        (p.x - c.x).abs() <= r && (p.y - c.y).abs() <= r
    }

    /// Distance from the center, in multiples of the radius.
    pub fn distance_ratio(&self, area: PlayArea, p: Point) -> f64 {
        let c = self.center(area);
        let dx = p.x - c.x;
        let dy = p.y - c.y;
        (dx * dx + dy * dy).sqrt() / self.radius()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Zone {
    #[strum(to_string = "perfect")]
    Perfect,
    #[strum(to_string = "good")]
    Good,
    #[strum(to_string = "hit")]
    Hit,
}

impl Zone {
    pub fn classify(ratio: f64, cfg: &PrecisionConfig) -> Zone {
        if ratio <= cfg.perfect_ratio {
            Zone::Perfect
        } else if ratio <= cfg.good_ratio {
            Zone::Good
        } else {
            Zone::Hit
        }
    }

    pub fn multiplier(&self, cfg: &PrecisionConfig) -> f64 {
        match self {
            Zone::Perfect => cfg.perfect_multiplier,
            Zone::Good => cfg.good_multiplier,
            Zone::Hit => cfg.hit_multiplier,
        }
    }
}

/// Feedback for a successful hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub zone: Zone,
    pub ratio: f64,
    pub points: u32,
    pub bonus: u32,
    pub combo: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    Hit(Hit),
    Miss,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrecisionTimer {
    Tick,
    Spawn,
    Expire,
    MissFlashOff,
}

#[derive(Debug)]
pub struct PrecisionGame {
    config: PrecisionConfig,
    rng: Box<dyn RandomSource>,
    area: PlayArea,
    status: Status,
    score: u32,
    combo: u32,
    time_left: u32,
    target: Option<Target>,
    last_hit: Option<Hit>,
    miss_flash: bool,
    next_target_id: u64,
    timers: TimerQueue<PrecisionTimer>,
    tick_timer: Option<TimerId>,
    spawn_timer: Option<TimerId>,
    expire_timer: Option<TimerId>,
    flash_timer: Option<TimerId>,
}

impl PrecisionGame {
    pub fn new(config: PrecisionConfig, rng: Box<dyn RandomSource>) -> Self {
        let time_left = config.round_secs;
        Self {
            config,
            rng,
            area: PlayArea::default(),
            status: Status::Idle,
            score: 0,
            combo: 0,
            time_left,
            target: None,
            last_hit: None,
            miss_flash: false,
            next_target_id: 0,
            timers: TimerQueue::new(),
            tick_timer: None,
            spawn_timer: None,
            expire_timer: None,
            flash_timer: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    pub fn last_hit(&self) -> Option<&Hit> {
        self.last_hit.as_ref()
    }

    pub fn miss_flash(&self) -> bool {
        self.miss_flash
    }

    pub fn area(&self) -> PlayArea {
        self.area
    }

    pub fn config(&self) -> &PrecisionConfig {
        &self.config
    }

    pub fn set_area(&mut self, area: PlayArea) {
        self.area = area;
    }

    /// Label for the final score, if it earned one.
    pub fn score_tier(&self) -> Option<&'static str> {
        score_tier(self.score)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, now: Millis) {
        if self.status == Status::Active {
            return;
        }
        self.clear_timers();
        self.status = Status::Active;
        self.score = 0;
        self.combo = 0;
        self.time_left = self.config.round_secs;
        self.target = None;
        self.last_hit = None;
        self.miss_flash = false;
        self.tick_timer = Some(
            self.timers
                .schedule(now, self.config.tick_ms, PrecisionTimer::Tick),
        );
        self.spawn_timer = Some(self.timers.schedule(
            now,
            self.config.first_spawn_delay_ms,
            PrecisionTimer::Spawn,
        ));
        info!(round_secs = self.config.round_secs, "precision round started");
    }

    /// Replace the current target with a freshly drawn one.
    pub fn spawn_target(&mut self, now: Millis) {
        if self.status != Status::Active {
            return;
        }
        if let Some(id) = self.spawn_timer.take() {
            self.timers.cancel(id);
        }
        if let Some(id) = self.expire_timer.take() {
            self.timers.cancel(id);
        }

        let size = self
            .rng
            .between(self.config.min_size_px, self.config.max_size_px);
        let value = (100.0 - size).round().max(0.0) as u32;
        let x_pct = self
            .rng
            .between(self.config.position_min, self.config.position_max);
        let y_pct = self
            .rng
            .between(self.config.position_min, self.config.position_max);

        let target = Target {
            id: self.next_target_id,
            x_pct,
            y_pct,
            size,
            value,
            spawned_at: now,
        };
        self.next_target_id += 1;
        debug!(id = target.id, size, value, x_pct, y_pct, "target spawned");

        self.target = Some(target);
        self.expire_timer = Some(self.timers.schedule(
            now,
            self.config.target_lifetime_ms,
            PrecisionTimer::Expire,
        ));
    }

    /// Route a click anywhere in the play area.
    pub fn click(&mut self, now: Millis, at: Point) -> ClickOutcome {
        if self.status != Status::Active {
            return ClickOutcome::Ignored;
        }
        let on_target = self
            .target
            .as_ref()
            .is_some_and(|t| t.contains(self.area, at));
        if on_target {
            self.click_target(now, at)
        } else {
            self.miss_click(now);
            ClickOutcome::Miss
        }
    }

    /// Score a click against the current target.
    pub fn click_target(&mut self, now: Millis, at: Point) -> ClickOutcome {
        if self.status != Status::Active {
            return ClickOutcome::Ignored;
        }
        let Some(target) = self.target.as_ref() else {
            return ClickOutcome::Ignored;
        };
        if !target.contains(self.area, at) {
            self.miss_click(now);
            return ClickOutcome::Miss;
        }

        let ratio = target.distance_ratio(self.area, at);
        let zone = Zone::classify(ratio, &self.config);
        let points = (target.value as f64 * zone.multiplier(&self.config)).round() as u32;
        self.combo += 1;
        let bonus = self.config.combo_bonus * (self.combo / self.config.combo_step);
        self.score += points + bonus;

        let hit = Hit {
            zone,
            ratio,
            points,
            bonus,
            combo: self.combo,
        };
        debug!(%zone, ratio, points, bonus, combo = self.combo, "target hit");
        self.last_hit = Some(hit);

        self.target = None;
        if let Some(id) = self.expire_timer.take() {
            self.timers.cancel(id);
        }
        self.schedule_respawn(now);
        ClickOutcome::Hit(hit)
    }

    /// A click that landed anywhere but the target.
    pub fn miss_click(&mut self, now: Millis) {
        if self.status != Status::Active {
            return;
        }
        debug!(combo = self.combo, "miss click");
        self.combo = 0;
        self.miss_flash = true;
        if let Some(id) = self.flash_timer.take() {
            self.timers.cancel(id);
        }
        self.flash_timer = Some(self.timers.schedule(
            now,
            self.config.miss_flash_ms,
            PrecisionTimer::MissFlashOff,
        ));
    }

    /// The current target went unclicked for its whole lifetime.
    pub fn target_timeout(&mut self, now: Millis) {
        if self.status != Status::Active || self.target.is_none() {
            return;
        }
        debug!("target expired");
        self.target = None;
        self.combo = 0;
        if let Some(id) = self.expire_timer.take() {
            self.timers.cancel(id);
        }
        self.schedule_respawn(now);
    }

    /// One second of the round elapsed. The next tick is due one interval after `now`.
    pub fn tick(&mut self, now: Millis) {
        if self.status != Status::Active {
            return;
        }
        if let Some(id) = self.tick_timer.take() {
            self.timers.cancel(id);
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.finish();
        } else {
            self.tick_timer = Some(
                self.timers
                    .schedule(now, self.config.tick_ms, PrecisionTimer::Tick),
            );
        }
    }

    pub fn reset(&mut self) {
        if self.status != Status::Finished {
            return;
        }
        self.status = Status::Idle;
        self.time_left = self.config.round_secs;
    }

    fn schedule_respawn(&mut self, now: Millis) {
        if let Some(id) = self.spawn_timer.take() {
            self.timers.cancel(id);
        }
        self.spawn_timer = Some(self.timers.schedule(
            now,
            self.config.respawn_delay_ms,
            PrecisionTimer::Spawn,
        ));
    }

    fn finish(&mut self) {
        self.target = None;
        self.miss_flash = false;
        self.clear_timers();
        self.status = Status::Finished;
        info!(score = self.score, "precision round finished");
    }

    fn clear_timers(&mut self) {
        self.timers.cancel_all();
        self.tick_timer = None;
        self.spawn_timer = None;
        self.expire_timer = None;
        self.flash_timer = None;
    }

    fn fire(&mut self, at: Millis, timer: PrecisionTimer) {
        match timer {
            PrecisionTimer::Tick => {
                self.tick_timer = None;
                self.tick(at);
            }
            PrecisionTimer::Spawn => {
                self.spawn_timer = None;
                self.spawn_target(at);
            }
            PrecisionTimer::Expire => {
                self.expire_timer = None;
                self.target_timeout(at);
            }
            PrecisionTimer::MissFlashOff => {
                self.flash_timer = None;
                self.miss_flash = false;
            }
        }
    }
}

impl Game for PrecisionGame {
    fn kind(&self) -> GameKind {
        GameKind::Precision
    }

    fn status(&self) -> Status {
        self.status
    }

    fn poll(&mut self, now: Millis) {
        while let Some((at, timer)) = self.timers.pop_due(now) {
            self.fire(at, timer);
        }
    }

    fn teardown(&mut self) {
        self.clear_timers();
        self.target = None;
        self.miss_flash = false;
        if self.status == Status::Active {
            self.status = Status::Idle;
        }
    }

    fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}

pub fn score_tier(score: u32) -> Option<&'static str> {
    match score {
        s if s >= 2_000 => Some("Pixel Perfect!"),
        s if s >= 1_500 => Some("Excellent!"),
        s if s >= 1_000 => Some("Great!"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;
    use assert_matches::assert_matches;

    const AREA: PlayArea = PlayArea {
        width: 800.0,
        height: 600.0,
    };

    // Scripted draws of 0.5 give a 60px target worth 40, centered at 47.5%.
    fn game() -> PrecisionGame {
        let mut g = PrecisionGame::new(
            PrecisionConfig::default(),
            Box::new(ScriptedRandom::new()),
        );
        g.set_area(AREA);
        g
    }

    fn started() -> PrecisionGame {
        let mut g = game();
        g.start(0);
        g.poll(100);
        assert!(g.target().is_some());
        g
    }

    fn center(g: &PrecisionGame) -> Point {
        g.target().unwrap().center(AREA)
    }

    #[test]
    fn starts_idle() {
        let g = game();
        assert_eq!(g.status(), Status::Idle);
        assert_eq!(g.score(), 0);
        assert_eq!(g.time_left(), 30);
        assert!(g.target().is_none());
        assert_eq!(g.pending_timers(), 0);
    }

    #[test]
    fn start_schedules_first_spawn() {
        let mut g = game();
        g.start(0);
        assert_eq!(g.status(), Status::Active);
        assert!(g.target().is_none());

        g.poll(99);
        assert!(g.target().is_none());
        g.poll(100);
        let t = g.target().unwrap();
        assert_eq!(t.size, 60.0);
        assert_eq!(t.value, 40);
        assert_eq!(t.x_pct, 47.5);
        assert_eq!(t.y_pct, 47.5);
        assert_eq!(t.spawned_at, 100);
    }

    #[test]
    fn spawn_draws_within_bounds() {
        let mut g = PrecisionGame::new(
            PrecisionConfig::default(),
            Box::new(crate::random::SeededRandom::from_seed(3)),
        );
        g.start(0);
        for i in 0..200 {
            g.spawn_target(i);
            let t = g.target().unwrap();
            assert!((40.0..80.0).contains(&t.size));
            assert!((5.0..90.0).contains(&t.x_pct));
            assert!((5.0..90.0).contains(&t.y_pct));
            assert_eq!(t.value, (100.0 - t.size).round() as u32);
        }
    }

    #[test]
    fn spawn_replaces_previous_target() {
        let mut g = started();
        let first = g.target().unwrap().id;
        g.spawn_target(150);
        let second = g.target().unwrap().id;
        assert_ne!(first, second);
        // the first target's expiry must not remove the second one
        g.poll(1_900);
        assert_eq!(g.target().map(|t| t.id), Some(second));
    }

    #[test]
    fn zone_boundaries() {
        let cfg = PrecisionConfig::default();
        assert_eq!(Zone::classify(0.0, &cfg), Zone::Perfect);
        assert_eq!(Zone::classify(0.25, &cfg), Zone::Perfect);
        assert_eq!(Zone::classify(0.2501, &cfg), Zone::Good);
        assert_eq!(Zone::classify(0.60, &cfg), Zone::Good);
        assert_eq!(Zone::classify(0.6001, &cfg), Zone::Hit);
        assert_eq!(Zone::classify(1.4, &cfg), Zone::Hit);
    }

    #[test]
    fn zone_multiplier_is_monotonic_in_distance() {
        let cfg = PrecisionConfig::default();
        let mut last = f64::INFINITY;
        for step in 0..=100 {
            let ratio = step as f64 / 100.0;
            let m = Zone::classify(ratio, &cfg).multiplier(&cfg);
            assert!(m <= last, "multiplier rose at ratio {ratio}");
            last = m;
        }
    }

    #[test]
    fn click_at_exact_boundaries() {
        let mut g = started();
        let c = center(&g);
        // radius is 30px: 7.5px is ratio 0.25, 18px is ratio 0.60
        let hit = g.click(150, Point::new(c.x + 7.5, c.y));
        assert_matches!(hit, ClickOutcome::Hit(Hit { zone: Zone::Perfect, points: 40, .. }));

        g.poll(350);
        let c = center(&g);
        let hit = g.click(360, Point::new(c.x, c.y + 18.0));
        assert_matches!(hit, ClickOutcome::Hit(Hit { zone: Zone::Good, points: 28, .. }));

        g.poll(560);
        let c = center(&g);
        let hit = g.click(570, Point::new(c.x + 18.01, c.y));
        assert_matches!(hit, ClickOutcome::Hit(Hit { zone: Zone::Hit, points: 16, .. }));
    }

    #[test]
    fn corner_of_target_counts_as_outer_hit() {
        let mut g = started();
        let c = center(&g);
        let hit = g.click(150, Point::new(c.x + 29.0, c.y - 29.0));
        assert_matches!(hit, ClickOutcome::Hit(Hit { zone: Zone::Hit, .. }));
    }

    #[test]
    fn six_center_hits_accumulate_combo_bonus() {
        let mut g = started();
        let mut now = 100;
        let mut bonuses = Vec::new();
        for _ in 0..6 {
            now += 10;
            let c = center(&g);
            match g.click(now, c) {
                ClickOutcome::Hit(hit) => {
                    assert_eq!(hit.points, 40);
                    bonuses.push(hit.bonus);
                }
                other => panic!("expected hit, got {other:?}"),
            }
            now += 200;
            g.poll(now);
        }
        assert_eq!(bonuses, vec![0, 0, 10, 10, 10, 20]);
        assert_eq!(g.combo(), 6);
        assert_eq!(g.score(), 6 * 40 + 50);
    }

    #[test]
    fn miss_click_resets_combo_but_keeps_score_and_target() {
        let mut g = started();
        let mut now = 100;
        for _ in 0..5 {
            now += 10;
            let c = center(&g);
            g.click(now, c);
            now += 200;
            g.poll(now);
        }
        assert_eq!(g.combo(), 5);
        let score = g.score();
        let target = g.target().unwrap().id;

        assert_eq!(g.click(now + 1, Point::new(0.0, 0.0)), ClickOutcome::Miss);
        assert_eq!(g.combo(), 0);
        assert_eq!(g.score(), score);
        assert_eq!(g.target().unwrap().id, target);
        assert!(g.miss_flash());

        let c = center(&g);
        assert_matches!(
            g.click(now + 2, c),
            ClickOutcome::Hit(Hit { combo: 1, bonus: 0, .. })
        );
    }

    #[test]
    fn miss_flash_clears_after_delay() {
        let mut g = started();
        g.miss_click(200);
        assert!(g.miss_flash());
        g.poll(499);
        assert!(g.miss_flash());
        g.poll(500);
        assert!(!g.miss_flash());
    }

    #[test]
    fn timeout_discards_target_resets_combo_and_respawns() {
        let mut g = started();
        let c = center(&g);
        g.click(110, c);
        g.poll(310);
        assert_eq!(g.combo(), 1);
        let id = g.target().unwrap().id;

        // spawned at 310, expires 1800ms later
        g.poll(2_109);
        assert_eq!(g.target().unwrap().id, id);
        g.poll(2_110);
        assert!(g.target().is_none());
        assert_eq!(g.combo(), 0);

        g.poll(2_310);
        assert!(g.target().is_some());
        assert_ne!(g.target().unwrap().id, id);
    }

    #[test]
    fn hit_spawns_next_target_after_delay() {
        let mut g = started();
        let c = center(&g);
        g.click(500, c);
        assert!(g.target().is_none());
        g.poll(699);
        assert!(g.target().is_none());
        g.poll(700);
        assert!(g.target().is_some());
    }

    #[test]
    fn countdown_finishes_round() {
        let mut g = started();
        g.poll(1_000);
        assert_eq!(g.time_left(), 29);
        g.poll(29_999);
        assert_eq!(g.time_left(), 1);
        assert_eq!(g.status(), Status::Active);

        g.poll(30_000);
        assert_eq!(g.time_left(), 0);
        assert_eq!(g.status(), Status::Finished);
        assert!(g.target().is_none());
        assert_eq!(g.pending_timers(), 0);
    }

    #[test]
    fn input_outside_active_is_ignored() {
        let mut g = game();
        assert_eq!(g.click(0, Point::new(1.0, 1.0)), ClickOutcome::Ignored);
        assert_eq!(
            g.click_target(0, Point::new(1.0, 1.0)),
            ClickOutcome::Ignored
        );
        g.spawn_target(0);
        assert!(g.target().is_none());
        g.miss_click(0);
        assert!(!g.miss_flash());
        assert_eq!(g.pending_timers(), 0);
    }

    #[test]
    fn click_target_without_target_is_ignored() {
        let mut g = game();
        g.start(0);
        assert_eq!(
            g.click_target(50, Point::new(380.0, 285.0)),
            ClickOutcome::Ignored
        );
        // but a click on the empty play area still breaks the combo
        assert_eq!(g.click(50, Point::new(380.0, 285.0)), ClickOutcome::Miss);
    }

    #[test]
    fn reset_keeps_final_score_until_next_start() {
        let mut g = started();
        let c = center(&g);
        g.click(150, c);
        g.poll(30_000);
        assert_eq!(g.status(), Status::Finished);
        let score = g.score();
        assert!(score > 0);

        g.reset();
        assert_eq!(g.status(), Status::Idle);
        assert_eq!(g.score(), score);

        g.start(40_000);
        assert_eq!(g.score(), 0);
        assert_eq!(g.status(), Status::Active);
    }

    #[test]
    fn start_is_ignored_while_active() {
        let mut g = started();
        let c = center(&g);
        g.click(150, c);
        let score = g.score();
        g.start(200);
        assert_eq!(g.score(), score);
    }

    #[test]
    fn teardown_cancels_everything() {
        let mut g = started();
        g.miss_click(120);
        assert!(g.pending_timers() > 0);
        g.teardown();
        assert_eq!(g.pending_timers(), 0);
        assert_eq!(g.status(), Status::Idle);
        assert!(g.target().is_none());
        assert!(!g.miss_flash());

        let before = (g.time_left(), g.combo(), g.score());
        g.poll(1_000_000);
        assert_eq!(before, (g.time_left(), g.combo(), g.score()));
    }

    #[test]
    fn input_after_teardown_schedules_nothing() {
        let mut g = started();
        let c = center(&g);
        g.teardown();

        assert_eq!(g.click(150, c), ClickOutcome::Ignored);
        g.miss_click(160);
        g.target_timeout(170);
        g.tick(180);
        assert_eq!(g.pending_timers(), 0);

        g.poll(1_000_000);
        assert!(g.target().is_none());
        assert_eq!(g.score(), 0);
    }

    #[test]
    fn early_timeout_cancels_the_pending_expiry() {
        let mut g = started();
        // spawned at 100, would expire at 1900
        g.target_timeout(500);
        g.poll(700);
        let id = g.target().unwrap().id;

        g.poll(1_900);
        assert_eq!(g.target().map(|t| t.id), Some(id));
        g.poll(2_500);
        assert!(g.target().is_none());
    }

    #[test]
    fn manual_tick_replaces_the_scheduled_one() {
        let mut g = started();
        let pending = g.pending_timers();
        g.tick(200);
        assert_eq!(g.time_left(), 29);
        assert_eq!(g.pending_timers(), pending);

        g.poll(1_000);
        assert_eq!(g.time_left(), 29);
        g.poll(1_200);
        assert_eq!(g.time_left(), 28);
        g.poll(10_200);
        assert_eq!(g.time_left(), 19);
    }

    #[test]
    fn score_tiers() {
        assert_eq!(score_tier(2_000), Some("Pixel Perfect!"));
        assert_eq!(score_tier(1_999), Some("Excellent!"));
        assert_eq!(score_tier(1_000), Some("Great!"));
        assert_eq!(score_tier(999), None);
    }
}
