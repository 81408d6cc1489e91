use assert_matches::assert_matches;

use playground::clock::ManualClock;
use playground::config::{Config, PrecisionConfig, ReactionConfig, SequenceConfig};
use playground::games::precision::{ClickOutcome, Point, PrecisionGame, Target, Zone};
use playground::games::reaction::{ReactionGame, ReactionOutcome, ReactionPhase};
use playground::games::sequence::{CellOutcome, SequenceGame, SequencePhase};
use playground::games::{Game, GameKind, Status};
use playground::playground::Playground;
use playground::random::ScriptedRandom;

// ScriptedRandom with no units yields 0.5: a 60px target worth 40 at 47.5% / 47.5%,
// and a reaction delay of 3000ms.
fn precision() -> PrecisionGame {
    let mut g = PrecisionGame::new(PrecisionConfig::default(), Box::new(ScriptedRandom::new()));
    g.start(0);
    g.poll(100);
    g
}

fn center_of(g: &PrecisionGame) -> Point {
    g.target().unwrap().center(g.area())
}

#[test]
fn zone_multiplier_never_grows_with_distance() {
    let cfg = PrecisionConfig::default();
    let ratios: Vec<f64> = (0..=100).map(|i| i as f64 / 100.0).collect();
    for pair in ratios.windows(2) {
        let near = Zone::classify(pair[0], &cfg).multiplier(&cfg);
        let far = Zone::classify(pair[1], &cfg).multiplier(&cfg);
        assert!(near >= far, "{} -> {}", pair[0], pair[1]);
    }

    assert_eq!(Zone::classify(0.25, &cfg), Zone::Perfect);
    assert_eq!(Zone::classify(0.250_001, &cfg), Zone::Good);
    assert_eq!(Zone::classify(0.60, &cfg), Zone::Good);
    assert_eq!(Zone::classify(0.600_001, &cfg), Zone::Hit);
}

#[test]
fn zone_boundaries_through_clicks() {
    let mut g = precision();
    let c = center_of(&g);
    let r = g.target().map(Target::radius).unwrap();

    let hit = g.click_target(100, Point::new(c.x + 0.25 * r, c.y));
    assert_matches!(hit, ClickOutcome::Hit(h) if h.zone == Zone::Perfect);

    g.poll(300);
    let c = center_of(&g);
    let hit = g.click_target(300, Point::new(c.x, c.y + 0.6 * r));
    assert_matches!(hit, ClickOutcome::Hit(h) if h.zone == Zone::Good);

    g.poll(500);
    let c = center_of(&g);
    let hit = g.click_target(500, Point::new(c.x + 0.9 * r, c.y));
    assert_matches!(hit, ClickOutcome::Hit(h) if h.zone == Zone::Hit && h.points == 16);
}

#[test]
fn six_center_hits_accumulate_combo_bonus() {
    let mut g = precision();
    let mut bonuses = Vec::new();
    let mut t = 100;
    for _ in 0..6 {
        let at = center_of(&g);
        match g.click_target(t, at) {
            ClickOutcome::Hit(hit) => {
                assert_eq!(hit.zone, Zone::Perfect);
                assert_eq!(hit.points, 40);
                bonuses.push(hit.bonus);
            }
            other => panic!("expected a hit, got {other:?}"),
        }
        t += 200;
        g.poll(t);
    }

    assert_eq!(bonuses, vec![0, 0, 10, 10, 10, 20]);
    assert_eq!(g.combo(), 6);
    assert_eq!(g.score(), 6 * 40 + 50);
}

#[test]
fn miss_click_resets_combo() {
    let mut g = precision();
    let mut t = 100;
    for _ in 0..5 {
        let at = center_of(&g);
        g.click_target(t, at);
        t += 200;
        g.poll(t);
    }
    assert_eq!(g.combo(), 5);
    let score = g.score();

    g.miss_click(t);
    assert_eq!(g.combo(), 0);
    assert_eq!(g.score(), score);
    assert!(g.target().is_some());

    let at = center_of(&g);
    assert_matches!(
        g.click_target(t, at),
        ClickOutcome::Hit(h) if h.combo == 1 && h.bonus == 0
    );
}

#[test]
fn target_timeout_resets_combo() {
    let mut g = precision();
    let mut t = 100;
    for _ in 0..5 {
        let at = center_of(&g);
        g.click_target(t, at);
        t += 200;
        g.poll(t);
    }
    assert_eq!(g.combo(), 5);

    // the fresh target lives 1800ms
    g.poll(t + 1_800);
    assert_eq!(g.combo(), 0);
    assert!(g.target().is_none());

    g.poll(t + 2_000);
    let at = center_of(&g);
    assert_matches!(
        g.click_target(t + 2_000, at),
        ClickOutcome::Hit(h) if h.combo == 1 && h.bonus == 0
    );
}

#[test]
fn early_reaction_click_cancels_stimulus() {
    let mut g = ReactionGame::new(ReactionConfig::default(), Box::new(ScriptedRandom::new()));
    g.start(0);
    assert_eq!(g.click(500), ReactionOutcome::TooEarly);
    assert_eq!(g.phase(), ReactionPhase::TooEarly);

    g.poll(10_000);
    assert_eq!(g.phase(), ReactionPhase::TooEarly);
    assert_eq!(g.ready_at(), None);
    assert_eq!(g.pending_timers(), 0);
}

#[test]
fn reaction_measures_exact_interval() {
    let mut g = ReactionGame::new(ReactionConfig::default(), Box::new(ScriptedRandom::new()));
    g.start(0);
    g.on_stimulus_ready(2_000);
    assert_eq!(g.click(2_237), ReactionOutcome::Measured(237));
    assert_eq!(g.reaction_ms(), Some(237));
}

#[test]
fn sequence_grows_then_mismatch_keeps_completed_rounds() {
    let cfg = SequenceConfig::default();
    let mut g = SequenceGame::new(
        cfg.clone(),
        Box::new(ScriptedRandom::new().with_indices([2, 6])),
    );
    g.start(0);
    assert_eq!(g.steps(), &[2]);

    // lead-in, one highlight and one gap
    let mut t = cfg.lead_in_ms + cfg.highlight_ms + cfg.gap_ms;
    g.poll(t);
    assert_eq!(g.phase(), SequencePhase::AwaitingInput);
    assert_eq!(g.click_cell(t, 2), CellOutcome::RoundComplete { score: 1 });

    t += cfg.advance_delay_ms;
    g.poll(t);
    assert_eq!(g.steps(), &[2, 6]);
    assert_eq!(g.phase(), SequencePhase::Playback);

    t += cfg.lead_in_ms + 2 * (cfg.highlight_ms + cfg.gap_ms);
    g.poll(t);
    assert_eq!(g.click_cell(t, 2), CellOutcome::Progress { matched: 1 });
    assert_eq!(g.cursor(), 1);
    assert_eq!(
        g.click_cell(t, 0),
        CellOutcome::Mismatch {
            expected: 6,
            got: 0
        }
    );
    assert_eq!(g.score(), 1);

    g.poll(t + cfg.mismatch_linger_ms);
    assert_eq!(g.phase(), SequencePhase::Idle);
    assert_eq!(g.score(), 1);
}

#[test]
fn clicks_during_playback_are_ignored() {
    let mut g = SequenceGame::new(
        SequenceConfig::default(),
        Box::new(ScriptedRandom::new().with_indices([3])),
    );
    g.start(0);
    for t in [0, 400, 900, 1_200, 1_599] {
        g.poll(t);
        assert_eq!(g.phase(), SequencePhase::Playback);
        assert_eq!(g.click_cell(t, 3), CellOutcome::Ignored);
        assert_eq!(g.cursor(), 0);
        assert_eq!(g.score(), 0);
    }
    g.poll(1_600);
    assert!(g.accepts_input());
}

#[test]
fn switching_games_silences_abandoned_timers() {
    for first in GameKind::ALL {
        let mut shell = Playground::new(ManualClock::new(0), Config::default())
            .with_randomness(|_| Box::new(ScriptedRandom::new().with_indices([1])));
        shell.select(first);
        shell.start();

        let other = GameKind::ALL.into_iter().find(|k| *k != first).unwrap();
        let mut retired = shell.select(other).unwrap();
        assert_eq!(retired.pending_timers(), 0);
        assert_eq!(retired.status(), Status::Idle);
        let before = format!("{retired:?}");

        shell.clock().advance(120_000);
        retired.poll(shell.now());
        shell.poll();

        assert_eq!(format!("{retired:?}"), before, "{first} changed after teardown");
        assert_eq!(shell.active().unwrap().status(), Status::Idle);
    }
}
