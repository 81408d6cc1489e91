use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use super::{centered, geometry};
use crate::games::reaction::{ReactionGame, ReactionPhase};

const LEGEND: &str = "space / click react · r reset · esc menu";
const HISTORY_SHOWN: usize = 5;

pub(super) fn render(game: &ReactionGame, area: Rect, buf: &mut Buffer) -> &'static str {
    let body = geometry::chunks(area).body;
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let (bg, lines): (Color, Vec<String>) = match game.phase() {
        ReactionPhase::Idle => (
            Color::Blue,
            vec![
                "Press Space to start".to_owned(),
                "Click as soon as the screen turns green".to_owned(),
            ],
        ),
        ReactionPhase::Waiting => (Color::Red, vec!["Wait for green...".to_owned()]),
        ReactionPhase::Ready => (Color::Green, vec!["CLICK NOW!".to_owned()]),
        ReactionPhase::Result => {
            let mut lines = vec![format!(
                "{} ms",
                game.reaction_ms().unwrap_or_default()
            )];
            if let Some(tier) = game.tier() {
                lines.push(tier.message().to_owned());
            }
            lines.push("Press Space to try again".to_owned());
            (Color::Blue, lines)
        }
        ReactionPhase::TooEarly => (
            Color::Yellow,
            vec![
                "Too early!".to_owned(),
                "Press Space to try again".to_owned(),
            ],
        ),
    };

    Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(bg))
        .render(body, buf);

    let fg = match bg {
        Color::Yellow | Color::Green => Color::Black,
        _ => Color::White,
    };
    let inner = body.inner(Margin::new(1, 1));
    let top = (inner.y + inner.height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, line) in lines.iter().enumerate() {
        let style = if i == 0 {
            bold.fg(fg).bg(bg)
        } else {
            Style::default().fg(fg).bg(bg)
        };
        centered(buf, inner, top + i as u16, line, style);
    }

    let mut stats = Vec::new();
    if let Some(best) = game.best_ms() {
        stats.push(format!("Best: {best} ms"));
    }
    if let Some(avg) = game.average_ms() {
        stats.push(format!("Average: {avg:.0} ms"));
    }
    if !game.history().is_empty() {
        let recent = game
            .history()
            .iter()
            .rev()
            .take(HISTORY_SHOWN)
            .map(|ms| format!("{ms}"))
            .join(" · ");
        stats.push(format!("Recent: {recent}"));
    }
    if !stats.is_empty() {
        let row = inner.y + inner.height.saturating_sub(1);
        centered(
            buf,
            inner,
            row,
            &stats.join("   "),
            Style::default().fg(fg).bg(bg).add_modifier(Modifier::DIM),
        );
    }

    LEGEND
}
