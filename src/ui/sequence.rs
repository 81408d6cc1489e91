use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use super::{centered, geometry};
use crate::games::sequence::{SequenceGame, SequencePhase};

const LEGEND: &str = "s start · 1-9 / click cells · esc menu";

pub(super) fn render(game: &SequenceGame, area: Rect, buf: &mut Buffer) -> &'static str {
    let chunks = geometry::chunks(area);
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let status = match game.phase() {
        SequencePhase::Idle if game.score() > 0 => {
            format!("Game over at level {} · press s to play again", game.score())
        }
        SequencePhase::Idle => "Press s to start".to_owned(),
        SequencePhase::Playback => "Watch the pattern...".to_owned(),
        SequencePhase::AwaitingInput => {
            let dots = (0..game.steps().len())
                .map(|i| if i < game.cursor() { "●" } else { "○" })
                .join(" ");
            format!("Your turn  {dots}")
        }
        SequencePhase::RoundComplete => "Correct!".to_owned(),
        SequencePhase::Mismatch => "Wrong cell!".to_owned(),
    };
    let mut level = format!("Level {}", game.score());
    if let Some(tier) = game.score_tier() {
        level = format!("{level} · {tier}");
    }
    centered(buf, chunks.header, chunks.header.y + 1, &level, bold);
    centered(
        buf,
        chunks.header,
        chunks.header.y + 2,
        &status,
        Style::default().fg(Color::Cyan),
    );

    for (i, rect) in geometry::grid_cells(area, game.grid_cells())
        .into_iter()
        .enumerate()
    {
        if rect.is_empty() {
            continue;
        }
        let style = if game.wrong_cell() == Some(i) {
            Style::default().bg(Color::Red).fg(Color::White)
        } else if game.highlighted() == Some(i) {
            Style::default().bg(Color::Cyan).fg(Color::Black)
        } else if game.accepts_input() {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Block::default()
            .borders(Borders::ALL)
            .style(style)
            .render(rect, buf);
        let mid = rect.y + rect.height / 2;
        centered(buf, rect, mid, &(i + 1).to_string(), style.add_modifier(Modifier::BOLD));
    }

    LEGEND
}
