use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::app::App;
use crate::clock::Clock;
use crate::games::GameKind;

const LEGEND: &str = "↑/↓ move · enter / 1-3 play · q quit";

pub(super) fn render<C: Clock>(app: &App<C>, body: Rect, buf: &mut Buffer) -> &'static str {
    let selected = Style::default()
        .fg(Color::Black)
        .bg(Color::Magenta)
        .add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);

    let mut lines = vec![Line::from("Pick a game"), Line::from("")];
    for (i, kind) in GameKind::ALL.iter().enumerate() {
        let name = format!(" {}. {} ", i + 1, kind);
        let style = if i == app.menu_cursor {
            selected
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(Span::styled(name, style)));
        lines.push(Line::from(Span::styled(kind.blurb(), dim)));
        lines.push(Line::from(""));
    }

    let top = body.height.saturating_sub(lines.len() as u16) / 2;
    let area = Rect::new(body.x, body.y + top, body.width, body.height - top);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, buf);

    LEGEND
}

