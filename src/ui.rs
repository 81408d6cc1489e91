pub mod geometry;
mod menu;
mod precision;
mod reaction;
mod sequence;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::clock::Clock;
use crate::playground::ActiveGame;

impl<C: Clock> Widget for &App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = geometry::chunks(area);
        let bold_style = Style::default().add_modifier(Modifier::BOLD);

        let title = match self.playground.active_kind() {
            Some(kind) => kind.to_string(),
            None => "Playground".to_owned(),
        };
        Paragraph::new(vec![
            Line::from(Span::styled(title, bold_style.fg(Color::Magenta))),
            Line::from(""),
        ])
        .alignment(Alignment::Center)
        .render(chunks.header, buf);

        let legend = match self.playground.active() {
            None => menu::render(self, chunks.body, buf),
            Some(ActiveGame::Precision(g)) => precision::render(g, area, buf),
            Some(ActiveGame::Reaction(g)) => reaction::render(g, area, buf),
            Some(ActiveGame::Sequence(g)) => sequence::render(g, area, buf),
        };

        Paragraph::new(Span::styled(
            legend,
            Style::default()
                .add_modifier(Modifier::ITALIC)
                .add_modifier(Modifier::DIM),
        ))
        .alignment(Alignment::Center)
        .render(chunks.footer, buf);
    }
}

/// Write `text` centered on row `y` of `area`.
fn centered(buf: &mut Buffer, area: Rect, y: u16, text: &str, style: Style) {
    if y < area.y || y >= area.y + area.height {
        return;
    }
    let width = (text.width() as u16).min(area.width);
    let x = area.x + (area.width - width) / 2;
    buf.set_stringn(x, y, text, width as usize, style);
}
