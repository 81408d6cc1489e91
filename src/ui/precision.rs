use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::{centered, geometry};
use crate::games::precision::{PrecisionGame, Zone};
use crate::games::{Game, Status};

const LEGEND: &str = "s start · r reset · click the targets · esc menu";

fn zone_color(zone: Zone) -> Color {
    match zone {
        Zone::Perfect => Color::Green,
        Zone::Good => Color::Yellow,
        Zone::Hit => Color::Red,
    }
}

pub(super) fn render(game: &PrecisionGame, area: Rect, buf: &mut Buffer) -> &'static str {
    let chunks = geometry::chunks(area);
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mut hud = vec![
        Span::styled(format!("Score: {}", game.score()), bold),
        Span::raw("   "),
        Span::styled(
            format!("Time: {}s", game.time_left()),
            if game.time_left() <= 5 {
                bold.fg(Color::Red)
            } else {
                bold
            },
        ),
    ];
    if game.combo() > 1 {
        hud.push(Span::raw("   "));
        hud.push(Span::styled(
            format!("Combo x{}", game.combo()),
            bold.fg(Color::Magenta),
        ));
    }
    if let Some(hit) = game.last_hit() {
        hud.push(Span::raw("   "));
        let label = if hit.bonus > 0 {
            format!("{} +{} (+{} combo)", hit.zone, hit.points, hit.bonus)
        } else {
            format!("{} +{}", hit.zone, hit.points)
        };
        hud.push(Span::styled(label, Style::default().fg(zone_color(hit.zone))));
    }
    let mut header = chunks.header;
    header.y += 1;
    header.height = header.height.saturating_sub(1);
    Paragraph::new(Line::from(hud))
        .alignment(Alignment::Center)
        .render(header, buf);

    let border = if game.miss_flash() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .render(chunks.body, buf);

    let field = geometry::precision_field(area);
    match game.status() {
        Status::Idle => {
            let mid = field.y + field.height / 2;
            let prompt = format!(
                "Press s to start a {} second round",
                game.config().round_secs
            );
            centered(buf, field, mid, &prompt, bold);
        }
        Status::Finished => {
            let mid = field.y + field.height / 2;
            centered(
                buf,
                field,
                mid.saturating_sub(1),
                &format!("Final score: {}", game.score()),
                bold,
            );
            if let Some(tier) = game.score_tier() {
                centered(buf, field, mid, tier, bold.fg(Color::Green));
            }
            centered(
                buf,
                field,
                mid + 1,
                "Press r to reset",
                Style::default().add_modifier(Modifier::DIM),
            );
        }
        Status::Active => draw_target(game, field, buf),
    }

    LEGEND
}

/// Paint every field cell whose center lies on the target, shaded by scoring zone.
fn draw_target(game: &PrecisionGame, field: Rect, buf: &mut Buffer) {
    let Some(target) = game.target() else {
        return;
    };
    let play = game.area();
    let center = target.center(play);
    let r = target.radius();

    let col0 = ((center.x - r) / geometry::CELL_WIDTH_PX).floor().max(0.0) as u16;
    let col1 = ((center.x + r) / geometry::CELL_WIDTH_PX).ceil() as u16;
    let row0 = ((center.y - r) / geometry::CELL_HEIGHT_PX).floor().max(0.0) as u16;
    let row1 = ((center.y + r) / geometry::CELL_HEIGHT_PX).ceil() as u16;

    for row in row0..row1.min(field.height) {
        for col in col0..col1.min(field.width) {
            let (x, y) = (field.x + col, field.y + row);
            let Some(p) = geometry::cell_center_px(field, x, y) else {
                continue;
            };
            if !target.contains(play, p) {
                continue;
            }
            let zone = Zone::classify(target.distance_ratio(play, p), game.config());
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_symbol("█").set_fg(zone_color(zone));
            }
        }
    }

    let label = format!("+{}", target.value);
    let label_row = field.y + (center.y / geometry::CELL_HEIGHT_PX) as u16;
    let label_area = Rect::new(
        field.x + col0.min(field.width),
        label_row,
        col1.min(field.width).saturating_sub(col0),
        1,
    )
    .intersection(field);
    centered(
        buf,
        label_area,
        label_row,
        &label,
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD),
    );
}
