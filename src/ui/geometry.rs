//! Mapping between terminal cells and game coordinates.
//!
//! The precision game thinks in pixels; a terminal cell stands in for an
//! 8x16 pixel block, which keeps targets roughly square on screen.

use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};

use crate::games::precision::{PlayArea, Point};

pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;

const GRID_CELL_WIDTH: u16 = 10;
const GRID_CELL_HEIGHT: u16 = 5;
const GRID_GAP: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunks {
    pub header: Rect,
    pub body: Rect,
    pub footer: Rect,
}

/// Header / body / footer split shared by every screen.
pub fn chunks(area: Rect) -> Chunks {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(2)
        .vertical_margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    Chunks {
        header: parts[0],
        body: parts[1],
        footer: parts[2],
    }
}

/// Inside of the bordered precision play field.
pub fn precision_field(area: Rect) -> Rect {
    chunks(area).body.inner(Margin::new(1, 1))
}

pub fn play_area_px(field: Rect) -> PlayArea {
    PlayArea {
        width: field.width as f64 * CELL_WIDTH_PX,
        height: field.height as f64 * CELL_HEIGHT_PX,
    }
}

pub fn contains(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

/// Pixel at the center of terminal cell (`col`, `row`), relative to `field`.
pub fn cell_center_px(field: Rect, col: u16, row: u16) -> Option<Point> {
    if !contains(field, col, row) {
        return None;
    }
    Some(Point::new(
        (col - field.x) as f64 * CELL_WIDTH_PX + CELL_WIDTH_PX / 2.0,
        (row - field.y) as f64 * CELL_HEIGHT_PX + CELL_HEIGHT_PX / 2.0,
    ))
}

pub fn grid_side(cells: usize) -> u16 {
    (cells as f64).sqrt().ceil().max(1.0) as u16
}

/// Screen rectangles for each cell of the memory grid, centered in the body.
pub fn grid_cells(area: Rect, cells: usize) -> Vec<Rect> {
    let body = chunks(area).body;
    let side = grid_side(cells);
    let width = side * GRID_CELL_WIDTH + (side - 1) * GRID_GAP;
    let height = side * GRID_CELL_HEIGHT + (side - 1) * GRID_GAP;
    let x0 = body.x + body.width.saturating_sub(width) / 2;
    let y0 = body.y + body.height.saturating_sub(height) / 2;

    (0..cells)
        .map(|i| {
            let col = i as u16 % side;
            let row = i as u16 / side;
            Rect::new(
                x0 + col * (GRID_CELL_WIDTH + GRID_GAP),
                y0 + row * (GRID_CELL_HEIGHT + GRID_GAP),
                GRID_CELL_WIDTH,
                GRID_CELL_HEIGHT,
            )
            .intersection(area)
        })
        .collect()
}

pub fn grid_cell_at(area: Rect, cells: usize, col: u16, row: u16) -> Option<usize> {
    grid_cells(area, cells)
        .into_iter()
        .position(|r| contains(r, col, row))
}
