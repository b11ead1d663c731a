//! Card placement: maps gesture offsets (viewport pixels) onto terminal cells.

use ratatui::layout::Rect;

use hivecheck_engine::{CardView, Offset};

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;

/// Resting rectangle of the top card inside `area`.
#[must_use]
pub fn base_card_rect(area: Rect) -> Rect {
    let width = (area.width.saturating_mul(3) / 5).clamp(area.width.min(20), area.width);
    let height = area.height.saturating_sub(2).max(area.height.min(5));
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Offset a card by its gesture transform, clipped to `viewport`.
///
/// `viewport_width` is the logical width W the gesture stack measures in; the
/// viewport's cell width is mapped onto it. Returns `None` once the card is
/// entirely outside the viewport (mid fly-out).
#[must_use]
pub fn place_card(card: &CardView<'_>, base: Rect, viewport: Rect, viewport_width: f32) -> Option<Rect> {
    let (dx, dy) = cell_offset(card.offset, viewport, viewport_width);
    let x = i32::from(base.x) + dx;
    let y = i32::from(base.y) + dy;

    let left = x.max(i32::from(viewport.x));
    let top = y.max(i32::from(viewport.y));
    let right = (x + i32::from(base.width)).min(i32::from(viewport.right()));
    let bottom = (y + i32::from(base.height)).min(i32::from(viewport.bottom()));
    if right <= left || bottom <= top {
        return None;
    }
    Some(Rect {
        x: left as u16,
        y: top as u16,
        width: (right - left) as u16,
        height: (bottom - top) as u16,
    })
}

fn cell_offset(offset: Offset, viewport: Rect, viewport_width: f32) -> (i32, i32) {
    if viewport_width <= 0.0 {
        return (0, 0);
    }
    let scale = f32::from(viewport.width) / viewport_width;
    let dx = (offset.x * scale).round() as i32;
    let dy = (offset.y * scale / CELL_ASPECT).round() as i32;
    (dx, dy)
}
