//! TUI rendering for hivecheck using ratatui.

mod effects;
mod input;
mod theme;

pub use effects::{base_card_rect, place_card};
pub use input::{
    InputPump, KeyAction, NUDGE_RATIO, PointerDriver, QUICK_SWIPE_RATIO, handle_events, map_key,
};
pub use theme::{Glyphs, Palette, glyphs, styles};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph, Row, Table, Wrap},
};

use hivecheck_engine::{
    CardView, GesturePhase, LeaderboardRecord, Score, Session, SessionMode,
};

pub const APP_TITLE: &str = "Happy Hives?";
const SWIPE_HINT: &str = "Swipe right for healthy and left for unhealthy";

/// Draw a running (or just finished) session.
pub fn draw_session(frame: &mut Frame, session: &Session, palette: &Palette, glyphs: &Glyphs) {
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Timer
            Constraint::Min(5),    // Cards
            Constraint::Length(1), // Feedback / hint
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_title(frame, session, chunks[0], palette, glyphs);
    draw_timer(frame, session, chunks[1], palette);
    draw_cards(frame, session, chunks[2], palette, glyphs);
    draw_feedback(frame, session, chunks[3], palette);
    draw_status_bar(frame, session, chunks[4], palette, glyphs);
}

fn draw_title(frame: &mut Frame, session: &Session, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let mut spans = vec![Span::styled(
        format!("{} {APP_TITLE}", glyphs.bee),
        styles::title(palette),
    )];
    if let Some(name) = session.reviewer() {
        spans.push(Span::styled(format!("  {name}"), styles::muted(palette)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_timer(frame: &mut Frame, session: &Session, area: Rect, palette: &Palette) {
    match session.mode() {
        SessionMode::Tutorial => {
            let line = Line::from(Span::styled("Tutorial", styles::muted(palette)));
            frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
        }
        SessionMode::Timed { .. } => {
            let remaining = session.remaining_secs().unwrap_or(0);
            let gauge = Gauge::default()
                .gauge_style(Style::default().fg(palette.honey).bg(palette.bg_card_back))
                .ratio(session.time_fraction().clamp(0.0, 1.0))
                .label(format!("{remaining}s"));
            frame.render_widget(gauge, area);
        }
    }
}

fn draw_cards(frame: &mut Frame, session: &Session, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let cards = session.visible_cards();
    if cards.is_empty() {
        let text = if session.is_running() {
            "No more hives. Press q to finish."
        } else {
            "Session over."
        };
        let empty = Paragraph::new(Line::from(Span::styled(text, styles::muted(palette))))
            .alignment(Alignment::Center);
        frame.render_widget(empty, centered_line(area));
        return;
    }

    let stack = session.stack();
    let viewport_width = stack.config().viewport_width;
    let threshold = stack.config().commit_threshold();
    let phase = stack.phase();
    let base = base_card_rect(area);

    // Deepest card first so the top card paints last.
    for card in cards.iter().rev() {
        let Some(rect) = place_card(card, base, area, viewport_width) else {
            continue;
        };
        frame.render_widget(Clear, rect);
        if card.interactive {
            draw_top_card(frame, card, rect, phase, threshold, palette, glyphs);
        } else {
            let back = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(palette.border))
                .style(Style::default().bg(palette.bg_card_back));
            frame.render_widget(back, rect);
        }
    }
}

fn draw_top_card(
    frame: &mut Frame,
    card: &CardView<'_>,
    rect: Rect,
    phase: GesturePhase,
    threshold: f32,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let (border_color, verdict) = if card.offset.x > threshold {
        (palette.healthy, Some(format!("HEALTHY {}", glyphs.swipe_right)))
    } else if card.offset.x < -threshold {
        (palette.unhealthy, Some(format!("{} UNHEALTHY", glyphs.swipe_left)))
    } else {
        (palette.honey, None)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .title(Line::from(format!(" {} ", card.item.id)))
        .title_bottom(Line::from(tilt_label(card.rotation_deg, glyphs)).right_aligned())
        .style(Style::default().bg(palette.bg_card));

    let mut lines = vec![
        Line::from(Span::styled(
            card.item.image.as_str().to_string(),
            styles::muted(palette),
        )),
        Line::default(),
    ];
    if !card.item.caption.is_empty() {
        lines.push(Line::from(Span::styled(
            card.item.caption.clone(),
            Style::default().fg(palette.text_primary),
        )));
    }
    if let Some(verdict) = verdict {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            verdict,
            Style::default()
                .fg(border_color)
                .add_modifier(Modifier::BOLD),
        )));
    }
    if matches!(phase, GesturePhase::Cancelling) {
        lines.push(Line::from(Span::styled(glyphs.ellipsis, styles::muted(palette))));
    }

    let body = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(body, rect);
}

fn tilt_label(rotation_deg: f32, glyphs: &Glyphs) -> String {
    let rounded = rotation_deg.round() as i32;
    match rounded {
        0 => String::new(),
        r if r > 0 => format!(" {} {r}{} ", glyphs.tilt_right, glyphs.degree),
        r => format!(" {} {}{} ", glyphs.tilt_left, r.abs(), glyphs.degree),
    }
}

fn draw_feedback(frame: &mut Frame, session: &Session, area: Rect, palette: &Palette) {
    let line = match session.last_feedback() {
        Some(feedback) => Line::from(Span::styled(
            feedback.message(),
            styles::verdict(palette, feedback.is_correct()),
        )),
        None => Line::from(Span::styled(SWIPE_HINT, styles::muted(palette))),
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn key_hint(glyphs: &Glyphs) -> String {
    let Glyphs {
        drag_keys, bullet, ..
    } = glyphs;
    format!("{drag_keys} drag {bullet} Enter release {bullet} h/l quick swipe {bullet} q stop")
}

fn draw_status_bar(
    frame: &mut Frame,
    session: &Session,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let Score { correct, reviewed } = session.score();
    let sep = glyphs.separator;
    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!("Reviewed {reviewed} {sep} Correct {correct}"),
            Style::default().fg(palette.text_primary),
        ),
        Span::styled(format!(" {sep} {}", key_hint(glyphs)), styles::muted(palette)),
    ]));
    frame.render_widget(status, area);
}

/// End-of-session screen.
pub fn draw_summary(
    frame: &mut Frame,
    title: &str,
    score: Score,
    best: Option<&LeaderboardRecord>,
    palette: &Palette,
) {
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let mut lines = vec![
        Line::from(Span::styled(title.to_string(), styles::title(palette))),
        Line::default(),
        Line::from(format!("Score: {} / {}", score.correct, score.reviewed)),
    ];
    if let Some(best) = best {
        lines.push(Line::from(Span::styled(
            format!(
                "Best for {}: {} / {}",
                best.name, best.best_correct, best.best_reviewed
            ),
            styles::muted(palette),
        )));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Press any key to continue",
        styles::muted(palette),
    )));

    let height = lines.len() as u16;
    let area = frame.area();
    let rect = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: area.width,
        height: height.min(area.height),
    };
    let body = Paragraph::new(lines)
        .style(Style::default().fg(palette.text_primary))
        .alignment(Alignment::Center);
    frame.render_widget(body, rect);
}

/// Ranked leaderboard table. `highlight` marks one reviewer's row.
pub fn draw_leaderboard(
    frame: &mut Frame,
    records: &[LeaderboardRecord],
    highlight: Option<&str>,
    palette: &Palette,
) {
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .title(Line::from(Span::styled(" Leaderboard ", styles::title(palette))));

    if records.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No sessions recorded yet.",
            styles::muted(palette),
        )))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(empty, frame.area());
        return;
    }

    let header = Row::new(["#", "Name", "Correct", "Reviewed"])
        .style(Style::default().fg(palette.honey).add_modifier(Modifier::BOLD));
    let rows = records.iter().enumerate().map(|(i, record)| {
        let style = if highlight == Some(record.name.as_str()) {
            Style::default()
                .fg(palette.bg_dark)
                .bg(palette.honey)
        } else {
            Style::default().fg(palette.text_primary)
        };
        Row::new([
            (i + 1).to_string(),
            record.name.to_string(),
            record.best_correct.to_string(),
            record.best_reviewed.to_string(),
        ])
        .style(style)
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(8),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(block);
    frame.render_widget(table, frame.area());
}

fn centered_line(area: Rect) -> Rect {
    Rect {
        x: area.x,
        y: area.y + area.height / 2,
        width: area.width,
        height: area.height.min(1),
    }
}
