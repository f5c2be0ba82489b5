//! Piano roll editor rendering.
//!
//! Every cell is drawn by asking the engine what lies under the cell's
//! center pixel, so the picture agrees with what a click on that cell does.

use super::{contains_multiple, BAR_TICKS};
use crate::app::{cell_center, App, PX_PER_COL, TIME_RULER_HEIGHT};
use crate::editor::geometry::{to_musical, to_screen_rect, PIXELS_PER_TICK};
use crate::editor::lookup::find_index_at;
use crate::editor::{InteractionMode, ScreenPoint};
use crate::score::{is_black_key, pitch_label};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Renders the piano roll editor.
///
/// # Returns
///
/// The canvas region (keyboard strip plus grid) for mouse hit testing, or
/// `Rect::default()` if the area is too small to draw.
pub fn render_piano_roll(frame: &mut Frame, area: Rect, app: &App) -> Rect {
    let pattern = app.pattern();
    let defaults = app.editor.defaults();

    let title = format!(
        " Piano Roll - {} ticks, grid {}{} ",
        pattern.length(),
        defaults.grid_size,
        if app.is_modified() { " *" } else { "" }
    );

    // Yellow border stands in for the resize cursor
    let border = if app.editor.is_resizing() {
        Color::Yellow
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width < 10 || inner.height <= TIME_RULER_HEIGHT {
        return Rect::default();
    }

    let ruler = Rect::new(inner.x, inner.y, inner.width, TIME_RULER_HEIGHT);
    let grid = Rect::new(
        inner.x,
        inner.y + TIME_RULER_HEIGHT,
        inner.width,
        inner.height - TIME_RULER_HEIGHT,
    );

    render_ruler(frame, ruler);

    let scroll_octave = app.editor.scroll_octave();
    let camera = app.editor.camera();
    let notes = pattern.notes();
    let preview = app.editor.preview_note(pattern);
    let resizing_index = match app.editor.mode() {
        InteractionMode::ResizeNote { note_index, .. } => Some(*note_index),
        _ => None,
    };

    for row in 0..grid.height {
        let mut spans: Vec<Span> = Vec::with_capacity(grid.width as usize);
        let row_pitch = to_musical(cell_center(0, row), scroll_octave).pitch;
        let black = is_black_key(row_pitch);
        let label = pitch_label(row_pitch);
        let mut label_chars = label.chars();

        for col in 0..grid.width {
            let center = cell_center(col, row);
            let mp = to_musical(center, scroll_octave);
            let left = center.x - PX_PER_COL / 2.0;
            let tick_left = to_musical(ScreenPoint::new(left, center.y), scroll_octave).time;
            let tick_right = tick_left + PX_PER_COL / PIXELS_PER_TICK;

            let (ch, style) = if mp.time < 0.0 {
                // Keyboard strip, labelled from the left
                let ch = label_chars.next().unwrap_or(' ');
                let style = if black {
                    Style::default().bg(Color::DarkGray).fg(Color::White)
                } else if row_pitch.rem_euclid(12) == 0 {
                    Style::default().bg(Color::White).fg(Color::Black)
                } else {
                    Style::default().bg(Color::Gray).fg(Color::Black)
                };
                (ch, style)
            } else if let Some(index) = find_index_at(notes, &mp) {
                let note = notes[index].note;
                let rect = to_screen_rect(&note, camera);
                let is_start = rect.x >= left && rect.x < left + PX_PER_COL;
                let bg = if resizing_index == Some(index) {
                    Color::Magenta
                } else {
                    Color::Green
                };
                let ch = if is_start { '[' } else { '=' };
                (ch, Style::default().fg(Color::Black).bg(bg))
            } else if preview.is_some_and(|p| p.covers(mp.pitch, mp.time)) {
                ('+', Style::default().fg(Color::Cyan).bg(Color::Rgb(30, 45, 60)))
            } else if mp.time >= pattern.length() {
                (' ', Style::default().bg(Color::Rgb(12, 12, 12)))
            } else {
                let bg = if black {
                    Color::Rgb(30, 30, 30)
                } else {
                    Color::Rgb(40, 40, 40)
                };
                let (ch, fg) = if contains_multiple(tick_left, tick_right, BAR_TICKS) {
                    ('|', Color::White)
                } else if contains_multiple(tick_left, tick_right, defaults.grid_size) {
                    (':', Color::DarkGray)
                } else {
                    ('.', Color::Rgb(60, 60, 60))
                };
                (ch, Style::default().fg(fg).bg(bg))
            };

            spans.push(Span::styled(ch.to_string(), style));
        }

        frame.render_widget(
            Paragraph::new(Line::from(spans)),
            Rect::new(grid.x, grid.y + row, grid.width, 1),
        );
    }

    grid
}

/// Renders tick numbers above the grid, one per bar.
fn render_ruler(frame: &mut Frame, area: Rect) {
    let mut spans: Vec<Span> = Vec::with_capacity(area.width as usize);
    let mut col = 0u16;

    while col < area.width {
        let left = cell_center(col, 0).x - PX_PER_COL / 2.0;
        let tick_left = to_musical(ScreenPoint::new(left, 0.0), 0).time;
        let tick_right = tick_left + PX_PER_COL / PIXELS_PER_TICK;

        if tick_right > 0.0 && contains_multiple(tick_left.max(0.0), tick_right, BAR_TICKS) {
            let bar_tick = (tick_left.max(0.0) / BAR_TICKS).ceil() * BAR_TICKS;
            let text = format!("{}", bar_tick);
            let remaining = (area.width - col) as usize;
            if text.len() <= remaining {
                spans.push(Span::styled(
                    text.clone(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ));
                col += text.len() as u16;
                continue;
            }
            spans.push(Span::styled("|", Style::default().fg(Color::Yellow)));
        } else {
            spans.push(Span::raw(" "));
        }
        col += 1;
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
