use crate::app::App;
use crate::editor::InteractionMode;
use crate::score::pitch_label;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

const KEY_HINTS: &str =
    "click: add/delete  drag edge: resize  j/k: octave  g: grid  ^Z/^Y: undo/redo  s: save  q: quit";

/// Badge colour for the interaction mode.
fn mode_color(mode: &InteractionMode) -> Color {
    match mode {
        InteractionMode::Hover { .. } => Color::Green,
        InteractionMode::Down { .. } => Color::Yellow,
        InteractionMode::ResizeNote { .. } => Color::Magenta,
    }
}

/// Renders the status bar: interaction mode, pointer position, editing
/// defaults and the latest status message.
pub fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode = app.editor.mode();
    let defaults = app.editor.defaults();

    let pointer = match mode.pointer() {
        Some(mp) if mp.time >= 0.0 => format!("{} @ {:.2}", pitch_label(mp.pitch), mp.time),
        Some(mp) => pitch_label(mp.pitch),
        None => "-".to_string(),
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} ", mode.name().to_uppercase()),
            Style::default()
                .fg(Color::Black)
                .bg(mode_color(mode))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {}  ", pointer)),
        Span::styled(
            format!(
                "grid {}  note {}  next n{}  notes {}  oct {}",
                defaults.grid_size,
                defaults.note_size,
                defaults.next_id,
                app.pattern().note_count(),
                app.editor.scroll_octave()
            ),
            Style::default().fg(Color::Gray),
        ),
    ];

    if app.is_modified() {
        spans.push(Span::styled(" *", Style::default().fg(Color::Red)));
    }

    if let Some((message, _)) = &app.status_message {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        ));
    } else if app.pattern().is_empty() {
        spans.push(Span::styled(
            "  click a cell to add a note",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut lines = vec![Line::from(spans)];
    if app.show_help {
        lines.push(Line::from(Span::styled(
            format!(" {}", KEY_HINTS),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::MusicalPoint;
    use crate::score::Note;

    #[test]
    fn test_mode_color_per_variant() {
        let p = MusicalPoint {
            x: 0.0,
            y: 0.0,
            pitch: 5,
            time: 2.0,
        };
        assert_eq!(mode_color(&InteractionMode::Hover { pointer: None }), Color::Green);
        assert_eq!(
            mode_color(&InteractionMode::Down {
                origin: p,
                current: Some(p),
            }),
            Color::Yellow
        );
        assert_eq!(
            mode_color(&InteractionMode::ResizeNote {
                from_right: true,
                origin: p,
                current: None,
                note: Note::new(5, 2.0, 6.0),
                note_index: 0,
            }),
            Color::Magenta
        );
    }
}
