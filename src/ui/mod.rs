//! User interface rendering.
//!
//! The screen is the piano roll on top and a status bar below. Rendering
//! records the regions it drew into `App::layout` so mouse events can be
//! mapped back onto the canvas.

mod piano_roll;
mod status;

use crate::app::{App, LayoutRegions};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

pub use piano_roll::render_piano_roll;
pub use status::render_status_bar;

/// Ticks per bar line in the grid and ruler.
pub const BAR_TICKS: f64 = 4.0;

/// Height of the status bar, borders included.
const STATUS_BAR_HEIGHT: u16 = 3;

/// Splits the screen into the piano roll and the status bar.
fn calculate_layout(area: Rect, show_help: bool) -> (Rect, Rect) {
    let status_height = if show_help {
        STATUS_BAR_HEIGHT + 1
    } else {
        STATUS_BAR_HEIGHT
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(status_height)])
        .split(area);

    (chunks[0], chunks[1])
}

/// Renders the entire UI.
pub fn render(frame: &mut Frame, app: &mut App) {
    let (roll_area, status_area) = calculate_layout(frame.area(), app.show_help);

    let roll_grid = render_piano_roll(frame, roll_area, app);
    render_status_bar(frame, status_area, app);

    app.layout = LayoutRegions { roll_grid };
}

/// Whether some multiple of `step` lies in `[from, to)`.
pub(crate) fn contains_multiple(from: f64, to: f64, step: f64) -> bool {
    if step <= 0.0 || to <= from {
        return false;
    }
    (from / step).ceil() * step < to
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_multiple() {
        assert!(contains_multiple(3.75, 4.25, 4.0));
        assert!(contains_multiple(4.0, 4.5, 4.0));
        assert!(!contains_multiple(4.5, 5.0, 4.0));
        assert!(contains_multiple(-0.25, 0.25, 1.0));
        assert!(!contains_multiple(1.0, 1.0, 1.0));
        assert!(!contains_multiple(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_layout_reserves_status_bar() {
        let area = Rect::new(0, 0, 80, 24);
        let (roll, status) = calculate_layout(area, false);
        assert_eq!(status.height, STATUS_BAR_HEIGHT);
        assert_eq!(roll.height, 24 - STATUS_BAR_HEIGHT);

        let (_, status) = calculate_layout(area, true);
        assert_eq!(status.height, STATUS_BAR_HEIGHT + 1);
    }
}
