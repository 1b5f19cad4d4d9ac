pub mod dialog;
pub mod help_overlay;
pub mod list_view;
pub mod status_row;

#[cfg(test)]
pub(crate) mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use regex::Regex;

use super::app::{App, Mode};

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (2 rows) | task list | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title + separator
            Constraint::Min(1),    // task list
            Constraint::Length(1), // status row
        ])
        .split(area);

    render_header(frame, app, chunks[0]);

    adjust_scroll(app, chunks[1].height as usize);
    list_view::render_list_view(frame, app, chunks[1]);

    match app.mode {
        Mode::Input => dialog::render_input_dialog(frame, app, area),
        Mode::Options => dialog::render_options_dialog(frame, app, area),
        Mode::ConfirmExit => dialog::render_exit_dialog(frame, app, area),
        Mode::Navigate | Mode::Search => {}
    }

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

/// Keep the cursor row inside the visible window
pub(super) fn adjust_scroll(app: &mut App, visible_height: usize) {
    if visible_height == 0 {
        return;
    }
    let max_offset = app.store.len().saturating_sub(visible_height);
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if app.cursor >= app.scroll_offset + visible_height {
        app.scroll_offset = app.cursor + 1 - visible_height;
    }
    app.scroll_offset = app.scroll_offset.min(max_offset);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let counts = app.store.counts();

    let title = Line::from(vec![
        Span::styled(
            " Tasks",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "  {} pending \u{00b7} {} completed",
                counts.pending, counts.completed
            ),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ]);
    let separator = Line::from(Span::styled(
        "\u{2500}".repeat(area.width as usize),
        Style::default().fg(app.theme.dim).bg(bg),
    ));

    frame.render_widget(
        Paragraph::new(vec![title, separator]).style(Style::default().bg(bg)),
        area,
    );
}

/// Push spans for text with regex match highlighting. If no regex or no matches,
/// pushes a single span with `base_style`. Otherwise splits text at match boundaries.
pub(super) fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    search_re: Option<&Regex>,
) {
    let Some(re) = search_re else {
        spans.push(Span::styled(text.to_string(), base_style));
        return;
    };

    let mut last_end = 0;
    for m in re.find_iter(text) {
        if m.start() > last_end {
            spans.push(Span::styled(
                text[last_end..m.start()].to_string(),
                base_style,
            ));
        }
        spans.push(Span::styled(m.as_str().to_string(), highlight_style));
        last_end = m.end();
    }
    if last_end < text.len() || text.is_empty() {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
}

/// Center a fixed-size rectangle, shrinking it to fit
pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn header_shows_counts() {
        let (_tmp, mut app) = app_with_tasks(&[("Buy milk", false), ("Call mom", true)]);
        let output = render_app(&mut app);
        let first = output.lines().next().unwrap();
        assert!(first.contains("Tasks"));
        assert!(first.contains("1 pending \u{00b7} 1 completed"));
    }

    #[test]
    fn scroll_follows_cursor() {
        let texts: Vec<String> = (0..30).map(|i| format!("task {i}")).collect();
        let refs: Vec<(&str, bool)> = texts.iter().map(|t| (t.as_str(), false)).collect();
        let (_tmp, mut app) = app_with_tasks(&refs);

        app.cursor = 25;
        adjust_scroll(&mut app, 10);
        assert_eq!(app.scroll_offset, 16);

        app.cursor = 3;
        adjust_scroll(&mut app, 10);
        assert_eq!(app.scroll_offset, 3);
    }

    #[test]
    fn scroll_offset_clamped_after_deletes() {
        let (_tmp, mut app) = app_with_tasks(&[("a", false), ("b", false)]);
        app.scroll_offset = 7;
        adjust_scroll(&mut app, 10);
        assert_eq!(app.scroll_offset, 0);
    }

    #[test]
    fn highlighted_spans_split_on_matches() {
        let re = Regex::new("(?i)milk").unwrap();
        let mut spans = Vec::new();
        push_highlighted_spans(
            &mut spans,
            "Buy MILK now",
            Style::default(),
            Style::default().add_modifier(Modifier::BOLD),
            Some(&re),
        );
        let parts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(parts, vec!["Buy ", "MILK", " now"]);
    }

    #[test]
    fn centered_rect_shrinks_to_area() {
        let area = Rect::new(0, 0, 20, 5);
        assert_eq!(centered_rect_fixed(10, 3, area), Rect::new(5, 1, 10, 3));
        assert_eq!(centered_rect_fixed(40, 9, area), area);
    }
}
